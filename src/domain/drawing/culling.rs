//! The one horizontal overlap rule. Redraw dispatch, the beat pin search and
//! the floating pointer lookup all filter through here.

use super::object::{DrawingObject, DrawingObjectType};
use crate::domain::geometry::Rectangle;

/// Inclusive on both ends: touching the window counts as visible.
pub fn is_visible(container: &Rectangle, min_px: f64, max_px: f64) -> bool {
    container.max_ox() >= min_px && container.min_ox() <= max_px
}

pub fn cull<'a>(
    objects: &'a [DrawingObject],
    min_px: f64,
    max_px: f64,
) -> impl Iterator<Item = &'a DrawingObject> + 'a {
    objects.iter().filter(move |o| is_visible(&o.container, min_px, max_px))
}

/// Visible objects of one kind.
pub fn cull_kind<'a>(
    objects: &'a [DrawingObject],
    kind: DrawingObjectType,
    min_px: f64,
    max_px: f64,
) -> impl Iterator<Item = &'a DrawingObject> + 'a {
    cull(objects, min_px, max_px).filter(move |o| o.kind() == kind)
}

/// Of the candidates overlapping `x`, the one that owns `x`. Adjacent
/// records share an edge pixel, so an object whose half-open span
/// `[min_ox, max_ox)` holds `x` wins over one that only touches it; among
/// equals the closest centre wins.
pub fn nearest_at<'a>(candidates: &[&'a DrawingObject], x: f64) -> Option<&'a DrawingObject> {
    let rank = |o: &DrawingObject| {
        let owns = o.container.min_ox() <= x && x < o.container.max_ox();
        let distance = (o.container.left + o.container.width / 2.0 - x).abs();
        (!owns, distance)
    };
    candidates
        .iter()
        .copied()
        .filter(|o| is_visible(&o.container, x, x))
        .min_by(|a, b| {
            let (ra, rb) = (rank(a), rank(b));
            ra.0.cmp(&rb.0).then(ra.1.total_cmp(&rb.1))
        })
}
