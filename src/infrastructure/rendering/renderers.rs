//! Per-kind draw routines. All pixel scaling of amplitudes happens here, so
//! objects can be redrawn under a new cell scale without rebuilding.

use super::surface::DrawingSurface;
use crate::domain::drawing::{ClientKind, ClientStyle, DrawingObject, DrawingPayload, GridCell, ViewState};
use crate::domain::geometry::Point;
use std::f64::consts::PI;

/// Nudge that centres 1px strokes on the pixel grid.
pub const PIXEL_NUDGE: f64 = 0.5;

/// Draw routine of one client kind.
pub trait ObjectRenderer {
    fn draw_objects(
        &self,
        surface: &mut dyn DrawingSurface,
        objects: &[&DrawingObject],
        state: &ViewState,
        style: &ClientStyle,
    );

    fn draw(&self, surface: &mut dyn DrawingSurface, object: &DrawingObject, state: &ViewState, style: &ClientStyle) {
        self.draw_objects(surface, &[object], state, style);
    }
}

/// Pixel-x of an absolute point inside `cell`.
pub fn point_x(point: &Point, state: &ViewState, cell: &GridCell) -> f64 {
    point.left - state.min_px + cell.container.left
}

/// Pixel-y of a microvolt amplitude inside `cell`.
pub fn amplitude_y(microvolts: f64, cell: &GridCell, object_top: f64) -> f64 {
    cell.amplitude_to_y(microvolts) + object_top
}

/// Range of points whose `left` falls inside the window.
fn visible_slice<'a>(points: &'a [Point], state: &ViewState) -> &'a [Point] {
    let start = points.partition_point(|p| p.left < state.min_px);
    let end = points.partition_point(|p| p.left <= state.max_px);
    &points[start..end.max(start)]
}

fn marker(surface: &mut dyn DrawingSurface, x: f64, y: f64, radius: f64) {
    surface.move_to(x + PIXEL_NUDGE, y + PIXEL_NUDGE);
    surface.arc(x + PIXEL_NUDGE, y + PIXEL_NUDGE, radius, 0.0, 2.0 * PI);
}

/// Cell borders and zero lines.
pub struct GridRenderer;

impl GridRenderer {
    pub fn draw(&self, surface: &mut dyn DrawingSurface, state: &ViewState, style: &ClientStyle) {
        if state.grid_cells.is_empty() {
            return;
        }
        let n = PIXEL_NUDGE;
        surface.begin_path();
        for cell in &state.grid_cells {
            let r = &cell.container;
            surface.move_to(r.min_ox() + n, r.min_oy() + n);
            surface.line_to(r.max_ox() + n, r.min_oy() + n);
            surface.line_to(r.max_ox() + n, r.max_oy() + n);
            surface.line_to(r.min_ox() + n, r.max_oy() + n);
            surface.line_to(r.min_ox() + n, r.min_oy() + n);
            surface.move_to(r.min_ox() + n, r.mid_oy() + n);
            surface.line_to(r.max_ox() + n, r.mid_oy() + n);
        }
        surface.set_line_width(style.line_width);
        surface.set_stroke_style(&style.color);
        surface.set_global_alpha(style.opacity);
        surface.stroke();
    }
}

pub struct SignalRenderer;

impl ObjectRenderer for SignalRenderer {
    fn draw_objects(
        &self,
        surface: &mut dyn DrawingSurface,
        objects: &[&DrawingObject],
        state: &ViewState,
        style: &ClientStyle,
    ) {
        surface.begin_path();
        // one sub-path per lead, carried across records that sit edge to edge
        for (lead, cell) in state.grid_cells.iter().enumerate() {
            let mut last_left: Option<f64> = None;
            for object in objects {
                let DrawingPayload::Signal { polylines } = &object.payload else { continue };
                let Some(polyline) = polylines.get(lead) else { continue };
                let points = visible_slice(&polyline.points, state);
                let Some((first, rest)) = points.split_first() else { continue };
                let x = point_x(first, state, cell) + PIXEL_NUDGE;
                let y = amplitude_y(first.top, cell, object.container.top) + PIXEL_NUDGE;
                match last_left {
                    Some(left) if first.left - left <= 1.0 => surface.line_to(x, y),
                    _ => surface.move_to(x, y),
                }
                for p in rest {
                    surface.line_to(
                        point_x(p, state, cell) + PIXEL_NUDGE,
                        amplitude_y(p.top, cell, object.container.top) + PIXEL_NUDGE,
                    );
                }
                last_left = points.last().map(|p| p.left);
            }
        }
        surface.set_line_width(style.line_width);
        surface.set_stroke_style(&style.color);
        surface.set_global_alpha(style.opacity);
        surface.stroke();
    }
}

pub struct BeatsRenderer;

impl ObjectRenderer for BeatsRenderer {
    fn draw_objects(
        &self,
        surface: &mut dyn DrawingSurface,
        objects: &[&DrawingObject],
        state: &ViewState,
        style: &ClientStyle,
    ) {
        surface.begin_path();
        for object in objects {
            let DrawingPayload::Beats { lanes, pinned } = &object.payload else { continue };
            for (lane, cell) in lanes.iter().zip(&state.grid_cells) {
                for p in visible_slice(&lane.points, state) {
                    let y = if *pinned {
                        amplitude_y(p.top, cell, object.container.top)
                    } else {
                        cell.container.min_oy() + object.container.top + p.top
                    };
                    marker(surface, point_x(p, state, cell), y, style.radius);
                }
            }
        }
        surface.set_fill_style(&style.color);
        surface.set_global_alpha(style.opacity);
        surface.fill();
    }
}

/// Translucent band over the annotated sample range.
pub struct AnnotationRenderer;

impl ObjectRenderer for AnnotationRenderer {
    fn draw_objects(
        &self,
        surface: &mut dyn DrawingSurface,
        objects: &[&DrawingObject],
        state: &ViewState,
        style: &ClientStyle,
    ) {
        let top = state.container.min_oy();
        let bottom = state.container.max_oy();
        let to_x = |p: &Point| (p.left - state.min_px).clamp(0.0, state.visible_width()) + state.container.left;

        surface.begin_path();
        for object in objects {
            let DrawingPayload::Annotation { points, .. } = &object.payload else { continue };
            let (a, b) = (to_x(&points[0]), to_x(&points[1]).max(to_x(&points[0]) + 1.0));
            surface.move_to(a + PIXEL_NUDGE, top + PIXEL_NUDGE);
            surface.line_to(b + PIXEL_NUDGE, top + PIXEL_NUDGE);
            surface.line_to(b + PIXEL_NUDGE, bottom + PIXEL_NUDGE);
            surface.line_to(a + PIXEL_NUDGE, bottom + PIXEL_NUDGE);
            surface.close_path();
        }
        surface.set_fill_style(&style.color);
        surface.set_global_alpha(style.opacity);
        surface.fill();
    }
}

/// Boundary ticks of each wave point pair, repeated in every cell.
pub struct PqrstRenderer;

impl ObjectRenderer for PqrstRenderer {
    fn draw_objects(
        &self,
        surface: &mut dyn DrawingSurface,
        objects: &[&DrawingObject],
        state: &ViewState,
        style: &ClientStyle,
    ) {
        surface.begin_path();
        for object in objects {
            let DrawingPayload::Pqrst { points, .. } = &object.payload else { continue };
            for cell in &state.grid_cells {
                for p in points.iter().filter(|p| p.left >= state.min_px && p.left <= state.max_px) {
                    let x = point_x(p, state, cell) + PIXEL_NUDGE;
                    surface.move_to(x, cell.container.min_oy() + PIXEL_NUDGE);
                    surface.line_to(x, cell.container.max_oy() + PIXEL_NUDGE);
                }
            }
        }
        surface.set_line_width(style.line_width);
        surface.set_stroke_style(&style.color);
        surface.set_global_alpha(style.opacity);
        surface.stroke();
    }
}

/// Crosshair plus one marker per lead; shared by point and peak clients.
pub struct FloatingRenderer;

impl ObjectRenderer for FloatingRenderer {
    fn draw_objects(
        &self,
        surface: &mut dyn DrawingSurface,
        objects: &[&DrawingObject],
        state: &ViewState,
        style: &ClientStyle,
    ) {
        let container = &state.container;
        surface.set_global_alpha(style.opacity);
        for object in objects {
            let (DrawingPayload::FloatingPoint { line, points } | DrawingPayload::FloatingPeak { line, points }) =
                &object.payload
            else {
                continue;
            };

            surface.begin_path();
            let x = container.left + line.ax;
            surface.move_to(x + PIXEL_NUDGE, container.top + line.ay + PIXEL_NUDGE);
            surface.line_to(x + PIXEL_NUDGE, container.top + line.by + PIXEL_NUDGE);
            surface.set_stroke_style(&style.line_color);
            surface.stroke();

            surface.begin_path();
            // point index = cell index
            for (p, cell) in points.iter().zip(&state.grid_cells) {
                marker(surface, container.left + p.left, amplitude_y(p.top, cell, 0.0), style.radius);
            }
            surface.set_fill_style(&style.point_color);
            surface.fill();
        }
    }
}

/// Renderer serving a client kind.
pub fn renderer_for(kind: ClientKind) -> &'static dyn ObjectRenderer {
    match kind {
        ClientKind::Signal => &SignalRenderer,
        ClientKind::Beats => &BeatsRenderer,
        ClientKind::Annotation => &AnnotationRenderer,
        ClientKind::Pqrst => &PqrstRenderer,
        ClientKind::FloatingPoint | ClientKind::FloatingPeak => &FloatingRenderer,
    }
}
