//! Turns one emitted change into draw calls: grid first, then client layers
//! in a fixed order, each client isolated in its own save/restore pair.

use super::renderers::{GridRenderer, renderer_for};
use super::surface::DrawingSurface;
use crate::domain::drawing::{ClientKind, ClientStyle, DrawCapability, DrawingClient, DrawingObject};
use crate::domain::events::DrawingChange;
use crate::domain::logging::LogComponent;
use crate::log_trace;

/// Paint order; later layers draw over earlier ones.
pub const LAYER_ORDER: [ClientKind; 6] = [
    ClientKind::Signal,
    ClientKind::Beats,
    ClientKind::Annotation,
    ClientKind::Pqrst,
    ClientKind::FloatingPoint,
    ClientKind::FloatingPeak,
];

/// Draw one client's group according to its capability. Returns false if
/// the client cannot draw at all.
pub fn draw_client(
    surface: &mut dyn DrawingSurface,
    client: &DrawingClient,
    group: &[&DrawingObject],
    change: &DrawingChange<'_>,
) -> bool {
    let renderer = renderer_for(client.kind);
    match client.capability {
        DrawCapability::Batch | DrawCapability::SingleAndBatch => {
            renderer.draw_objects(surface, group, change.state, &client.style);
        }
        DrawCapability::Single => {
            for object in group {
                renderer.draw(surface, object, change.state, &client.style);
            }
        }
        DrawCapability::None => return false,
    }
    true
}

/// Full repaint of `surface` from `change`.
pub fn dispatch_change(change: &DrawingChange<'_>, surface: &mut dyn DrawingSurface, grid_style: &ClientStyle) {
    surface.clear();

    surface.save();
    GridRenderer.draw(surface, change.state, grid_style);
    surface.restore();

    for kind in LAYER_ORDER {
        for (index, client) in change.clients.iter().enumerate() {
            if client.kind != kind {
                continue;
            }
            let group = change.groups.get(index).map(Vec::as_slice).unwrap_or(&[]);
            if group.is_empty() {
                continue;
            }
            surface.save();
            if !draw_client(surface, client, group, change) {
                log_trace!(
                    LogComponent::Infrastructure("Dispatch"),
                    "client#{} ({}) cannot draw, {} objects skipped",
                    index,
                    client.kind,
                    group.len()
                );
            }
            surface.restore();
        }
    }
}
