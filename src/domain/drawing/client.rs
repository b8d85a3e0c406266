use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

/// Registry slot of a drawing client. Objects name their owner by id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize)]
#[display(fmt = "client#{}", _0)]
pub struct ClientId(pub usize);

/// Object kind a client renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, AsRefStr, Serialize, Deserialize)]
pub enum ClientKind {
    Signal,
    Beats,
    Annotation,
    Pqrst,
    FloatingPoint,
    FloatingPeak,
}

/// Which draw entry points a client exposes. Dispatch prefers batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawCapability {
    None,
    Single,
    #[default]
    Batch,
    SingleAndBatch,
}

impl DrawCapability {
    pub fn supports_batch(self) -> bool {
        matches!(self, DrawCapability::Batch | DrawCapability::SingleAndBatch)
    }

    pub fn supports_single(self) -> bool {
        matches!(self, DrawCapability::Single | DrawCapability::SingleAndBatch)
    }
}

/// Rendering parameters. Read by renderers, never touched by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientStyle {
    pub color: String,
    pub opacity: f64,
    pub radius: f64,
    pub line_width: f64,
    /// Crosshair colour of floating clients
    pub line_color: String,
    /// Marker colour of floating clients
    pub point_color: String,
}

impl Default for ClientStyle {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            opacity: 1.0,
            radius: 2.0,
            line_width: 1.0,
            line_color: "#000000".to_string(),
            point_color: "#000000".to_string(),
        }
    }
}

impl ClientStyle {
    pub fn stroke(color: &str, opacity: f64) -> Self {
        Self { color: color.to_string(), opacity: opacity.clamp(0.0, 1.0), ..Default::default() }
    }

    pub fn markers(color: &str, opacity: f64, radius: f64) -> Self {
        Self { radius, ..Self::stroke(color, opacity) }
    }

    pub fn crosshair(line_color: &str, point_color: &str, opacity: f64, radius: f64) -> Self {
        Self {
            line_color: line_color.to_string(),
            point_color: point_color.to_string(),
            radius,
            ..Self::stroke(point_color, opacity)
        }
    }
}

/// Configured rendering sink for one object kind.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingClient {
    pub kind: ClientKind,
    pub style: ClientStyle,
    pub capability: DrawCapability,
}

impl DrawingClient {
    pub fn new(kind: ClientKind, style: ClientStyle) -> Self {
        Self { kind, style, capability: DrawCapability::default() }
    }

    pub fn with_capability(mut self, capability: DrawCapability) -> Self {
        self.capability = capability;
        self
    }

    pub fn signal(color: &str, opacity: f64) -> Self {
        Self::new(ClientKind::Signal, ClientStyle::stroke(color, opacity))
    }

    pub fn beats(color: &str, opacity: f64, radius: f64) -> Self {
        Self::new(ClientKind::Beats, ClientStyle::markers(color, opacity, radius))
    }

    pub fn floating_point(line_color: &str, point_color: &str, opacity: f64, radius: f64) -> Self {
        Self::new(ClientKind::FloatingPoint, ClientStyle::crosshair(line_color, point_color, opacity, radius))
    }
}
