pub mod canvas_surface;
pub mod dispatch;
pub mod renderers;
pub mod surface;

pub use canvas_surface::CanvasSurface;
pub use dispatch::{LAYER_ORDER, dispatch_change, draw_client};
pub use renderers::{ObjectRenderer, renderer_for};
pub use surface::{DrawingSurface, RecordingSurface, SurfaceCommand};
