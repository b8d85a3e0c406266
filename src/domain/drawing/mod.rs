//! Drawing pipeline core: view state and grid layout, drawing objects and
//! their builders, clients, culling and the proxy that ties them together.

pub mod client;
pub mod culling;
pub mod object;
pub mod proxy;
pub mod view_state;

pub use client::{ClientId, ClientKind, ClientStyle, DrawCapability, DrawingClient};
pub use culling::{cull, is_visible};
pub use object::{DrawingObject, DrawingObjectType, DrawingPayload};
pub use proxy::{DrawingProxy, ProxyMode};
pub use view_state::{GridCell, ViewState};
