use crate::domain::drawing::{ClientId, DrawingClient, DrawingObject, ViewState};
use crate::domain::geometry::Point;
use derive_more::Display;
use std::fmt::Debug;
use strum::{AsRefStr, EnumIter};

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> u64 {
        use crate::domain::logging::get_time_provider;
        get_time_provider().current_timestamp()
    }
}

/// Action that triggered a change emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, AsRefStr)]
pub enum DrawingChangeSender {
    UpdateDrawings,
    MouseClick,
    MouseDbClick,
    Drag,
    MouseMove,
}

/// Everything a subscriber needs to repaint one frame. Borrowed from the
/// proxy for the duration of the synchronous emit.
#[derive(Debug, Clone)]
pub struct DrawingChange<'a> {
    pub sender: DrawingChangeSender,
    /// Visible objects in build order
    pub objects: Vec<&'a DrawingObject>,
    /// Visible objects partitioned by owner; `groups[i]` belongs to `clients[i]`
    pub groups: Vec<Vec<&'a DrawingObject>>,
    pub clients: &'a [DrawingClient],
    pub state: &'a ViewState,
    /// Last pointer position in container-local pixels
    pub pointer: Option<Point>,
}

impl DrawingChange<'_> {
    pub fn group(&self, id: ClientId) -> &[&DrawingObject] {
        self.groups.get(id.0).map(|g| g.as_slice()).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl DomainEvent for DrawingChange<'_> {
    fn event_type(&self) -> &'static str {
        match self.sender {
            DrawingChangeSender::UpdateDrawings => "UpdateDrawings",
            DrawingChangeSender::MouseClick => "MouseClick",
            DrawingChangeSender::MouseDbClick => "MouseDbClick",
            DrawingChangeSender::Drag => "Drag",
            DrawingChangeSender::MouseMove => "MouseMove",
        }
    }
}

/// Handle returned by `subscribe`; consumed by `unsubscribe`.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription(u64);

type ChangeHandler = Box<dyn FnMut(&DrawingChange<'_>)>;

/// Synchronous, single-threaded pub/sub. Handlers run in subscription order
/// and must finish with the change before `emit` returns.
#[derive(Default)]
pub struct ChangeEmitter {
    handlers: Vec<(u64, ChangeHandler)>,
    next_id: u64,
}

impl ChangeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&DrawingChange<'_>) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        Subscription(id)
    }

    /// Detach a handler. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(id, _)| *id != subscription.0);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, change: &DrawingChange<'_>) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(change);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Debug for ChangeEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeEmitter").field("subscribers", &self.handlers.len()).finish()
    }
}
