use super::client::{ClientId, ClientKind, DrawingClient};
use super::culling::{cull, is_visible};
use super::object::{DrawingObject, DrawingObjectType};
use super::view_state::ViewState;
use crate::domain::ecg::EcgRecord;
use crate::domain::events::{ChangeEmitter, DrawingChange, DrawingChangeSender, Subscription};
use crate::domain::geometry::Point;
use crate::domain::logging::LogComponent;
use crate::{log_debug, log_trace, log_warn};

/// Durable proxy states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    Empty,
    Loaded,
}

/// Pointer-driven object source, rebuilt on every pointer update.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FloatingSource {
    Point { owner: ClientId },
    Peak { owner: ClientId, window_px: f64 },
}

impl FloatingSource {
    fn owner(&self) -> ClientId {
        match *self {
            FloatingSource::Point { owner } | FloatingSource::Peak { owner, .. } => owner,
        }
    }
}

/// Owns the view state, the client registry and every drawing object, and
/// turns state changes into change events.
#[derive(Debug, Default)]
pub struct DrawingProxy {
    pub state: ViewState,
    drawing_objects: Vec<DrawingObject>,
    clients: Vec<DrawingClient>,
    on_change: ChangeEmitter,
    floating: Vec<FloatingSource>,
    pointer: Option<Point>,
}

impl DrawingProxy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ProxyMode {
        if self.drawing_objects.is_empty() { ProxyMode::Empty } else { ProxyMode::Loaded }
    }

    pub fn drawing_objects(&self) -> &[DrawingObject] {
        &self.drawing_objects
    }

    /// Drop every object. References taken before are stale afterwards.
    pub fn reset(&mut self) {
        log_debug!(
            LogComponent::Domain("DrawingProxy"),
            "reset: dropping {} objects",
            self.drawing_objects.len()
        );
        self.drawing_objects.clear();
        self.state.limit_px = self.state.visible_width();
        self.state.update_window();
    }

    /// Move the window by `-delta`. Does not redraw; call `refresh_drawings`.
    pub fn scroll(&mut self, delta: f64) {
        self.state.scroll_by(delta);
    }

    pub fn push_clients<I>(&mut self, clients: I) -> Vec<ClientId>
    where
        I: IntoIterator<Item = DrawingClient>,
    {
        clients
            .into_iter()
            .map(|client| {
                self.clients.push(client);
                ClientId(self.clients.len() - 1)
            })
            .collect()
    }

    pub fn client(&self, id: ClientId) -> Option<&DrawingClient> {
        self.clients.get(id.0)
    }

    pub fn clients(&self) -> &[DrawingClient] {
        &self.clients
    }

    pub fn subscribe<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&DrawingChange<'_>) + 'static,
    {
        self.on_change.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.on_change.unsubscribe(subscription)
    }

    /// `None` or an unregistered id means "nothing to build".
    fn resolve_client(&self, client: Option<ClientId>, what: &str) -> Option<ClientId> {
        match client {
            Some(id) if id.0 < self.clients.len() => Some(id),
            Some(id) => {
                log_warn!(LogComponent::Domain("DrawingProxy"), "{}: {} is not registered", what, id);
                None
            }
            None => {
                log_debug!(LogComponent::Domain("DrawingProxy"), "{}: no client, skipped", what);
                None
            }
        }
    }

    /// Left edge of every record; record N+1 starts where record N ends.
    fn record_offsets(&self, records: &[EcgRecord]) -> Vec<f64> {
        let mut skip_px = 0.0;
        records
            .iter()
            .map(|record| {
                let left = skip_px;
                skip_px += self.state.samples_to_px(record.signal.sample_count());
                left
            })
            .collect()
    }

    pub fn build_signal(&mut self, records: &[EcgRecord], client: Option<ClientId>) {
        let Some(owner) = self.resolve_client(client, "build_signal") else { return };
        if records.is_empty() {
            log_debug!(LogComponent::Domain("DrawingProxy"), "build_signal: no records");
            return;
        }

        let mut skip_px = 0.0;
        for (index, record) in records.iter().enumerate() {
            let o = DrawingObject::prepare_signal(index, &record.signal, &self.state, owner, skip_px);
            skip_px = o.container.max_ox();
            self.drawing_objects.push(o);
        }
        self.state.set_limit_px(skip_px);
        log_debug!(
            LogComponent::Domain("DrawingProxy"),
            "build_signal: {} records, limit {}px",
            records.len(),
            self.state.limit_px
        );
    }

    pub fn build_beats(&mut self, records: &[EcgRecord], client: Option<ClientId>, pin_beats: bool) {
        let Some(owner) = self.resolve_client(client, "build_beats") else { return };

        let offsets = self.record_offsets(records);
        let mut built = Vec::new();
        for ((index, record), skip_px) in records.iter().enumerate().zip(offsets) {
            let Some(beats) = record.beats.as_deref() else { continue };
            let sample_count = record.signal.sample_count();
            let width = self.state.samples_to_px(sample_count);
            let signals: Vec<&DrawingObject> = self.find_signals(skip_px, skip_px + width);
            if pin_beats && signals.is_empty() {
                log_debug!(
                    LogComponent::Domain("DrawingProxy"),
                    "build_beats: record {} has no signal to pin to",
                    index
                );
            }
            built.push(DrawingObject::prepare_beats(
                index,
                &signals,
                beats,
                &self.state,
                owner,
                skip_px,
                sample_count,
                pin_beats,
            ));
        }
        self.drawing_objects.extend(built);
    }

    /// Signal objects overlapping `[min_px, max_px]`.
    fn find_signals(&self, min_px: f64, max_px: f64) -> Vec<&DrawingObject> {
        self.drawing_objects
            .iter()
            .filter(|o| o.kind() == DrawingObjectType::Signal && is_visible(&o.container, min_px, max_px))
            .collect()
    }

    /// One PQRST object per consecutive wave point pair of every record.
    pub fn build_wavepoints(&mut self, records: &[EcgRecord], client: Option<ClientId>) {
        let Some(owner) = self.resolve_client(client, "build_wavepoints") else { return };

        let offsets = self.record_offsets(records);
        for ((index, record), skip_px) in records.iter().enumerate().zip(offsets) {
            for (y, pair) in record.wave_points.windows(2).enumerate() {
                let o = DrawingObject::prepare_pqrst_complex(
                    index,
                    [&pair[0], &pair[1]],
                    (y, y + 1),
                    &self.state,
                    owner,
                    skip_px,
                );
                self.drawing_objects.push(o);
            }
        }
    }

    pub fn build_annotations(&mut self, records: &[EcgRecord], client: Option<ClientId>) {
        let Some(owner) = self.resolve_client(client, "build_annotations") else { return };

        let offsets = self.record_offsets(records);
        for ((index, record), skip_px) in records.iter().enumerate().zip(offsets) {
            for annotation in &record.annotations {
                let o = DrawingObject::prepare_annotation(index, annotation, &self.state, owner, skip_px);
                self.drawing_objects.push(o);
            }
        }
    }

    /// Register a crosshair + nearest-sample source for `client`.
    pub fn build_floating_point(&mut self, client: Option<ClientId>) {
        let Some(owner) = self.resolve_client(client, "build_floating_point") else { return };
        self.floating.retain(|f| f.owner() != owner);
        self.floating.push(FloatingSource::Point { owner });
        self.rebuild_floating();
    }

    /// Register a crosshair + local-peak source for `client`.
    pub fn build_floating_peak(&mut self, client: Option<ClientId>, window_px: f64) {
        let Some(owner) = self.resolve_client(client, "build_floating_peak") else { return };
        self.floating.retain(|f| f.owner() != owner);
        self.floating.push(FloatingSource::Peak { owner, window_px });
        self.rebuild_floating();
    }

    pub fn add_drawing_object(&mut self, o: DrawingObject) {
        self.drawing_objects.push(o);
    }

    /// Record the pointer (page pixels) and rebuild floating objects.
    pub fn prepare_pointer(&mut self, page: Point) {
        self.pointer = self.state.screen_to_local(page);
        self.rebuild_floating();
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    fn rebuild_floating(&mut self) {
        if self.floating.is_empty() {
            return;
        }
        self.drawing_objects.retain(|o| {
            !matches!(o.kind(), DrawingObjectType::FloatingPoint | DrawingObjectType::FloatingPeak)
        });
        let Some(pointer) = self.pointer else { return };

        let x = self.state.min_px + pointer.left;
        let built: Vec<DrawingObject> = {
            let signals = self.find_signals(self.state.min_px, self.state.max_px);
            if signals.is_empty() {
                log_trace!(LogComponent::Domain("DrawingProxy"), "pointer at {}px over no signal", x);
                return;
            }
            self.floating
                .iter()
                .filter_map(|source| match *source {
                    FloatingSource::Point { owner } => {
                        DrawingObject::prepare_floating_point(&signals, pointer, &self.state, owner)
                    }
                    FloatingSource::Peak { owner, window_px } => {
                        DrawingObject::prepare_floating_peak(&signals, pointer, &self.state, owner, window_px)
                    }
                })
                .collect()
        };
        self.drawing_objects.extend(built);
    }

    /// Objects overlapping the current window, in build order.
    pub fn visible_objects(&self) -> Vec<&DrawingObject> {
        cull(&self.drawing_objects, self.state.min_px, self.state.max_px).collect()
    }

    fn collect_changes<'a>(
        sender: DrawingChangeSender,
        state: &'a ViewState,
        objects: &'a [DrawingObject],
        clients: &'a [DrawingClient],
        pointer: Option<Point>,
    ) -> DrawingChange<'a> {
        let mut groups: Vec<Vec<&DrawingObject>> = vec![Vec::new(); clients.len()];
        let visible: Vec<&DrawingObject> = cull(objects, state.min_px, state.max_px).collect();
        for o in visible.iter().copied() {
            match groups.get_mut(o.owner.0) {
                Some(group) => group.push(o),
                None => {
                    log_trace!(LogComponent::Domain("DrawingProxy"), "object owned by unknown {}", o.owner);
                }
            }
        }
        DrawingChange { sender, objects: visible, groups, clients, state, pointer }
    }

    fn emit(&mut self, sender: DrawingChangeSender) {
        let change = Self::collect_changes(
            sender,
            &self.state,
            &self.drawing_objects,
            &self.clients,
            self.pointer,
        );
        log_trace!(
            LogComponent::Domain("DrawingProxy"),
            "{}: {} visible in [{}, {}]",
            sender,
            change.objects.len(),
            self.state.min_px,
            self.state.max_px
        );
        self.on_change.emit(&change);
    }

    pub fn refresh_drawings(&mut self) {
        self.emit(DrawingChangeSender::UpdateDrawings);
    }

    pub fn perform_click(&mut self, page: Point) {
        self.prepare_pointer(page);
        self.emit(DrawingChangeSender::MouseClick);
    }

    pub fn perform_db_click(&mut self, page: Point) {
        self.prepare_pointer(page);
        self.emit(DrawingChangeSender::MouseDbClick);
    }

    pub fn perform_drag(&mut self, page: Point) {
        self.prepare_pointer(page);
        self.emit(DrawingChangeSender::Drag);
    }

    pub fn perform_mouse_move(&mut self, page: Point) {
        self.prepare_pointer(page);
        self.emit(DrawingChangeSender::MouseMove);
    }

    /// Registered clients of one kind, in registry order.
    pub fn clients_of(&self, kind: ClientKind) -> impl Iterator<Item = ClientId> + '_ {
        self.clients
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.kind == kind)
            .map(|(i, _)| ClientId(i))
    }
}
