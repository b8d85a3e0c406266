use crate::application::config::ChartConfig;
use crate::domain::drawing::{ClientId, ClientKind, ClientStyle, DrawingClient, DrawingProxy};
use crate::domain::ecg::{EcgLeadCode, EcgRecord};
use crate::domain::errors::{AppError, ConfigurationError};
use crate::domain::events::Subscription;
use crate::domain::geometry::{Point, Rectangle};
use crate::domain::logging::{LogComponent, LogLevel, get_logger};
use crate::infrastructure::rendering::{DrawingSurface, dispatch_change};
use crate::{log_debug, log_warn};
use std::cell::RefCell;
use std::rc::Rc;

/// Ids of the clients the host registers from its config.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HostClients {
    pub signal: Option<ClientId>,
    pub beats: Option<ClientId>,
    pub annotation: Option<ClientId>,
    pub pqrst: Option<ClientId>,
    pub floating_point: Option<ClientId>,
    pub floating_peak: Option<ClientId>,
}

/// Chart component glue: owns the proxy, the records and the surface, and
/// repaints the surface on every change the proxy emits.
pub struct ChartHost<S: DrawingSurface + 'static> {
    proxy: DrawingProxy,
    surface: Rc<RefCell<S>>,
    config: ChartConfig,
    clients: HostClients,
    records: Vec<EcgRecord>,
    leads: Vec<EcgLeadCode>,
    labels: Vec<String>,
    subscription: Option<Subscription>,
    /// Last drag position, page pixels; `Some` while dragging
    drag_from: Option<Point>,
}

impl<S: DrawingSurface + 'static> ChartHost<S> {
    pub fn new(surface: S, config: ChartConfig) -> Self {
        let (width, height) = (surface.width(), surface.height());
        let surface = Rc::new(RefCell::new(surface));

        let mut proxy = DrawingProxy::new();
        proxy.state.microvolts_per_cell = config.microvolts_per_cell;

        let clients = Self::register_clients(&mut proxy, &config);

        let grid_style = config.grid_style.clone();
        let target = Rc::clone(&surface);
        let subscription = proxy.subscribe(move |change| match target.try_borrow_mut() {
            Ok(mut surface) => dispatch_change(change, &mut *surface, &grid_style),
            Err(_) => {
                log_warn!(LogComponent::Application("ChartHost"), "surface busy, {} dropped", change.sender);
            }
        });

        let mut host = Self {
            proxy,
            surface,
            config,
            clients,
            records: Vec::new(),
            leads: Vec::new(),
            labels: Vec::new(),
            subscription: Some(subscription),
            drag_from: None,
        };
        host.resize(width, height, Point::default());

        get_logger().info(
            LogComponent::Application("ChartHost"),
            &format!("chart ready, {} clients", host.proxy.clients().len()),
        );
        host
    }

    fn register_clients(proxy: &mut DrawingProxy, config: &ChartConfig) -> HostClients {
        let mut clients = HostClients::default();
        let mut register = |kind: ClientKind, style: &ClientStyle| {
            proxy.push_clients([DrawingClient::new(kind, style.clone())]).first().copied()
        };
        clients.signal = register(ClientKind::Signal, &config.signal_style);
        clients.beats = register(ClientKind::Beats, &config.beats_style);
        clients.annotation = register(ClientKind::Annotation, &config.annotation_style);
        clients.pqrst = register(ClientKind::Pqrst, &config.pqrst_style);
        if config.show_floating_point {
            clients.floating_point = register(ClientKind::FloatingPoint, &config.floating_point_style);
        }
        if config.show_floating_peak {
            clients.floating_peak = register(ClientKind::FloatingPeak, &config.floating_peak_style);
        }
        clients
    }

    pub fn proxy(&self) -> &DrawingProxy {
        &self.proxy
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn clients(&self) -> HostClients {
        self.clients
    }

    pub fn records(&self) -> &[EcgRecord] {
        &self.records
    }

    pub fn surface(&self) -> Rc<RefCell<S>> {
        Rc::clone(&self.surface)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Lead layout of the grid. Empty `labels` falls back to lead names.
    pub fn set_leads(&mut self, leads: Vec<EcgLeadCode>, labels: Vec<String>) {
        self.leads = leads;
        self.labels = labels;
        self.proxy.state.prepare_grid_cells(&self.leads, &self.labels);
        self.rebuild(self.proxy.state.scroll);
        self.proxy.refresh_drawings();
    }

    /// Replace the displayed records. Invalid records are dropped with a
    /// warning; returns how many were accepted.
    pub fn receive_records(&mut self, records: Vec<EcgRecord>) -> usize {
        let received = records.len();
        self.records = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match record.validate() {
                Ok(()) => Some(record),
                Err(e) => {
                    let message = format!("record dropped: {}", e);
                    get_logger().record_event(LogLevel::Warn, LogComponent::Application("ChartHost"), &message, index, None);
                    None
                }
            })
            .collect();

        if let Some(first) = self.records.first() {
            if self.leads.is_empty() {
                self.leads = first.leads.clone();
            }
            let original = first.signal.sample_rate;
            self.proxy.state.original_sample_rate = original;
            self.proxy.state.sample_rate = self.config.sample_rate.unwrap_or(original).min(original);
        }

        self.proxy.state.prepare_grid_cells(&self.leads, &self.labels);
        // new data starts at its beginning
        self.rebuild(0.0);
        self.proxy.refresh_drawings();

        get_logger().info(
            LogComponent::Application("ChartHost"),
            &format!("received {} records, {} accepted", received, self.records.len()),
        );
        self.records.len()
    }

    /// Change the display sample rate and rebuild at the new density. The
    /// window stays over the same samples.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<(), AppError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(ConfigurationError::InvalidParameter(format!("sample_rate {}", sample_rate)).into());
        }
        self.config.sample_rate = Some(sample_rate);
        let old_step = self.proxy.state.sample_step() as f64;
        let original = self.proxy.state.original_sample_rate;
        self.proxy.state.sample_rate = if original > 0.0 { sample_rate.min(original) } else { sample_rate };
        let new_step = self.proxy.state.sample_step() as f64;
        self.rebuild((self.proxy.state.scroll * old_step / new_step).round());
        self.proxy.refresh_drawings();
        Ok(())
    }

    /// Re-layout for a `width` x `height` canvas placed at `offset` on the
    /// page, then repaint everything. The scroll offset is kept, clamped to
    /// the new width.
    pub fn resize(&mut self, width: f64, height: f64, offset: Point) {
        self.surface.borrow_mut().resize(width, height);

        let padding = self.config.padding;
        let inner_width = (width - 2.0 * padding).max(0.0);
        let inner_height = (height - 2.0 * padding).max(0.0);
        let container = Rectangle::new(padding, padding, inner_width, inner_height);
        let screen = Rectangle::new(offset.left + padding, offset.top + padding, inner_width, inner_height);
        log_debug!(LogComponent::Application("ChartHost"), "resize to {}x{}, container {:?}", width, height, container);

        let scroll = self.proxy.state.scroll;
        self.proxy.state.set_container(container, screen);
        self.proxy.state.prepare_grid_cells(&self.leads, &self.labels);
        self.rebuild(scroll);
        self.proxy.refresh_drawings();
    }

    /// Drop every object and build again from the stored records, with the
    /// window moved back to `scroll` once the content width is known.
    fn rebuild(&mut self, scroll: f64) {
        let clients = self.clients;
        self.proxy.reset();
        self.proxy.build_signal(&self.records, clients.signal);
        self.proxy.state.scroll = scroll;
        self.proxy.state.update_window();
        self.proxy.build_beats(&self.records, clients.beats, self.config.pin_beats);
        self.proxy.build_annotations(&self.records, clients.annotation);
        self.proxy.build_wavepoints(&self.records, clients.pqrst);
        if clients.floating_point.is_some() {
            self.proxy.build_floating_point(clients.floating_point);
        }
        if clients.floating_peak.is_some() {
            self.proxy.build_floating_peak(clients.floating_peak, self.config.peak_window_px);
        }
    }

    pub fn refresh(&mut self) {
        self.proxy.refresh_drawings();
    }

    /// Scroll without a pointer, e.g. from a wheel or a scrollbar.
    pub fn scroll_by(&mut self, delta: f64) {
        self.proxy.scroll(delta);
        self.proxy.refresh_drawings();
    }

    pub fn drag_start(&mut self, page: Point) {
        self.drag_from = Some(page);
    }

    /// While dragging, scroll by the distance moved since the last event;
    /// otherwise this is a plain pointer move.
    pub fn drag_move(&mut self, page: Point) {
        let Some(from) = self.drag_from else {
            self.proxy.perform_mouse_move(page);
            return;
        };
        let delta = from - page;
        self.drag_from = Some(page);
        self.proxy.scroll(delta.left);
        self.proxy.perform_drag(page);
    }

    pub fn drag_end(&mut self) {
        self.drag_from = None;
    }

    pub fn click(&mut self, page: Point) {
        self.proxy.perform_click(page);
    }

    pub fn double_click(&mut self, page: Point) {
        self.proxy.perform_db_click(page);
    }

    /// Detach the surface from the proxy. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.proxy.unsubscribe(subscription);
            log_debug!(LogComponent::Application("ChartHost"), "teardown: unsubscribed");
        }
    }
}

impl<S: DrawingSurface + 'static> Drop for ChartHost<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
