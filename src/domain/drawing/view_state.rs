use crate::domain::ecg::EcgLeadCode;
use crate::domain::geometry::{Point, Rectangle};
use crate::domain::logging::LogComponent;
use crate::log_debug;

/// Voltage span mapped onto one cell height unless configured otherwise.
pub const DEFAULT_MICROVOLTS_PER_CELL: f64 = 4000.0;

/// One horizontal band of the viewport, dedicated to one lead.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub index: usize,
    pub lead: EcgLeadCode,
    pub label: String,
    pub container: Rectangle,
    /// Pixels per microvolt. Negative: positive amplitudes go up.
    pub microvolts_to_pixel: f64,
}

impl GridCell {
    /// Vertical pixel of an amplitude, relative to the cell's zero line.
    pub fn amplitude_to_y(&self, microvolts: f64) -> f64 {
        (microvolts * self.microvolts_to_pixel).round() + self.container.mid_oy()
    }
}

/// Mutable per-chart view state, owned by the drawing proxy.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Drawing rectangle in local (canvas) pixels
    pub container: Rectangle,
    /// Same rectangle in page pixels, for pointer hit testing
    pub screen: Rectangle,
    pub scroll: f64,
    pub sample_rate: f64,
    pub original_sample_rate: f64,
    pub min_px: f64,
    pub max_px: f64,
    pub limit_px: f64,
    pub grid_cells: Vec<GridCell>,
    pub microvolts_per_cell: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            container: Rectangle::default(),
            screen: Rectangle::default(),
            scroll: 0.0,
            sample_rate: 0.0,
            original_sample_rate: 0.0,
            min_px: 0.0,
            max_px: 0.0,
            limit_px: 0.0,
            grid_cells: Vec::new(),
            microvolts_per_cell: DEFAULT_MICROVOLTS_PER_CELL,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update both rectangles after a canvas resize. Grid cells are NOT
    /// recomputed here; callers re-run `prepare_grid_cells`.
    pub fn set_container(&mut self, container: Rectangle, screen: Rectangle) {
        self.container = container;
        self.screen = screen;
        self.limit_px = self.limit_px.max(self.visible_width());
        self.update_window();
    }

    /// Split the container into one equal-height band per lead, in lead order.
    pub fn prepare_grid_cells(&mut self, leads: &[EcgLeadCode], labels: &[String]) {
        self.grid_cells.clear();
        if leads.is_empty() {
            log_debug!(LogComponent::Domain("ViewState"), "no leads, grid left empty");
            return;
        }

        let height = (self.container.height.max(0.0) / leads.len() as f64).floor();
        let microvolts_to_pixel = if height > 0.0 && self.microvolts_per_cell > 0.0 {
            -(height / self.microvolts_per_cell)
        } else {
            0.0
        };

        for (index, lead) in leads.iter().enumerate() {
            let container = Rectangle::new(
                self.container.left,
                self.container.top + index as f64 * height,
                self.container.width,
                height,
            );
            let label = labels.get(index).cloned().unwrap_or_else(|| lead.to_string());
            self.grid_cells.push(GridCell { index, lead: *lead, label, container, microvolts_to_pixel });
        }
    }

    /// Shift the window. The stored offset moves opposite to `delta`.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll -= delta;
        self.update_window();
    }

    pub fn set_limit_px(&mut self, limit_px: f64) {
        self.limit_px = limit_px.max(self.visible_width());
        self.update_window();
    }

    /// Re-derive `[min_px, max_px]` from the scroll offset, clamping the
    /// offset so the window stays inside `[0, limit_px]`.
    pub fn update_window(&mut self) {
        let width = self.visible_width();
        let max_scroll = (self.limit_px - width).max(0.0);
        self.scroll = self.scroll.clamp(0.0, max_scroll);
        self.min_px = self.scroll;
        self.max_px = (self.min_px + width).min(self.limit_px.max(self.min_px));
    }

    pub fn visible_width(&self) -> f64 {
        self.container.width.max(0.0)
    }

    /// Source samples folded into one pixel column.
    pub fn sample_step(&self) -> usize {
        if self.sample_rate > 0.0 && self.original_sample_rate > self.sample_rate {
            (self.original_sample_rate / self.sample_rate).round().max(1.0) as usize
        } else {
            1
        }
    }

    /// Number of pixel columns a record of `samples` samples occupies.
    pub fn samples_to_px(&self, samples: usize) -> f64 {
        samples.div_ceil(self.sample_step()) as f64
    }

    /// Page coordinates to container-local coordinates, `None` outside.
    pub fn screen_to_local(&self, page: Point) -> Option<Point> {
        if !self.screen.contains(page) {
            return None;
        }
        Some(Point::new(page.left - self.screen.left, page.top - self.screen.top))
    }

    pub fn cell_at(&self, local_y: f64) -> Option<&GridCell> {
        let y = local_y + self.container.top;
        self.grid_cells
            .iter()
            .find(|cell| y >= cell.container.min_oy() && y < cell.container.max_oy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(width: f64, height: f64) -> ViewState {
        let mut s = ViewState::new();
        let rect = Rectangle::new(0.0, 0.0, width, height);
        s.set_container(rect, rect);
        s
    }

    #[test]
    fn two_leads_split_vertically() {
        let mut s = state(800.0, 800.0);
        s.prepare_grid_cells(&[EcgLeadCode::I, EcgLeadCode::II], &["I".into(), "II".into()]);
        assert_eq!(s.grid_cells.len(), 2);
        assert_eq!(s.grid_cells[0].container.height, 400.0);
        assert_eq!(s.grid_cells[1].container.top, 400.0);
        assert_eq!(s.grid_cells[0].container.mid_oy(), 200.0);
        assert_eq!(s.grid_cells[1].container.mid_oy(), 600.0);
        assert!(s.grid_cells[0].microvolts_to_pixel < 0.0);
    }

    #[test]
    fn missing_labels_fall_back_to_lead_code() {
        let mut s = state(100.0, 100.0);
        s.prepare_grid_cells(&[EcgLeadCode::V1, EcgLeadCode::AVF], &[]);
        assert_eq!(s.grid_cells[1].label, "aVF");
    }

    #[test]
    fn scroll_is_clamped_to_limit() {
        let mut s = state(100.0, 50.0);
        s.set_limit_px(250.0);
        s.scroll_by(-400.0);
        assert_eq!(s.min_px, 150.0);
        assert_eq!(s.max_px, 250.0);
        s.scroll_by(1000.0);
        assert_eq!(s.min_px, 0.0);
        assert_eq!(s.max_px, 100.0);
    }

    #[test]
    fn downsampling_step() {
        let mut s = state(10.0, 10.0);
        s.original_sample_rate = 500.0;
        s.sample_rate = 250.0;
        assert_eq!(s.sample_step(), 2);
        assert_eq!(s.samples_to_px(5), 3.0);
        s.sample_rate = 500.0;
        assert_eq!(s.sample_step(), 1);
    }

    #[test]
    fn screen_to_local_respects_bounds() {
        let mut s = ViewState::new();
        s.set_container(Rectangle::new(33.0, 33.0, 200.0, 100.0), Rectangle::new(43.0, 53.0, 200.0, 100.0));
        assert_eq!(s.screen_to_local(Point::new(50.0, 60.0)), Some(Point::new(7.0, 7.0)));
        assert_eq!(s.screen_to_local(Point::new(10.0, 60.0)), None);
    }
}
