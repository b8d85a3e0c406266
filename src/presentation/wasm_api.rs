use wasm_bindgen::prelude::*;

use crate::application::{ChartConfig, ChartHost};
use crate::domain::ecg::{EcgLeadCode, EcgRecord};
use crate::domain::errors::{AppError, ConfigurationError};
use crate::domain::geometry::Point;
use crate::domain::logging::LogComponent;
use crate::infrastructure::rendering::CanvasSurface;
use crate::log_debug;

fn to_js(error: AppError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| to_js(ConfigurationError::Parse(format!("{}: {}", what, e)).into()))
}

/// ECG strip chart bound to one canvas. Event wiring stays on the JS side:
/// callers forward page coordinates of pointer events.
#[wasm_bindgen]
pub struct EcgChart {
    host: ChartHost<CanvasSurface>,
}

#[wasm_bindgen]
impl EcgChart {
    /// `config_json` may be omitted or partial.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: Option<String>) -> Result<EcgChart, JsValue> {
        let config = match config_json {
            Some(json) => ChartConfig::from_json(&json).map_err(to_js)?,
            None => ChartConfig::default(),
        };
        let surface = CanvasSurface::from_canvas_id(canvas_id).map_err(to_js)?;
        log_debug!(LogComponent::Presentation("EcgChart"), "bound to canvas '{}'", canvas_id);
        Ok(Self { host: ChartHost::new(surface, config) })
    }

    /// Records as a JSON array. Returns the number of records accepted.
    #[wasm_bindgen(js_name = loadRecords)]
    pub fn load_records(&mut self, records_json: &str) -> Result<usize, JsValue> {
        let records: Vec<EcgRecord> = parse(records_json, "records")?;
        Ok(self.host.receive_records(records))
    }

    /// Lead codes as a JSON array, e.g. `["I", "II", "aVR"]`.
    #[wasm_bindgen(js_name = setLeads)]
    pub fn set_leads(&mut self, leads_json: &str, labels: Option<Vec<String>>) -> Result<(), JsValue> {
        let leads: Vec<EcgLeadCode> = parse(leads_json, "leads")?;
        self.host.set_leads(leads, labels.unwrap_or_default());
        Ok(())
    }

    #[wasm_bindgen(js_name = setSampleRate)]
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<(), JsValue> {
        self.host.set_sample_rate(sample_rate).map_err(to_js)
    }

    /// Canvas size plus its page offset, for pointer mapping.
    pub fn resize(&mut self, width: f64, height: f64, left: f64, top: f64) {
        self.host.resize(width, height, Point::new(left, top));
    }

    pub fn refresh(&mut self) {
        self.host.refresh();
    }

    #[wasm_bindgen(js_name = scrollBy)]
    pub fn scroll_by(&mut self, delta: f64) {
        self.host.scroll_by(delta);
    }

    #[wasm_bindgen(js_name = dragStart)]
    pub fn drag_start(&mut self, x: f64, y: f64) {
        self.host.drag_start(Point::new(x, y));
    }

    #[wasm_bindgen(js_name = dragMove)]
    pub fn drag_move(&mut self, x: f64, y: f64) {
        self.host.drag_move(Point::new(x, y));
    }

    #[wasm_bindgen(js_name = dragEnd)]
    pub fn drag_end(&mut self) {
        self.host.drag_end();
    }

    pub fn click(&mut self, x: f64, y: f64) {
        self.host.click(Point::new(x, y));
    }

    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&mut self, x: f64, y: f64) {
        self.host.double_click(Point::new(x, y));
    }

    #[wasm_bindgen(js_name = scrollOffset)]
    pub fn scroll_offset(&self) -> f64 {
        self.host.proxy().state.scroll
    }

    #[wasm_bindgen(js_name = limitPx)]
    pub fn limit_px(&self) -> f64 {
        self.host.proxy().state.limit_px
    }

    #[wasm_bindgen(js_name = visibleObjectCount)]
    pub fn visible_object_count(&self) -> usize {
        self.host.proxy().visible_objects().len()
    }

    /// Stop repainting. The chart stays usable for queries.
    pub fn destroy(&mut self) {
        self.host.teardown();
    }
}
