use super::surface::DrawingSurface;
use crate::domain::errors::{AppError, RenderingError};
use crate::domain::logging::LogComponent;
use crate::log_warn;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// `DrawingSurface` over a browser canvas 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, AppError> {
        let context = canvas
            .get_context("2d")
            .map_err(|e| RenderingError::ContextUnavailable(format!("{:?}", e)))?
            .ok_or_else(|| RenderingError::ContextUnavailable("get_context returned null".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderingError::ContextUnavailable("not a 2d context".to_string()))?;
        Ok(Self { canvas, context })
    }

    pub fn from_canvas_id(canvas_id: &str) -> Result<Self, AppError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| RenderingError::CanvasNotFound(canvas_id.to_string()))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| RenderingError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| RenderingError::CanvasNotFound(canvas_id.to_string()))?;
        Self::new(canvas)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl DrawingSurface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        self.context.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn begin_path(&mut self) {
        self.context.begin_path();
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        if let Err(e) = self.context.arc(x, y, radius.max(0.0), start_angle, end_angle) {
            log_warn!(LogComponent::Infrastructure("CanvasSurface"), "arc failed: {:?}", e);
        }
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.context.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.context.set_fill_style_str(color);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.context.set_global_alpha(alpha);
    }

    fn set_line_width(&mut self, width: f64) {
        self.context.set_line_width(width);
    }

    fn stroke(&mut self) {
        self.context.stroke();
    }

    fn fill(&mut self) {
        self.context.fill();
    }
}
