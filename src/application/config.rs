use crate::domain::drawing::ClientStyle;
use crate::domain::drawing::view_state::DEFAULT_MICROVOLTS_PER_CELL;
use crate::domain::errors::{AppError, ConfigurationError};
use serde::{Deserialize, Serialize};

/// Chart settings. Every field has a default, so partial JSON is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Inset of the drawing container inside the canvas, px
    pub padding: f64,
    /// Voltage span mapped onto one cell height
    pub microvolts_per_cell: f64,
    pub pin_beats: bool,
    /// Half-width of the floating peak search window, px
    pub peak_window_px: f64,
    /// Display sample rate; `None` draws at the recorded rate
    pub sample_rate: Option<f64>,
    pub show_floating_point: bool,
    pub show_floating_peak: bool,
    pub signal_style: ClientStyle,
    pub beats_style: ClientStyle,
    pub annotation_style: ClientStyle,
    pub pqrst_style: ClientStyle,
    pub floating_point_style: ClientStyle,
    pub floating_peak_style: ClientStyle,
    pub grid_style: ClientStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            padding: 33.0,
            microvolts_per_cell: DEFAULT_MICROVOLTS_PER_CELL,
            pin_beats: true,
            peak_window_px: 20.0,
            sample_rate: None,
            show_floating_point: true,
            show_floating_peak: false,
            signal_style: ClientStyle::stroke("#008662", 1.0),
            beats_style: ClientStyle::markers("orange", 1.0, 2.0),
            annotation_style: ClientStyle::stroke("#3b82f6", 0.2),
            pqrst_style: ClientStyle::stroke("#6b21a8", 0.6),
            floating_point_style: ClientStyle::crosshair("#9ca3af", "#dc2626", 1.0, 3.0),
            floating_peak_style: ClientStyle::crosshair("#9ca3af", "#2563eb", 1.0, 3.0),
            grid_style: ClientStyle::stroke("red", 0.15),
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let config: ChartConfig =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(ConfigurationError::InvalidParameter(format!("padding {}", self.padding)));
        }
        if !self.microvolts_per_cell.is_finite() || self.microvolts_per_cell <= 0.0 {
            return Err(ConfigurationError::InvalidParameter(format!(
                "microvolts_per_cell {}",
                self.microvolts_per_cell
            )));
        }
        if !self.peak_window_px.is_finite() || self.peak_window_px < 0.0 {
            return Err(ConfigurationError::InvalidParameter(format!("peak_window_px {}", self.peak_window_px)));
        }
        if let Some(rate) = self.sample_rate {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(ConfigurationError::InvalidParameter(format!("sample_rate {}", rate)));
            }
        }
        Ok(())
    }
}
