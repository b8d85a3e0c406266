use std::fmt::{Display, Formatter, Result as FmtResult};

/// Root error type. The drawing core itself never produces one: only the
/// edges (record validation, surface acquisition, config parsing) do.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Validation(ValidationError),
    Rendering(RenderingError),
    Configuration(ConfigurationError),
}

/// Structural problems with an externally supplied record
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NoChannels,
    RaggedChannels { lead: usize, expected: usize, actual: usize },
    InvalidSampleRate(f64),
    IndexOutOfRange { what: &'static str, index: usize, len: usize },
}

/// Drawing surface errors
#[derive(Debug, Clone, PartialEq)]
pub enum RenderingError {
    CanvasNotFound(String),
    ContextUnavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    Parse(String),
    InvalidParameter(String),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AppError::Validation(e) => write!(f, "Validation Error: {}", e),
            AppError::Rendering(e) => write!(f, "Rendering Error: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration Error: {}", e),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ValidationError::NoChannels => write!(f, "record has no signal channels"),
            ValidationError::RaggedChannels { lead, expected, actual } => write!(
                f,
                "channel {} has {} samples, expected {}",
                lead, actual, expected
            ),
            ValidationError::InvalidSampleRate(rate) => write!(f, "invalid sample rate {}", rate),
            ValidationError::IndexOutOfRange { what, index, len } => {
                write!(f, "{} index {} outside 0..{}", what, index, len)
            }
        }
    }
}

impl Display for RenderingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RenderingError::CanvasNotFound(id) => write!(f, "canvas '{}' not found", id),
            RenderingError::ContextUnavailable(msg) => write!(f, "2d context unavailable: {}", msg),
        }
    }
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ConfigurationError::Parse(msg) => write!(f, "parse failed: {}", msg),
            ConfigurationError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        AppError::Validation(error)
    }
}

impl From<RenderingError> for AppError {
    fn from(error: RenderingError) -> Self {
        AppError::Rendering(error)
    }
}

impl From<ConfigurationError> for AppError {
    fn from(error: ConfigurationError) -> Self {
        AppError::Configuration(error)
    }
}

pub type RenderingResult<T> = Result<T, AppError>;
