//! Logging seam shared by every chart layer. The domain only sees the
//! [`Logger`] and [`TimeProvider`] traits; the browser console and clock are
//! plugged in from `infrastructure::services` at module start.

use derive_more::Display;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display)]
pub enum LogLevel {
    #[display(fmt = "TRACE")]
    Trace = 0,
    #[display(fmt = "DEBUG")]
    Debug = 1,
    #[display(fmt = " INFO")]
    Info = 2,
    #[display(fmt = " WARN")]
    Warn = 3,
    #[display(fmt = "ERROR")]
    Error = 4,
}

/// Which part of the chart pipeline wrote the entry: the layer prefix plus
/// a subsystem name such as `DrawingProxy`, `ChartHost` or `CanvasSurface`.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LogComponent {
    /// Proxy, view state, culling and object preparation.
    #[display(fmt = "DOM:{}", _0)]
    Domain(&'static str),
    /// Chart host and its configuration.
    #[display(fmt = "APP:{}", _0)]
    Application(&'static str),
    /// Canvas surface, renderers and browser services.
    #[display(fmt = "INF:{}", _0)]
    Infrastructure(&'static str),
    /// The `EcgChart` JS facade.
    #[display(fmt = "PRE:{}", _0)]
    Presentation(&'static str),
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: u64,
    pub level: LogLevel,
    pub component: LogComponent,
    pub message: String,
    /// `key=value` context, e.g. the record index or lead a message is about.
    pub fields: Vec<(&'static str, String)>,
}

impl LogEntry {
    pub fn new(level: LogLevel, component: LogComponent, message: &str) -> Self {
        Self {
            timestamp: get_time_provider().current_timestamp(),
            level,
            component,
            message: message.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: &'static str, value: impl ToString) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    /// `[time] LEVEL component | message | key=value key=value`
    pub fn format(&self) -> String {
        let timestamp = get_time_provider().format_timestamp(self.timestamp);
        let head = format!("[{}] {} {} | {}", timestamp, self.level, self.component, self.message);
        if self.fields.is_empty() {
            return head;
        }
        let fields: Vec<String> = self.fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        format!("{} | {}", head, fields.join(" "))
    }
}

pub trait TimeProvider: Send + Sync {
    fn current_timestamp(&self) -> u64;
    fn format_timestamp(&self, timestamp: u64) -> String;
}

pub trait Logger: Send + Sync {
    fn log(&self, entry: LogEntry);

    fn trace(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Trace, component, message));
    }

    fn debug(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Debug, component, message));
    }

    fn info(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Info, component, message));
    }

    fn warn(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Warn, component, message));
    }

    fn error(&self, component: LogComponent, message: &str) {
        self.log(LogEntry::new(LogLevel::Error, component, message));
    }

    /// Entry about one record of the strip, optionally narrowed to a lead.
    fn record_event(&self, level: LogLevel, component: LogComponent, message: &str, record: usize, lead: Option<&str>) {
        let entry = LogEntry::new(level, component, message).with_field("record", record);
        self.log(match lead {
            Some(lead) => entry.with_field("lead", lead),
            None => entry,
        });
    }
}

static GLOBAL_LOGGER: OnceLock<Box<dyn Logger + Sync + Send>> = OnceLock::new();
static GLOBAL_TIME_PROVIDER: OnceLock<Box<dyn TimeProvider + Sync + Send>> = OnceLock::new();

/// Install the logger. Only the first call takes effect.
pub fn init_logger(logger: Box<dyn Logger + Sync + Send>) {
    let _ = GLOBAL_LOGGER.set(logger);
}

/// Install the clock. Only the first call takes effect.
pub fn init_time_provider(time_provider: Box<dyn TimeProvider + Sync + Send>) {
    let _ = GLOBAL_TIME_PROVIDER.set(time_provider);
}

/// Native tests and benches never install a logger and get a silent one.
pub fn get_logger() -> &'static dyn Logger {
    GLOBAL_LOGGER.get().map(|logger| logger.as_ref()).unwrap_or(&SilentLogger)
}

pub fn get_time_provider() -> &'static dyn TimeProvider {
    GLOBAL_TIME_PROVIDER.get().map(|provider| provider.as_ref()).unwrap_or(&SequenceClock)
}

struct SilentLogger;
impl Logger for SilentLogger {
    fn log(&self, _entry: LogEntry) {}
}

/// Stands in for the browser clock: numbers entries in emission order.
struct SequenceClock;
impl TimeProvider for SequenceClock {
    fn current_timestamp(&self) -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static SEQUENCE: AtomicU64 = AtomicU64::new(0);
        SEQUENCE.fetch_add(1, Ordering::SeqCst)
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format!("#{:06}", timestamp)
    }
}

// trace and debug vanish from release builds; the proxy logs per rebuild
#[macro_export]
macro_rules! log_trace {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::domain::logging::get_logger().trace($component, &format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_debug {
    ($component:expr, $($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            $crate::domain::logging::get_logger().debug($component, &format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::get_logger().info($component, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::get_logger().warn($component, &format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($component:expr, $($arg:tt)*) => {
        $crate::domain::logging::get_logger().error($component, &format!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn component_display_carries_layer_prefix() {
        assert_eq!(LogComponent::Domain("DrawingProxy").to_string(), "DOM:DrawingProxy");
        assert_eq!(LogComponent::Infrastructure("CanvasSurface").to_string(), "INF:CanvasSurface");
    }

    #[test]
    fn dropped_record_entry_lists_its_fields() {
        let entry = LogEntry::new(LogLevel::Warn, LogComponent::Application("ChartHost"), "record dropped")
            .with_field("record", 3)
            .with_field("lead", "V1");
        let line = entry.format();
        assert!(line.contains(" WARN APP:ChartHost | record dropped | record=3 lead=V1"), "{}", line);
    }

    #[test]
    fn entry_without_fields_ends_at_message() {
        let line = LogEntry::new(LogLevel::Info, LogComponent::Presentation("EcgChart"), "ready").format();
        assert!(line.ends_with("PRE:EcgChart | ready"), "{}", line);
    }

    #[test]
    fn record_event_narrows_to_lead_when_given() {
        struct Capture(Mutex<Vec<LogEntry>>);
        impl Logger for Capture {
            fn log(&self, entry: LogEntry) {
                if let Ok(mut entries) = self.0.lock() {
                    entries.push(entry);
                }
            }
        }

        let capture = Capture(Mutex::new(Vec::new()));
        capture.record_event(LogLevel::Warn, LogComponent::Domain("ViewState"), "no cell", 2, Some("aVF"));
        capture.record_event(LogLevel::Info, LogComponent::Domain("DrawingProxy"), "built", 0, None);

        let entries = capture.0.lock().expect("lock");
        assert_eq!(entries[0].fields, vec![("record", "2".to_string()), ("lead", "aVF".to_string())]);
        assert_eq!(entries[1].fields, vec![("record", "0".to_string())]);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
