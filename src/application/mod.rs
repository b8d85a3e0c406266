pub mod chart_host;
pub mod config;

pub use chart_host::{ChartHost, HostClients};
pub use config::ChartConfig;
