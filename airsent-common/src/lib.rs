pub mod error;
pub mod config;

pub use error::{AirsentError, Result};
pub use config::{load_config, ConfigSource, DashboardConfig, WordCloudConfig};
