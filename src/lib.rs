//! airsent - Airline sentiment dashboard
//!
//! This is the main crate that ties the workspace together and provides the
//! static report generator.

pub use airsent_common as common;
pub use airsent_query as query;

pub mod report;

/// Re-export common types and utilities
pub mod prelude {
    pub use crate::common::{AirsentError, DashboardConfig};
    pub use crate::query::*;
}
