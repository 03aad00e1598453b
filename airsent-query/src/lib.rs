//! Query layer for the airline sentiment dashboard
//!
//! This crate holds everything between the tweets CSV and a rendered page:
//! - one-time ingest into an immutable [`Dataset`]
//! - filtering and aggregation (tallies, geo filter, breakdown, word corpus)
//! - word frequencies for the word cloud
//! - assembly of a [`DashboardView`] from the current control values
//! - HTML rendering with client-side Plotly charts

pub mod coords;
pub mod dataset;
pub mod post;
pub mod query;
pub mod render;
pub mod view;
pub mod words;

pub use coords::{parse_coordinates, Coordinates};
pub use dataset::{Dataset, LoadStats, REQUIRED_COLUMNS};
pub use post::{parse_timestamp, Post};
pub use query::{clean_tokens, hour_caption, sorted_tally, Breakdown, BreakdownRow, GeoPoint, TallyEntry};
pub use render::{render_page, RenderOptions};
pub use view::{ChartKind, DashboardParams, DashboardQuery, DashboardView, SampleSection, Visibility};
pub use words::{stopword_set, word_frequencies, WordCount, STOPWORDS};
