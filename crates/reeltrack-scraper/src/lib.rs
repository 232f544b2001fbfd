pub mod client;
pub mod coerce;
pub mod error;
pub(crate) mod retry;

pub use client::{extract_metrics, ApifyClient, PostMetrics, PROVIDER};
pub use coerce::coerce_int;
pub use error::ScraperError;
