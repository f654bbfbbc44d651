//! Analytics adapters.
//!
//! - `HttpAnalyticsSink` - Posts events to the configured analytics endpoint

mod http_sink;

pub use http_sink::HttpAnalyticsSink;
