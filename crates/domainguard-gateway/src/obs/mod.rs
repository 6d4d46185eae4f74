//! Lightweight in-process metrics.
//!
//! Counters and histograms are stored as atomics keyed by label values and
//! rendered by the `/metrics` handler in Prometheus text format.

pub mod metrics;

pub use metrics::PipelineMetrics;
