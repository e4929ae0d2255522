//! Observability infrastructure
//!
//! In-process counters fed through the core `SyncObserver` port. Log output
//! itself goes through `tracing` and is configured by the binary.
//!
//! ## Memory Ordering
//! SeqCst for counters used in derived metrics (averages), Relaxed for
//! independent counters.

pub mod metrics;

pub use metrics::{SyncMetrics, SyncMetricsSnapshot};
