//! Cronista - Lightweight wall-clock profiler with nested region timing
//!
//! This library measures named regions of code with RAII guards, aggregates
//! durations per hierarchical operation name, and renders ranked summaries.
//! Profiles export to JSON for offline analysis with the bundled `cronista`
//! binary.
//!
//! The core pieces:
//! - [`Profiler`] - Collects timings, checkpoints, and emits alerts
//! - [`RegionGuard`] - Times a region from creation to drop
//! - [`ProfileSnapshot`] - Point-in-time copy of collected data
//! - [`Summary`] - Ranked report over a snapshot
//!
//! # Simple Usage
//!
//! ```
//! use cronista::Profiler;
//!
//! let profiler = Profiler::new();
//!
//! {
//!     let _region = profiler.region("load");
//!     // timed work; nested regions become "load > step"
//! }
//!
//! profiler.checkpoint("load_done");
//! profiler.print_summary(20);
//! ```
//!
//! # Global Profiler
//!
//! Free functions mirror the instance API through a process-wide profiler,
//! configurable once at startup with [`init`]:
//!
//! ```
//! use cronista::metadata;
//!
//! {
//!     let _region = cronista::time_region("parse");
//! }
//! cronista::checkpoint_with("parsed", metadata! { "rows" => 42 });
//!
//! let snapshot = cronista::snapshot();
//! assert_eq!(snapshot.total_calls(), 1);
//! ```

pub mod analyze;
pub mod cli;
pub mod export;
pub mod metadata;
pub mod profiler;
pub mod region;
pub mod report;
pub mod stats;
pub mod summary;

pub use metadata::{MetaValue, Metadata};
pub use profiler::{
    checkpoint, checkpoint_with, export_json, init, measure, print_summary, profiler, reset,
    snapshot, time_region, time_region_with, wrap, Profiler, ProfilerConfig,
    DEFAULT_ALERT_THRESHOLD,
};
pub use region::RegionGuard;
pub use stats::{CheckpointEvent, OperationStats, ProfileSnapshot, RegionSample};
pub use summary::{summarize, SlowestRow, Summary, SummaryRow, DEFAULT_TOP_N};
