//! Per-operation accumulation and snapshot types
//!
//! An operation entry accumulates every completed invocation recorded under
//! one hierarchical name. Entries are created on first use and never removed
//! for the lifetime of their profiler; [`ProfileSnapshot`] is the copy-on-read
//! view handed to summaries and exports.

use crate::metadata::Metadata;
use std::time::Duration;

/// One completed invocation of a timed region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSample {
    /// Offset from the profiler epoch at which the region was opened.
    pub started_at: Duration,
    /// Wall-clock time between open and close.
    pub duration: Duration,
    /// Metadata supplied when the region was opened.
    pub metadata: Metadata,
}

/// Accumulated statistics for one hierarchical operation name.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationStats {
    /// Full hierarchical name, the aggregation key.
    pub name: String,
    /// Number of completed invocations under this name.
    pub call_count: u64,
    /// Sum of all completed durations.
    pub total_duration: Duration,
    /// Individual invocations in completion order.
    pub samples: Vec<RegionSample>,
    /// Metadata from the most recent invocation that supplied any.
    pub metadata: Metadata,
    /// Creation order of this entry within its profiler, used for stable
    /// ranking when totals tie.
    pub(crate) seq: u64,
}

impl OperationStats {
    pub(crate) fn new(name: String, seq: u64) -> Self {
        Self {
            name,
            call_count: 0,
            total_duration: Duration::ZERO,
            samples: Vec::new(),
            metadata: Metadata::new(),
            seq,
        }
    }

    /// Merge one completed invocation. Count, total, and the sample list are
    /// updated together so they never disagree.
    pub(crate) fn record(&mut self, sample: RegionSample) {
        self.call_count += 1;
        self.total_duration += sample.duration;
        if !sample.metadata.is_empty() {
            self.metadata = sample.metadata.clone();
        }
        self.samples.push(sample);
    }

    /// Average duration per call, zero when nothing has completed.
    pub fn avg_duration(&self) -> Duration {
        if self.call_count == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.total_duration.as_secs_f64() / self.call_count as f64)
    }

    /// Shortest recorded invocation, zero when nothing has completed.
    pub fn min_duration(&self) -> Duration {
        self.samples
            .iter()
            .map(|s| s.duration)
            .min()
            .unwrap_or(Duration::ZERO)
    }

    /// Longest recorded invocation, zero when nothing has completed.
    pub fn max_duration(&self) -> Duration {
        self.samples
            .iter()
            .map(|s| s.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

/// A zero-duration, timestamped marker recorded outside any region.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointEvent {
    /// Checkpoint name, not aggregated or deduplicated.
    pub name: String,
    /// Offset from the profiler epoch at which the checkpoint was recorded.
    pub at: Duration,
    /// Metadata supplied with the checkpoint.
    pub metadata: Metadata,
}

/// Immutable copy of profiler state taken at one instant.
///
/// Safe to read while recording continues elsewhere; two snapshots taken
/// with no mutation in between compare equal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileSnapshot {
    /// Per-name statistics in entry creation order.
    pub operations: Vec<OperationStats>,
    /// Checkpoint events in record order.
    pub checkpoints: Vec<CheckpointEvent>,
}

impl ProfileSnapshot {
    /// Sum of all operations' total durations.
    pub fn grand_total(&self) -> Duration {
        self.operations.iter().map(|op| op.total_duration).sum()
    }

    /// Total completed invocations across all operations.
    pub fn total_calls(&self) -> u64 {
        self.operations.iter().map(|op| op.call_count).sum()
    }

    /// True when nothing was recorded: no operations and no checkpoints.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.checkpoints.is_empty()
    }

    /// Look up one operation entry by its full hierarchical name.
    pub fn operation(&self, name: &str) -> Option<&OperationStats> {
        self.operations.iter().find(|op| op.name == name)
    }
}
