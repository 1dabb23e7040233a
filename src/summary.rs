//! Ranked report model built from a snapshot
//!
//! [`summarize`] turns a [`ProfileSnapshot`] into plain rows: operations
//! ranked by total time with percentage-of-total, plus the slowest
//! individual invocations across all names. Rendering lives in
//! [`crate::report`]; this module only computes.

use crate::metadata::Metadata;
use crate::stats::{CheckpointEvent, ProfileSnapshot};
use std::time::Duration;

/// Default number of rows retained by [`summarize`].
pub const DEFAULT_TOP_N: usize = 20;

/// One ranked operation row.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// Full hierarchical operation name.
    pub name: String,
    /// Sum of all completed durations under this name.
    pub total: Duration,
    /// Number of completed invocations.
    pub calls: u64,
    /// Average duration per invocation.
    pub avg: Duration,
    /// Share of the grand total, in percent. Zero when nothing was recorded.
    pub percent: f64,
}

/// One individual invocation in the slowest-operations ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct SlowestRow {
    /// Full hierarchical name of the operation the invocation belongs to.
    pub name: String,
    /// Duration of this single invocation.
    pub duration: Duration,
    /// Metadata supplied with this invocation.
    pub metadata: Metadata,
}

/// Report model: ranked rows plus the slowest individual invocations.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Sum of every operation's total duration. Checkpoints contribute
    /// nothing.
    pub grand_total: Duration,
    /// Operations ranked by total duration descending, ties broken by
    /// creation order, truncated to `top_n`.
    pub rows: Vec<SummaryRow>,
    /// Individual invocations ranked by duration descending, truncated to
    /// `top_n`.
    pub slowest: Vec<SlowestRow>,
    /// Checkpoints in record order.
    pub checkpoints: Vec<CheckpointEvent>,
}

impl Summary {
    /// True when nothing was recorded at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.checkpoints.is_empty()
    }
}

/// Rank a snapshot's operations and produce the report model.
///
/// Percentages are computed against the grand total and are zero when the
/// grand total is zero, so a profile of empty or instantaneous regions
/// never divides by zero.
pub fn summarize(snapshot: &ProfileSnapshot, top_n: usize) -> Summary {
    let grand_total = snapshot.grand_total();

    // Snapshot operations arrive in creation order; the stable sort keeps
    // that order for equal totals.
    let mut ranked: Vec<_> = snapshot.operations.iter().collect();
    ranked.sort_by(|a, b| b.total_duration.cmp(&a.total_duration));

    let rows = ranked
        .iter()
        .take(top_n)
        .map(|op| SummaryRow {
            name: op.name.clone(),
            total: op.total_duration,
            calls: op.call_count,
            avg: op.avg_duration(),
            percent: percent_of(op.total_duration, grand_total),
        })
        .collect();

    let mut invocations: Vec<SlowestRow> = snapshot
        .operations
        .iter()
        .flat_map(|op| {
            op.samples.iter().map(|sample| SlowestRow {
                name: op.name.clone(),
                duration: sample.duration,
                metadata: sample.metadata.clone(),
            })
        })
        .collect();
    invocations.sort_by(|a, b| b.duration.cmp(&a.duration));
    invocations.truncate(top_n);

    Summary {
        grand_total,
        rows,
        slowest: invocations,
        checkpoints: snapshot.checkpoints.clone(),
    }
}

fn percent_of(part: Duration, whole: Duration) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    part.as_secs_f64() / whole.as_secs_f64() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;
    use crate::stats::{OperationStats, RegionSample};

    fn op(name: &str, seq: u64, durations_secs: &[u64]) -> OperationStats {
        let mut stats = OperationStats::new(name.to_string(), seq);
        let mut at = Duration::ZERO;
        for &secs in durations_secs {
            let duration = Duration::from_secs(secs);
            stats.record(RegionSample {
                started_at: at,
                duration,
                metadata: Metadata::new(),
            });
            at += duration;
        }
        stats
    }

    fn snapshot_of(operations: Vec<OperationStats>) -> ProfileSnapshot {
        ProfileSnapshot {
            operations,
            checkpoints: Vec::new(),
        }
    }

    #[test]
    fn test_ranking_and_percentages() {
        // totals 10s, 5s, 1s; grand total 16s
        let snapshot = snapshot_of(vec![
            op("one", 0, &[1]),
            op("ten", 1, &[10]),
            op("five", 2, &[5]),
        ]);
        let summary = summarize(&snapshot, 2);

        assert_eq!(summary.grand_total, Duration::from_secs(16));
        assert_eq!(summary.rows.len(), 2);
        assert_eq!(summary.rows[0].name, "ten");
        assert!((summary.rows[0].percent - 62.5).abs() < 1e-9);
        assert_eq!(summary.rows[1].name, "five");
        assert!((summary.rows[1].percent - 31.25).abs() < 1e-9);
    }

    #[test]
    fn test_ties_keep_creation_order() {
        let snapshot = snapshot_of(vec![
            op("first", 0, &[3]),
            op("second", 1, &[3]),
            op("third", 2, &[3]),
        ]);
        let summary = summarize(&snapshot, 10);
        let names: Vec<&str> = summary.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_zero_grand_total_yields_zero_percent() {
        let snapshot = snapshot_of(vec![op("instant", 0, &[0]), op("also", 1, &[0, 0])]);
        let summary = summarize(&snapshot, 10);
        assert_eq!(summary.grand_total, Duration::ZERO);
        assert!(summary.rows.iter().all(|r| r.percent == 0.0));
    }

    #[test]
    fn test_avg_per_row() {
        let snapshot = snapshot_of(vec![op("fetch", 0, &[2, 4])]);
        let summary = summarize(&snapshot, 10);
        assert_eq!(summary.rows[0].calls, 2);
        assert_eq!(summary.rows[0].avg, Duration::from_secs(3));
    }

    #[test]
    fn test_slowest_ranks_individual_invocations() {
        // "bulk" has the largest total but "spike" holds the single slowest
        // invocation
        let snapshot = snapshot_of(vec![op("bulk", 0, &[4, 4, 4]), op("spike", 1, &[9])]);
        let summary = summarize(&snapshot, 10);

        assert_eq!(summary.rows[0].name, "bulk");
        assert_eq!(summary.slowest[0].name, "spike");
        assert_eq!(summary.slowest[0].duration, Duration::from_secs(9));
        assert_eq!(summary.slowest.len(), 4);
    }

    #[test]
    fn test_slowest_is_truncated_to_top_n() {
        let snapshot = snapshot_of(vec![op("many", 0, &[1, 2, 3, 4, 5])]);
        let summary = summarize(&snapshot, 3);
        assert_eq!(summary.slowest.len(), 3);
        assert_eq!(summary.slowest[0].duration, Duration::from_secs(5));
    }

    #[test]
    fn test_empty_snapshot_summary() {
        let summary = summarize(&ProfileSnapshot::default(), DEFAULT_TOP_N);
        assert!(summary.is_empty());
        assert_eq!(summary.grand_total, Duration::ZERO);
    }

    #[test]
    fn test_checkpoints_pass_through() {
        let snapshot = ProfileSnapshot {
            operations: Vec::new(),
            checkpoints: vec![CheckpointEvent {
                name: "loaded".to_string(),
                at: Duration::from_secs(1),
                metadata: Metadata::new(),
            }],
        };
        let summary = summarize(&snapshot, DEFAULT_TOP_N);
        assert!(!summary.is_empty());
        assert_eq!(summary.checkpoints.len(), 1);
    }
}
