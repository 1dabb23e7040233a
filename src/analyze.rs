//! Bottleneck and timeline analysis over exported profiles
//!
//! Pure computation over a parsed [`JsonProfile`]: per-operation statistics
//! ranked by total time, bottleneck detection against configurable
//! thresholds, prioritized recommendations, and a fixed-width activity
//! histogram. Consumers render; nothing here prints.
//!
//! Suggestions are derived from each operation's statistical shape (share
//! of runtime, per-call average, spread between average and worst case),
//! not from its name.

use crate::export::JsonProfile;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Share of total runtime above which an operation dominates the profile.
const DOMINANT_PERCENT: f64 = 50.0;
/// Share of total runtime that makes an operation a major cost.
const MAJOR_PERCENT: f64 = 30.0;
/// Per-call average that is slow regardless of share.
const SLOW_CALL_AVG: Duration = Duration::from_secs(1);

/// Per-operation statistics derived from an exported profile.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationAnalysis {
    /// Full hierarchical operation name.
    pub name: String,
    pub calls: u64,
    pub total: Duration,
    pub avg: Duration,
    pub min: Duration,
    pub max: Duration,
    /// Element at `len / 2` of the sorted durations, zero with no samples.
    pub median: Duration,
    /// Share of the profile's grand total, zero when the total is zero.
    pub percent: f64,
}

/// One detected bottleneck with its optimization suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct Bottleneck {
    pub name: String,
    pub total: Duration,
    pub percent: f64,
    pub calls: u64,
    pub avg: Duration,
    pub max: Duration,
    pub suggestion: String,
}

/// Recommendation priority, highest first in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
        }
    }
}

/// One prioritized optimization recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub priority: Priority,
    /// Operation the recommendation applies to.
    pub area: String,
    pub issue: String,
    pub actions: Vec<String>,
}

/// One fixed-width activity bucket, offsets relative to the first recorded
/// activity in the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBucket {
    /// Bucket start offset.
    pub start: Duration,
    /// Regions started plus checkpoints recorded within the bucket.
    pub count: u64,
    /// Summed duration of regions started within the bucket.
    pub total: Duration,
}

/// Compute per-operation statistics, ranked by total time descending.
/// Entries with equal totals keep their file order.
pub fn analyze_operations(profile: &JsonProfile) -> Vec<OperationAnalysis> {
    let grand_total = profile.total_time();

    let mut analyses: Vec<OperationAnalysis> = profile
        .operations
        .iter()
        .map(|op| {
            let total = Duration::from_nanos(op.total_ns);
            let avg = if op.call_count == 0 {
                Duration::ZERO
            } else {
                Duration::from_secs_f64(total.as_secs_f64() / op.call_count as f64)
            };

            let mut durations: Vec<u64> = op.samples.iter().map(|s| s.duration_ns).collect();
            durations.sort_unstable();
            let min = durations.first().map_or(Duration::ZERO, |&ns| Duration::from_nanos(ns));
            let max = durations.last().map_or(Duration::ZERO, |&ns| Duration::from_nanos(ns));
            let median = if durations.is_empty() {
                Duration::ZERO
            } else {
                Duration::from_nanos(durations[durations.len() / 2])
            };

            OperationAnalysis {
                name: op.name.clone(),
                calls: op.call_count,
                total,
                avg,
                min,
                max,
                median,
                percent: percent_of(total, grand_total),
            }
        })
        .collect();

    analyses.sort_by(|a, b| b.total.cmp(&a.total));
    analyses
}

/// Filter ranked operations down to bottlenecks: any entry whose share of
/// total time exceeds `percent_threshold` or whose per-call average exceeds
/// `avg_threshold`.
pub fn find_bottlenecks(
    operations: &[OperationAnalysis],
    percent_threshold: f64,
    avg_threshold: Duration,
) -> Vec<Bottleneck> {
    operations
        .iter()
        .filter(|op| op.percent > percent_threshold || op.avg > avg_threshold)
        .map(|op| Bottleneck {
            name: op.name.clone(),
            total: op.total,
            percent: op.percent,
            calls: op.calls,
            avg: op.avg,
            max: op.max,
            suggestion: suggest(op, avg_threshold),
        })
        .collect()
}

/// Pick a suggestion from the operation's statistical shape.
fn suggest(op: &OperationAnalysis, avg_threshold: Duration) -> String {
    if op.percent >= DOMINANT_PERCENT {
        return "Parallelize independent work or cache results; this dominates the runtime"
            .to_string();
    }
    if op.avg > avg_threshold {
        if op.calls == 1 {
            return "Split the call into smaller measured steps to find the slow part".to_string();
        }
        return "Batch work into fewer calls or trim per-call overhead".to_string();
    }
    if op.calls > 1 && op.max >= op.avg * 2 {
        return "Investigate the slowest invocations; durations vary widely between calls"
            .to_string();
    }
    "Reduce the call count or the per-call cost".to_string()
}

/// Derive prioritized recommendations from ranked operations. At most one
/// recommendation per operation; HIGH priority entries sort first.
pub fn recommendations(operations: &[OperationAnalysis]) -> Vec<Recommendation> {
    let mut recs: Vec<Recommendation> = operations
        .iter()
        .filter_map(|op| {
            if op.percent > DOMINANT_PERCENT {
                Some(Recommendation {
                    priority: Priority::High,
                    area: op.name.clone(),
                    issue: format!("taking {:.1}% of total time", op.percent),
                    actions: vec![
                        "Run independent sub-steps in parallel".to_string(),
                        "Cache results that are recomputed between calls".to_string(),
                        "Split the region into smaller measured steps to localize the cost"
                            .to_string(),
                    ],
                })
            } else if op.avg > SLOW_CALL_AVG && op.calls > 1 {
                Some(Recommendation {
                    priority: Priority::Medium,
                    area: op.name.clone(),
                    issue: format!(
                        "average {:.2}s per call over {} calls",
                        op.avg.as_secs_f64(),
                        op.calls
                    ),
                    actions: vec![
                        "Batch several units of work into one call".to_string(),
                        "Cache repeated lookups locally".to_string(),
                        "Check whether an external service is rate-limiting requests".to_string(),
                    ],
                })
            } else if op.percent > MAJOR_PERCENT {
                Some(Recommendation {
                    priority: Priority::Medium,
                    area: op.name.clone(),
                    issue: format!("taking {:.1}% of total time", op.percent),
                    actions: vec![
                        "Profile one invocation with finer-grained nested regions".to_string(),
                        "Move the work off the critical path if its results can wait".to_string(),
                    ],
                })
            } else {
                None
            }
        })
        .collect();

    recs.sort_by_key(|rec| rec.priority);
    recs
}

/// Histogram of activity over time since the first recorded start.
///
/// Each region start and each checkpoint counts toward the bucket its
/// offset falls in; region durations are summed into the bucket where the
/// region started. Only non-empty buckets are returned, in time order.
pub fn timeline(profile: &JsonProfile, bucket_width: Duration) -> Vec<TimelineBucket> {
    let width_ns = bucket_width.as_nanos() as u64;
    if width_ns == 0 {
        return Vec::new();
    }

    let starts: Vec<(u64, u64)> = profile
        .operations
        .iter()
        .flat_map(|op| op.samples.iter().map(|s| (s.started_at_ns, s.duration_ns)))
        .chain(profile.checkpoints.iter().map(|cp| (cp.at_ns, 0)))
        .collect();

    let base = match starts.iter().map(|&(start, _)| start).min() {
        Some(base) => base,
        None => return Vec::new(),
    };

    let mut buckets: BTreeMap<u64, (u64, u64)> = BTreeMap::new();
    for &(start, duration_ns) in &starts {
        let index = (start - base) / width_ns;
        let bucket = buckets.entry(index).or_insert((0, 0));
        bucket.0 += 1;
        // hand-edited profiles can carry durations that overflow a sum
        bucket.1 = bucket.1.saturating_add(duration_ns);
    }

    buckets
        .into_iter()
        .map(|(index, (count, total_ns))| TimelineBucket {
            start: Duration::from_nanos(index * width_ns),
            count,
            total: Duration::from_nanos(total_ns),
        })
        .collect()
}

fn percent_of(part: Duration, whole: Duration) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    part.as_secs_f64() / whole.as_secs_f64() * 100.0
}
