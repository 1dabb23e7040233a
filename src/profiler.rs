//! Wall-clock profiler: region timing, checkpoints, and aggregation
//!
//! A [`Profiler`] owns the shared stats map and checkpoint list. Regions are
//! opened with [`Profiler::region`] and recorded when the returned guard
//! drops; nested regions aggregate under `outer > inner` names. One profiler
//! may be shared freely across threads: the stats map is lock-protected and
//! each thread keeps its own nesting stack.
//!
//! A process-wide default instance is available through [`profiler`] and the
//! module-level convenience functions.

use crate::export;
use crate::metadata::{format_metadata, Metadata};
use crate::region::{ActiveRegion, RegionGuard};
use crate::report;
use crate::stats::{CheckpointEvent, OperationStats, ProfileSnapshot, RegionSample};
use crate::summary::{self, Summary};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[cfg(test)]
use std::sync::Arc;

pub(crate) const ERR_POISONED_LOCK: &str = "profiler lock poisoned by a panicking writer";

/// Regions at least this long trigger the real-time alert by default.
pub const DEFAULT_ALERT_THRESHOLD: Duration = Duration::from_secs(5);

/// Construction-time settings for a [`Profiler`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilerConfig {
    /// When false, every operation is a no-op and nothing is recorded.
    pub enabled: bool,
    /// Minimum duration for the real-time slow-region alert.
    pub alert_threshold: Duration,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

impl ProfilerConfig {
    /// Set whether the profiler records anything.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Shorthand for a config that records nothing.
    pub fn disabled(self) -> Self {
        self.enabled(false)
    }

    /// Set the slow-region alert threshold.
    pub fn alert_threshold(mut self, threshold: Duration) -> Self {
        self.alert_threshold = threshold;
        self
    }
}

/// Destination for caller-visible feedback lines (slow-region alerts,
/// checkpoint echoes, export confirmations).
#[derive(Debug)]
enum Feedback {
    Stderr,
    #[cfg(test)]
    Capture(Arc<Mutex<Vec<String>>>),
}

impl Feedback {
    fn emit(&self, line: String) {
        match self {
            Feedback::Stderr => eprintln!("{}", line),
            #[cfg(test)]
            Feedback::Capture(lines) => lines.lock().expect(ERR_POISONED_LOCK).push(line),
        }
    }
}

/// Shared mutable state: the stats map and the checkpoint list.
#[derive(Debug, Default)]
struct ProfilerState {
    operations: HashMap<String, OperationStats>,
    checkpoints: Vec<CheckpointEvent>,
    next_seq: u64,
}

/// Aggregates wall-clock timings of named regions.
///
/// # Examples
///
/// ```
/// use cronista::Profiler;
///
/// let profiler = Profiler::new();
/// {
///     let _outer = profiler.region("build");
///     let _inner = profiler.region("parse");
///     // measured work
/// }
/// let snapshot = profiler.snapshot();
/// assert!(snapshot.operation("build").is_some());
/// assert!(snapshot.operation("build > parse").is_some());
/// ```
#[derive(Debug)]
pub struct Profiler {
    enabled: bool,
    alert_threshold: Duration,
    /// All recorded offsets are relative to this instant.
    epoch: Instant,
    state: Mutex<ProfilerState>,
    /// Per-thread stacks of currently open base names. Each thread only
    /// touches its own entry; the map itself is shared so a guard that
    /// migrated threads can still reconcile its origin stack.
    stacks: Mutex<HashMap<ThreadId, Vec<String>>>,
    feedback: Feedback,
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Profiler {
    /// Create an enabled profiler with the default alert threshold.
    pub fn new() -> Self {
        Self::with_config(ProfilerConfig::default())
    }

    /// Create a profiler from explicit settings.
    pub fn with_config(config: ProfilerConfig) -> Self {
        Self {
            enabled: config.enabled,
            alert_threshold: config.alert_threshold,
            epoch: Instant::now(),
            state: Mutex::new(ProfilerState::default()),
            stacks: Mutex::new(HashMap::new()),
            feedback: Feedback::Stderr,
        }
    }

    /// Create a profiler whose feedback lines are captured instead of
    /// printed, for assertions on alerts and echoes.
    #[cfg(test)]
    pub(crate) fn with_captured_feedback(config: ProfilerConfig) -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let mut profiler = Self::with_config(config);
        profiler.feedback = Feedback::Capture(Arc::clone(&lines));
        (profiler, lines)
    }

    /// Whether this profiler records anything.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The slow-region alert threshold.
    pub fn alert_threshold(&self) -> Duration {
        self.alert_threshold
    }

    /// Open a timed region. The region closes when the returned guard drops,
    /// on every exit path including panics.
    ///
    /// Regions opened while another region is open on the same thread record
    /// under the `>`-joined hierarchical name.
    ///
    /// # Example
    /// ```
    /// use cronista::Profiler;
    ///
    /// let profiler = Profiler::new();
    /// {
    ///     let _region = profiler.region("fetch_batch");
    ///     // work being measured
    /// }
    /// assert_eq!(profiler.snapshot().operation("fetch_batch").unwrap().call_count, 1);
    /// ```
    pub fn region(&self, name: &str) -> RegionGuard<'_> {
        self.region_with(name, Metadata::new())
    }

    /// Open a timed region carrying metadata. The metadata is stored with
    /// the recorded sample and shown in slow-region alerts.
    pub fn region_with(&self, name: &str, metadata: Metadata) -> RegionGuard<'_> {
        if !self.enabled {
            return RegionGuard { inner: None };
        }

        let origin = thread::current().id();
        let full_name = {
            let mut stacks = self.stacks.lock().expect(ERR_POISONED_LOCK);
            let stack = stacks.entry(origin).or_default();
            let full_name = if stack.is_empty() {
                name.to_string()
            } else {
                format!("{} > {}", stack.join(" > "), name)
            };
            stack.push(name.to_string());
            full_name
        };

        // Clock starts after the stack bookkeeping so lock time is not
        // attributed to the caller's region.
        let started = Instant::now();
        RegionGuard {
            inner: Some(ActiveRegion {
                profiler: self,
                base_name: name.to_string(),
                full_name,
                started,
                started_at: started.duration_since(self.epoch),
                metadata,
                origin,
            }),
        }
    }

    /// Run `f` inside a region named `name` and return its result.
    ///
    /// The region is recorded even when `f` panics or returns an error; the
    /// panic or error then continues to the caller.
    ///
    /// # Example
    /// ```
    /// use cronista::Profiler;
    ///
    /// let profiler = Profiler::new();
    /// let parsed = profiler.measure("parse", || "42".parse::<u32>());
    /// assert_eq!(parsed, Ok(42));
    /// ```
    pub fn measure<F, R>(&self, name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _region = self.region(name);
        f()
    }

    /// Wrap a callable so that every invocation is measured under `name`.
    /// The name is fixed at wrap time.
    ///
    /// # Example
    /// ```
    /// use cronista::Profiler;
    ///
    /// let profiler = Profiler::new();
    /// let fetch = profiler.wrap("fetch", || 3 + 4);
    /// assert_eq!(fetch(), 7);
    /// assert_eq!(fetch(), 7);
    /// assert_eq!(profiler.snapshot().operation("fetch").unwrap().call_count, 2);
    /// ```
    pub fn wrap<'p, F, R>(&'p self, name: &str, f: F) -> impl Fn() -> R + 'p
    where
        F: Fn() -> R + 'p,
    {
        let name = name.to_string();
        move || {
            let _region = self.region(&name);
            f()
        }
    }

    /// Record a zero-duration checkpoint marker.
    pub fn checkpoint(&self, name: &str) {
        self.checkpoint_with(name, Metadata::new());
    }

    /// Record a checkpoint carrying metadata. Also echoes a `📍` line to the
    /// feedback stream at call time.
    pub fn checkpoint_with(&self, name: &str, metadata: Metadata) {
        if !self.enabled {
            return;
        }

        let line = if metadata.is_empty() {
            format!("📍 {}", name)
        } else {
            format!("📍 {} {}", name, format_metadata(&metadata))
        };

        let at = self.epoch.elapsed();
        {
            let mut state = self.state.lock().expect(ERR_POISONED_LOCK);
            state.checkpoints.push(CheckpointEvent {
                name: name.to_string(),
                at,
                metadata,
            });
        }
        self.feedback.emit(line);
    }

    /// Take an immutable copy of everything recorded so far.
    ///
    /// Safe to call while other threads keep recording; repeated calls with
    /// no recording in between return equal snapshots.
    pub fn snapshot(&self) -> ProfileSnapshot {
        let state = self.state.lock().expect(ERR_POISONED_LOCK);
        let mut operations: Vec<OperationStats> = state.operations.values().cloned().collect();
        operations.sort_by_key(|op| op.seq);
        ProfileSnapshot {
            operations,
            checkpoints: state.checkpoints.clone(),
        }
    }

    /// Clear all recorded operations and checkpoints. The enabled flag, the
    /// alert threshold, and the epoch are unchanged.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect(ERR_POISONED_LOCK);
        state.operations.clear();
        state.checkpoints.clear();
        state.next_seq = 0;
        debug!("profiler state cleared");
    }

    /// Rank recorded operations and produce the report model.
    pub fn summarize(&self, top_n: usize) -> Summary {
        summary::summarize(&self.snapshot(), top_n)
    }

    /// Print the timing summary table to stderr.
    pub fn print_summary(&self, top_n: usize) {
        report::print_summary(&self.summarize(top_n));
    }

    /// Export everything recorded so far as JSON at `path`.
    ///
    /// The file is written atomically (temp file, then rename) so a failed
    /// write never leaves a truncated profile behind.
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> export::Result<()> {
        let path = path.as_ref();
        export::write_profile(&self.snapshot(), path)?;
        self.feedback
            .emit(format!("📁 Exported profiling data to {}", path.display()));
        Ok(())
    }

    /// Merge a closed region into the stats map, reconcile the nesting
    /// stack, and fire the slow-region alert when warranted.
    pub(crate) fn finish_region(&self, region: ActiveRegion<'_>, duration: Duration) {
        let ActiveRegion {
            base_name,
            full_name,
            started_at,
            metadata,
            origin,
            ..
        } = region;

        let alert_line = if duration >= self.alert_threshold {
            Some(if metadata.is_empty() {
                format!("⏱️  {}: {:.2}s", full_name, duration.as_secs_f64())
            } else {
                format!(
                    "⏱️  {}: {:.2}s {}",
                    full_name,
                    duration.as_secs_f64(),
                    format_metadata(&metadata)
                )
            })
        } else {
            None
        };

        {
            let mut guard = self.state.lock().expect(ERR_POISONED_LOCK);
            let state = &mut *guard;
            let entry = match state.operations.entry(full_name.clone()) {
                Entry::Occupied(occupied) => occupied.into_mut(),
                Entry::Vacant(vacant) => {
                    let stats = OperationStats::new(vacant.key().clone(), state.next_seq);
                    state.next_seq += 1;
                    vacant.insert(stats)
                }
            };
            entry.record(RegionSample {
                started_at,
                duration,
                metadata,
            });
        }
        debug!(
            region = %full_name,
            duration_us = duration.as_micros() as u64,
            "region closed"
        );

        self.pop_stack(origin, &base_name, &full_name);

        if let Some(line) = alert_line {
            self.feedback.emit(line);
        }
    }

    /// Remove `base_name` from the origin thread's nesting stack. A close
    /// that does not match the stack top is caller misuse: it is reported,
    /// and the deepest matching entry is removed so later siblings keep
    /// sensible prefixes.
    fn pop_stack(&self, origin: ThreadId, base_name: &str, full_name: &str) {
        let clean = {
            let mut stacks = self.stacks.lock().expect(ERR_POISONED_LOCK);
            let clean = match stacks.get_mut(&origin) {
                Some(stack) => match stack.last() {
                    Some(top) if top == base_name => {
                        stack.pop();
                        true
                    }
                    _ => {
                        if let Some(pos) = stack.iter().rposition(|name| name == base_name) {
                            stack.remove(pos);
                        }
                        false
                    }
                },
                None => false,
            };
            if stacks.get(&origin).is_some_and(Vec::is_empty) {
                stacks.remove(&origin);
            }
            clean
        };

        if !clean {
            warn!(region = %full_name, "region closed out of order");
            self.feedback
                .emit(format!("⚠️  region closed out of order: {}", full_name));
        }
    }
}

static GLOBAL: OnceLock<Profiler> = OnceLock::new();

/// Install a configured process-wide profiler.
///
/// Must be called before the first use of [`profiler`] or the convenience
/// functions below. Returns false when the default instance already exists,
/// in which case the existing instance is kept untouched.
pub fn init(config: ProfilerConfig) -> bool {
    let installed = GLOBAL.set(Profiler::with_config(config)).is_ok();
    if !installed {
        warn!("default profiler already exists; init ignored");
    }
    installed
}

/// The process-wide default profiler, created enabled on first use and kept
/// for the lifetime of the process.
pub fn profiler() -> &'static Profiler {
    GLOBAL.get_or_init(Profiler::new)
}

/// Open a region against the default profiler.
///
/// # Example
/// ```
/// {
///     let _region = cronista::time_region("load_config");
///     // measured work
/// }
/// assert!(cronista::snapshot().operation("load_config").is_some());
/// ```
pub fn time_region(name: &str) -> RegionGuard<'static> {
    profiler().region(name)
}

/// Open a region with metadata against the default profiler.
pub fn time_region_with(name: &str, metadata: Metadata) -> RegionGuard<'static> {
    profiler().region_with(name, metadata)
}

/// Record a checkpoint against the default profiler.
pub fn checkpoint(name: &str) {
    profiler().checkpoint(name);
}

/// Record a checkpoint with metadata against the default profiler.
pub fn checkpoint_with(name: &str, metadata: Metadata) {
    profiler().checkpoint_with(name, metadata);
}

/// Run `f` inside a region against the default profiler.
pub fn measure<F, R>(name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    profiler().measure(name, f)
}

/// Wrap a callable so that every invocation is measured against the default
/// profiler.
pub fn wrap<F, R>(name: &str, f: F) -> impl Fn() -> R
where
    F: Fn() -> R + 'static,
{
    profiler().wrap(name, f)
}

/// Snapshot the default profiler.
pub fn snapshot() -> ProfileSnapshot {
    profiler().snapshot()
}

/// Clear the default profiler's recorded data, for test isolation.
pub fn reset() {
    profiler().reset();
}

/// Print the default profiler's summary table to stderr.
pub fn print_summary(top_n: usize) {
    profiler().print_summary(top_n);
}

/// Export the default profiler's data as JSON at `path`.
pub fn export_json<P: AsRef<Path>>(path: P) -> export::Result<()> {
    profiler().export_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    fn captured() -> (Profiler, Arc<Mutex<Vec<String>>>) {
        Profiler::with_captured_feedback(ProfilerConfig::default())
    }

    #[test]
    fn test_nested_regions_accumulate_separately() {
        let profiler = Profiler::new();
        {
            let _a = profiler.region("A");
            let _b = profiler.region("B");
        }
        {
            let _c = profiler.region("C");
            let _b = profiler.region("B");
        }

        let snapshot = profiler.snapshot();
        assert_eq!(snapshot.operation("A").unwrap().call_count, 1);
        assert_eq!(snapshot.operation("A > B").unwrap().call_count, 1);
        assert_eq!(snapshot.operation("C > B").unwrap().call_count, 1);
        assert!(snapshot.operation("B").is_none());
    }

    #[test]
    fn test_repeated_calls_accumulate() {
        let profiler = Profiler::new();
        for _ in 0..5 {
            let _region = profiler.region("fetch");
        }
        let stats = profiler.snapshot();
        let fetch = stats.operation("fetch").unwrap();
        assert_eq!(fetch.call_count, 5);
        assert_eq!(fetch.samples.len(), 5);
        let summed: Duration = fetch.samples.iter().map(|s| s.duration).sum();
        assert_eq!(fetch.total_duration, summed);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let profiler = Profiler::new();
        profiler.measure("fetch", || ());
        profiler.measure("Fetch", || ());
        let snapshot = profiler.snapshot();
        assert_eq!(snapshot.operations.len(), 2);
        assert!(snapshot.operation("fetch").is_some());
        assert!(snapshot.operation("Fetch").is_some());
    }

    #[test]
    fn test_disabled_records_nothing() {
        let (profiler, lines) =
            Profiler::with_captured_feedback(ProfilerConfig::default().disabled());
        {
            let _region = profiler.region("ignored");
            profiler.checkpoint("also_ignored");
        }
        profiler.measure("still_ignored", || ());

        assert!(profiler.snapshot().is_empty());
        assert!(lines.lock().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let profiler = Profiler::new();
        profiler.measure("op", || ());
        profiler.checkpoint("cp");

        let first = profiler.snapshot();
        let second = profiler.snapshot();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reset_clears_data_keeps_settings() {
        let profiler = Profiler::new();
        profiler.measure("before", || ());
        profiler.checkpoint("cp");
        profiler.reset();

        assert!(profiler.snapshot().is_empty());
        assert!(profiler.is_enabled());

        profiler.measure("after", || ());
        assert_eq!(profiler.snapshot().operation("after").unwrap().call_count, 1);
    }

    #[test]
    fn test_alert_fires_exactly_once_at_threshold() {
        // Zero threshold makes duration == threshold hold for every region,
        // exercising the boundary: at the threshold fires, below does not.
        let (profiler, lines) = Profiler::with_captured_feedback(
            ProfilerConfig::default().alert_threshold(Duration::ZERO),
        );
        profiler.measure("slow", || ());

        let alerts: Vec<String> = lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.starts_with("⏱️"))
            .cloned()
            .collect();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("slow"));
    }

    #[test]
    fn test_no_alert_below_threshold() {
        let (profiler, lines) = Profiler::with_captured_feedback(
            ProfilerConfig::default().alert_threshold(Duration::from_secs(3600)),
        );
        profiler.measure("quick", || ());
        assert!(lines.lock().unwrap().iter().all(|l| !l.starts_with("⏱️")));
    }

    #[test]
    fn test_alert_carries_full_name_and_metadata() {
        let (profiler, lines) = Profiler::with_captured_feedback(
            ProfilerConfig::default().alert_threshold(Duration::ZERO),
        );
        {
            let _outer = profiler.region("outer");
            let _inner = profiler.region_with("step_1", metadata! { "batch" => 7 });
        }

        let lines = lines.lock().unwrap();
        let inner_alert = lines
            .iter()
            .find(|l| l.contains("outer > step_1"))
            .expect("inner alert emitted");
        assert!(inner_alert.contains("{batch=7}"));
    }

    #[test]
    fn test_checkpoint_records_and_echoes() {
        let (profiler, lines) = captured();
        profiler.checkpoint_with("batch_1_complete", metadata! { "codes" => 25 });

        let snapshot = profiler.snapshot();
        assert_eq!(snapshot.checkpoints.len(), 1);
        assert_eq!(snapshot.checkpoints[0].name, "batch_1_complete");
        assert_eq!(
            snapshot.checkpoints[0].metadata,
            metadata! { "codes" => 25 }
        );
        assert_eq!(
            lines.lock().unwrap().as_slice(),
            ["📍 batch_1_complete {codes=25}"]
        );
    }

    #[test]
    fn test_checkpoint_offsets_are_monotone() {
        let profiler = Profiler::new();
        profiler.checkpoint("first");
        profiler.checkpoint("second");
        let snapshot = profiler.snapshot();
        assert!(snapshot.checkpoints[1].at >= snapshot.checkpoints[0].at);
    }

    #[test]
    fn test_measure_returns_value() {
        let profiler = Profiler::new();
        let value = profiler.measure("compute", || 41 + 1);
        assert_eq!(value, 42);
        assert_eq!(profiler.snapshot().operation("compute").unwrap().call_count, 1);
    }

    #[test]
    fn test_measure_records_on_panic() {
        let profiler = Profiler::new();
        let result = catch_unwind(AssertUnwindSafe(|| {
            profiler.measure("boom", || panic!("kaboom"));
        }));
        assert!(result.is_err());
        assert_eq!(profiler.snapshot().operation("boom").unwrap().call_count, 1);
    }

    #[test]
    fn test_measure_records_on_error_return() {
        let profiler = Profiler::new();
        let result: Result<(), String> = profiler.measure("fallible", || Err("bad".to_string()));
        assert_eq!(result, Err("bad".to_string()));
        assert_eq!(
            profiler.snapshot().operation("fallible").unwrap().call_count,
            1
        );
    }

    #[test]
    fn test_wrap_measures_each_invocation() {
        let profiler = Profiler::new();
        let fetch = profiler.wrap("fetch", || 7);
        assert_eq!(fetch(), 7);
        assert_eq!(fetch(), 7);
        assert_eq!(fetch(), 7);
        drop(fetch);
        assert_eq!(profiler.snapshot().operation("fetch").unwrap().call_count, 3);
    }

    #[test]
    fn test_out_of_order_close_is_reported_not_lost() {
        let (profiler, lines) = captured();
        let a = profiler.region("a");
        let b = profiler.region("b");
        drop(a);
        drop(b);

        let snapshot = profiler.snapshot();
        assert_eq!(snapshot.operation("a").unwrap().call_count, 1);
        assert_eq!(snapshot.operation("a > b").unwrap().call_count, 1);

        let warnings: Vec<String> = lines
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.starts_with("⚠️"))
            .cloned()
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].ends_with(": a"));
    }

    #[test]
    fn test_sibling_prefix_survives_out_of_order_close() {
        let (profiler, _lines) = captured();
        let outer = profiler.region("outer");
        let first = profiler.region("first");
        drop(outer);
        drop(first);
        // outer was removed from the stack despite closing early, so a new
        // top-level region is not prefixed by it
        let next = profiler.region("next");
        assert_eq!(next.full_name(), Some("next"));
        drop(next);
    }

    #[test]
    fn test_cross_thread_drop_still_merges() {
        let (profiler, lines) = captured();
        thread::scope(|scope| {
            let region = profiler.region("moved");
            scope.spawn(move || drop(region));
        });

        assert_eq!(profiler.snapshot().operation("moved").unwrap().call_count, 1);
        // the origin stack top still matched, so this close is clean
        assert!(lines.lock().unwrap().iter().all(|l| !l.starts_with("⚠️")));
        let next = profiler.region("next");
        assert_eq!(next.full_name(), Some("next"));
        drop(next);
    }

    #[test]
    fn test_independent_thread_stacks() {
        let profiler = Profiler::new();
        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let _outer = profiler.region("outer");
                    let _inner = profiler.region("inner");
                });
            }
        });

        let snapshot = profiler.snapshot();
        // four independent stacks, so no cross-thread prefixes appear
        assert_eq!(snapshot.operations.len(), 2);
        assert_eq!(snapshot.operation("outer").unwrap().call_count, 4);
        assert_eq!(snapshot.operation("outer > inner").unwrap().call_count, 4);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let profiler = Profiler::new();
        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let _region = profiler.region("shared");
                    }
                });
            }
        });

        let stats = profiler.snapshot();
        let shared = stats.operation("shared").unwrap();
        assert_eq!(shared.call_count, 400);
        assert_eq!(shared.samples.len(), 400);
    }

    #[test]
    fn test_measured_duration_covers_sleep() {
        let profiler = Profiler::new();
        profiler.measure("nap", || thread::sleep(Duration::from_millis(10)));
        let nap = profiler.snapshot();
        let stats = nap.operation("nap").unwrap();
        assert!(stats.total_duration >= Duration::from_millis(10));
    }

    #[test]
    fn test_export_announces_destination() {
        let (profiler, lines) = captured();
        profiler.measure("op", || ());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        profiler.export_json(&path).unwrap();

        let lines = lines.lock().unwrap();
        let note = lines
            .iter()
            .find(|l| l.starts_with("📁"))
            .expect("export feedback emitted");
        assert!(note.contains("profile.json"));
    }

    #[test]
    fn test_global_profiler_lifecycle() {
        // First access creates the default instance, so a later init is
        // rejected and the existing instance keeps its data.
        {
            let _region = time_region("global_op");
        }
        checkpoint("global_cp");

        let snapshot = super::snapshot();
        assert!(snapshot.operation("global_op").is_some());
        assert_eq!(snapshot.checkpoints.len(), 1);

        assert!(!init(ProfilerConfig::default().disabled()));
        assert!(profiler().is_enabled());

        super::reset();
        assert!(super::snapshot().is_empty());
    }
}
