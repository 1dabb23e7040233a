//! RAII handle for an open timed region
//!
//! A [`RegionGuard`] is returned by [`Profiler::region`] and records the
//! region on drop, on every exit path including panics. Guards may move
//! across threads; the duration is merged either way and the opening
//! thread's nesting stack is reconciled by name.
//!
//! [`Profiler::region`]: crate::profiler::Profiler::region

use crate::metadata::Metadata;
use crate::profiler::Profiler;
use std::thread::ThreadId;
use std::time::{Duration, Instant};

/// An open timed region. Closing happens on drop.
///
/// # Examples
///
/// ```
/// use cronista::Profiler;
///
/// let profiler = Profiler::new();
/// {
///     let _region = profiler.region("load_config");
///     // work being measured
/// } // duration is recorded here
/// assert_eq!(profiler.snapshot().operation("load_config").unwrap().call_count, 1);
/// ```
#[derive(Debug)]
#[must_use = "the region is measured between creation and drop"]
pub struct RegionGuard<'a> {
    pub(crate) inner: Option<ActiveRegion<'a>>,
}

/// Live state of an open region. Absent for disabled profilers.
#[derive(Debug)]
pub(crate) struct ActiveRegion<'a> {
    pub(crate) profiler: &'a Profiler,
    pub(crate) base_name: String,
    pub(crate) full_name: String,
    pub(crate) started: Instant,
    pub(crate) started_at: Duration,
    pub(crate) metadata: Metadata,
    pub(crate) origin: ThreadId,
}

impl RegionGuard<'_> {
    /// Full hierarchical name this region records under, `None` when the
    /// owning profiler is disabled.
    pub fn full_name(&self) -> Option<&str> {
        self.inner.as_ref().map(|region| region.full_name.as_str())
    }

    /// True when the region is actually being measured.
    pub fn is_active(&self) -> bool {
        self.inner.is_some()
    }

    /// Close the region now instead of at end of scope.
    pub fn finish(mut self) {
        if let Some(region) = self.inner.take() {
            region.close();
        }
    }
}

impl Drop for RegionGuard<'_> {
    fn drop(&mut self) {
        if let Some(region) = self.inner.take() {
            region.close();
        }
    }
}

impl ActiveRegion<'_> {
    fn close(self) {
        let duration = self.started.elapsed();
        self.profiler.finish_region(self, duration);
    }
}
