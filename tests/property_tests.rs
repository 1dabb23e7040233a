//! Property-based tests for aggregation, ranking, and the export format
//!
//! Uses proptest to drive the summarizer, the analyzer, and the JSON codec
//! with arbitrary durations and nesting depths.

use cronista::analyze::analyze_operations;
use cronista::export::{self, JsonOperation, JsonProfile, JsonSample, FORMAT_TAG};
use cronista::metadata::Metadata;
use cronista::stats::ProfileSnapshot;
use cronista::summary::summarize;
use cronista::Profiler;
use proptest::prelude::*;
use std::time::Duration;

/// Build a snapshot with one single-sample operation per duration.
fn snapshot_from(durations_ns: &[u64]) -> ProfileSnapshot {
    let operations: Vec<JsonOperation> = durations_ns
        .iter()
        .enumerate()
        .map(|(i, &ns)| JsonOperation {
            name: format!("op_{}", i),
            call_count: 1,
            total_ns: ns,
            samples: vec![JsonSample {
                started_at_ns: 0,
                duration_ns: ns,
                metadata: Metadata::new(),
            }],
            metadata: Metadata::new(),
        })
        .collect();

    JsonProfile {
        version: env!("CARGO_PKG_VERSION").to_string(),
        format: FORMAT_TAG.to_string(),
        total_time_ns: durations_ns.iter().sum(),
        num_operations: operations.len(),
        total_calls: operations.len() as u64,
        operations,
        checkpoints: Vec::new(),
    }
    .into_snapshot()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_summary_rows_ranked_and_bounded(
        durations in prop::collection::vec(0u64..10_000_000_000, 1..30),
        top_n in 1usize..10,
    ) {
        let snapshot = snapshot_from(&durations);
        let summary = summarize(&snapshot, top_n);

        // Property: row count respects top_n and rows are ranked descending
        prop_assert!(summary.rows.len() <= top_n);
        for pair in summary.rows.windows(2) {
            prop_assert!(pair[0].total >= pair[1].total);
        }

        // Property: percentages stay within [0, 100]
        for row in &summary.rows {
            prop_assert!(row.percent >= 0.0);
            prop_assert!(row.percent <= 100.0 + 1e-6);
        }

        let expected: u64 = durations.iter().sum();
        prop_assert_eq!(summary.grand_total, Duration::from_nanos(expected));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_summary_covers_everything_when_top_n_allows(
        durations in prop::collection::vec(1u64..1_000_000_000, 1..20),
    ) {
        let snapshot = snapshot_from(&durations);
        let summary = summarize(&snapshot, durations.len());

        // Property: with room for every operation, totals add back up
        prop_assert_eq!(summary.rows.len(), durations.len());
        let summed: Duration = summary.rows.iter().map(|r| r.total).sum();
        prop_assert_eq!(summed, summary.grand_total);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_export_roundtrip_preserves_operations(
        durations in prop::collection::vec(1u64..1_000_000_000_000, 1..20),
    ) {
        let snapshot = snapshot_from(&durations);
        let profile = JsonProfile::from_snapshot(&snapshot);
        let json = profile.to_json().unwrap();
        let restored = export::parse_profile(&json).unwrap().into_snapshot();

        // Property: serializing and parsing loses nothing
        prop_assert_eq!(snapshot, restored);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_analysis_is_ranked_with_bounded_percentages(
        durations in prop::collection::vec(0u64..10_000_000_000, 1..25),
    ) {
        let profile = JsonProfile::from_snapshot(&snapshot_from(&durations));
        let operations = analyze_operations(&profile);

        prop_assert_eq!(operations.len(), durations.len());
        for pair in operations.windows(2) {
            prop_assert!(pair[0].total >= pair[1].total);
        }
        for op in &operations {
            prop_assert!(op.percent >= 0.0);
            prop_assert!(op.percent <= 100.0 + 1e-6);
            prop_assert!(op.min <= op.max);
            prop_assert!(op.min <= op.median);
            prop_assert!(op.median <= op.max);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_nesting_depth_produces_one_name_per_level(depth in 1usize..8) {
        fn recurse(profiler: &Profiler, remaining: usize) {
            if remaining == 0 {
                return;
            }
            let _region = profiler.region("level");
            recurse(profiler, remaining - 1);
        }

        let profiler = Profiler::new();
        recurse(&profiler, depth);

        // Property: each nesting level aggregates under its own full name
        let snapshot = profiler.snapshot();
        prop_assert_eq!(snapshot.operations.len(), depth);
        let deepest = vec!["level"; depth].join(" > ");
        prop_assert!(snapshot.operation(&deepest).is_some());
    }
}
