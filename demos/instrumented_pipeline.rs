//! Instrumented Pipeline Example
//!
//! This example walks a small data pipeline through the full profiling
//! lifecycle: nested timed regions, per-call metadata, checkpoints, a
//! slow-region alert, the ranked summary, and a JSON export ready for
//! `cronista <file>`.
//!
//! Run with: cargo run --example instrumented_pipeline

use anyhow::Result;
use cronista::{metadata, Profiler, ProfilerConfig};
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("🚀 Cronista Instrumented Pipeline Demo\n");

    // A low alert threshold so the demo triggers the slow-region warning.
    let profiler = Profiler::with_config(
        ProfilerConfig::default().alert_threshold(Duration::from_millis(100)),
    );

    // ========================================================================
    // Stage 1: Extract
    // ========================================================================
    println!("Stage 1: extracting pages");
    {
        let _extract = profiler.region("extract");
        for page in 1..=3 {
            let _fetch = profiler.region_with("fetch_page", metadata! { "page" => page });
            thread::sleep(Duration::from_millis(15));
        }
    }
    profiler.checkpoint_with("extract_done", metadata! { "pages" => 3 });

    // ========================================================================
    // Stage 2: Transform (slow enough to trip the alert)
    // ========================================================================
    println!("Stage 2: transforming records");
    {
        let _transform = profiler.region("transform");
        profiler.measure("clean", || thread::sleep(Duration::from_millis(20)));
        profiler.measure("enrich", || thread::sleep(Duration::from_millis(120)));
    }
    profiler.checkpoint("transform_done");

    // ========================================================================
    // Stage 3: Load
    // ========================================================================
    println!("Stage 3: loading rows");
    let rows = profiler.measure("load", || {
        thread::sleep(Duration::from_millis(25));
        1042_usize
    });
    profiler.checkpoint_with("load_done", metadata! { "rows" => rows });

    // Ranked summary on stderr, slowest invocations included.
    profiler.print_summary(20);

    // Export for offline analysis with the bundled binary.
    let out = std::env::temp_dir().join("cronista_demo_profile.json");
    profiler.export_json(&out)?;
    println!("Analyze it with: cargo run -- {}", out.display());

    Ok(())
}
