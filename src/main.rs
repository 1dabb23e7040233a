use anyhow::{Context, Result};
use clap::Parser;
use cronista::analyze::{self, Bottleneck, OperationAnalysis, Recommendation, TimelineBucket};
use cronista::cli::Cli;
use cronista::export::{self, JsonProfile};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const RULE_WIDTH: usize = 80;
/// Timeline rows printed before the histogram is cut off.
const MAX_TIMELINE_ROWS: usize = 30;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_rule(ch: &str) {
    println!("{}", ch.repeat(RULE_WIDTH));
}

/// Print the analysis header and the per-operation breakdown table
fn print_breakdown(profile: &JsonProfile, operations: &[OperationAnalysis], top: usize) {
    let total = profile.total_time().as_secs_f64();

    print_rule("=");
    println!("🔍 PROFILING ANALYSIS");
    print_rule("=");
    println!("\nTotal Time: {:.2}s ({:.2}m)", total, total / 60.0);
    println!("Total Operations: {}", profile.total_calls);

    println!(
        "\n{:<40} {:<12} {:<8} {:<12} {:<12} {:<8}",
        "Operation", "Total", "Calls", "Avg", "Max", "%"
    );
    print_rule("-");

    for op in operations.iter().take(top) {
        println!(
            "{:<40} {:>8.2}s    {:<8} {:>8.2}s    {:>8.2}s    {:>6.1}%",
            op.name,
            op.total.as_secs_f64(),
            op.calls,
            op.avg.as_secs_f64(),
            op.max.as_secs_f64(),
            op.percent
        );
    }
}

/// Print detected bottlenecks with their optimization suggestions
fn print_bottlenecks(bottlenecks: &[Bottleneck]) {
    println!();
    print_rule("=");
    println!("🚨 TOP BOTTLENECKS");
    print_rule("=");

    if bottlenecks.is_empty() {
        println!("\n✅ No major bottlenecks found!");
        return;
    }

    for (i, bottleneck) in bottlenecks.iter().enumerate() {
        println!("\n{}. {}", i + 1, bottleneck.name);
        println!(
            "   Total time: {:.2}s ({:.1}% of total)",
            bottleneck.total.as_secs_f64(),
            bottleneck.percent
        );
        println!("   Called: {} times", bottleneck.calls);
        println!("   Average: {:.2}s per call", bottleneck.avg.as_secs_f64());
        println!("   Max: {:.2}s", bottleneck.max.as_secs_f64());
        println!("   💡 Optimization: {}", bottleneck.suggestion);
    }
}

/// Print the activity histogram
fn print_timeline(buckets: &[TimelineBucket], bucket_secs: u64) {
    println!();
    print_rule("=");
    println!("📈 TIMELINE ANALYSIS");
    print_rule("=");

    if buckets.is_empty() {
        return;
    }

    println!("\nActivity by time ({}s buckets):", bucket_secs);
    println!("{:<12} {:<12} {:<12}", "Time", "Operations", "Total Time");
    println!("{}", "-".repeat(40));

    for bucket in buckets.iter().take(MAX_TIMELINE_ROWS) {
        let start = bucket.start.as_secs();
        println!(
            "{:>4}s-{:<3}s {:>8}      {:>8.2}s",
            start,
            start + bucket_secs,
            bucket.count,
            bucket.total.as_secs_f64()
        );
    }
}

/// Print prioritized optimization recommendations
fn print_recommendations(recommendations: &[Recommendation]) {
    println!();
    print_rule("=");
    println!("💡 OPTIMIZATION RECOMMENDATIONS");
    print_rule("=");

    if recommendations.is_empty() {
        println!("\n✅ Performance looks good! No major issues detected.");
        return;
    }

    for (i, rec) in recommendations.iter().enumerate() {
        println!("\n{}. [{}] {}", i + 1, rec.priority, rec.area);
        println!("   Issue: {}", rec.issue);
        println!("   Actions:");
        for action in &rec.actions {
            println!("      • {}", action);
        }
    }
}

fn print_footer() {
    println!();
    print_rule("=");
    println!("📊 Analysis complete!");
    print_rule("=");
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let avg_threshold = match Duration::try_from_secs_f64(args.avg_threshold) {
        Ok(threshold) => threshold,
        Err(_) => anyhow::bail!(
            "Invalid value for --avg-threshold: {} (must be a non-negative duration in seconds)",
            args.avg_threshold
        ),
    };
    if args.bucket_secs == 0 {
        anyhow::bail!("Invalid value for --bucket-secs: 0 (must be >= 1)");
    }

    init_tracing(args.debug);

    if !args.profile.exists() {
        eprintln!("❌ File not found: {}", args.profile.display());
        eprintln!("\nTo generate profiling data:");
        eprintln!("  call cronista::export_json(\"profile.json\") at the end of an instrumented run");
        std::process::exit(1);
    }

    let profile = export::read_profile(&args.profile)
        .with_context(|| format!("Failed to load profile {}", args.profile.display()))?;

    let operations = analyze::analyze_operations(&profile);
    let bottlenecks = analyze::find_bottlenecks(&operations, args.percent_threshold, avg_threshold);

    if args.bottlenecks_only {
        print_bottlenecks(&bottlenecks);
        print_footer();
        return Ok(());
    }

    print_breakdown(&profile, &operations, args.top);
    print_bottlenecks(&bottlenecks);

    if !args.no_timeline {
        let buckets = analyze::timeline(&profile, Duration::from_secs(args.bucket_secs));
        print_timeline(&buckets, args.bucket_secs);
    }

    print_recommendations(&analyze::recommendations(&operations));
    print_footer();

    Ok(())
}
