//! Text rendering of the timing summary
//!
//! Renders a [`Summary`] as the human-readable table printed to stderr:
//! ranked operations with percentages, the slowest individual invocations,
//! and recorded checkpoints. All layout concerns live here; the numbers
//! come from [`crate::summary`].

use crate::metadata::format_metadata;
use crate::summary::Summary;

const RULE_WIDTH: usize = 80;
const SLOWEST_NAME_WIDTH: usize = 57;

/// Render the summary as the report text.
///
/// An empty summary renders as a single `No timing data collected` line.
pub fn format_summary(summary: &Summary) -> String {
    if summary.is_empty() {
        return "No timing data collected\n".to_string();
    }

    let mut out = String::new();
    let rule = "=".repeat(RULE_WIDTH);
    let dash = "-".repeat(RULE_WIDTH);

    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out.push_str("⏱️  PROFILING SUMMARY\n");
    out.push_str(&rule);
    out.push('\n');

    let total = summary.grand_total.as_secs_f64();
    out.push_str(&format!(
        "\n📊 Total Time: {:.2}s ({:.2}m)\n",
        total,
        total / 60.0
    ));

    out.push_str(&format!(
        "\n{:<40} {:<12} {:<8} {:<12} {:<8}\n",
        "Operation", "Total Time", "Calls", "Avg Time", "%"
    ));
    out.push_str(&dash);
    out.push('\n');
    for row in &summary.rows {
        out.push_str(&format!(
            "{:<40} {:>8.2}s    {:<8} {:>8.2}s    {:>6.1}%\n",
            row.name,
            row.total.as_secs_f64(),
            row.calls,
            row.avg.as_secs_f64(),
            row.percent
        ));
    }

    if !summary.slowest.is_empty() {
        out.push_str(&format!(
            "\n{:<60} {:<12}\n",
            "Slowest Operations", "Time"
        ));
        out.push_str(&dash);
        out.push('\n');
        for row in &summary.slowest {
            let meta = if row.metadata.is_empty() {
                String::new()
            } else {
                format!(" {}", format_metadata(&row.metadata))
            };
            out.push_str(&format!(
                "{:<60} {:>8.2}s{}\n",
                truncate_name(&row.name, SLOWEST_NAME_WIDTH),
                row.duration.as_secs_f64(),
                meta
            ));
        }
    }

    if !summary.checkpoints.is_empty() {
        out.push_str("\n📍 Checkpoints:\n");
        for checkpoint in &summary.checkpoints {
            if checkpoint.metadata.is_empty() {
                out.push_str(&format!("   {}\n", checkpoint.name));
            } else {
                out.push_str(&format!(
                    "   {} {}\n",
                    checkpoint.name,
                    format_metadata(&checkpoint.metadata)
                ));
            }
        }
    }

    out.push_str(&rule);
    out.push_str("\n\n");
    out
}

/// Print the summary to stderr.
pub fn print_summary(summary: &Summary) {
    eprint!("{}", format_summary(summary));
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let keep: String = name.chars().take(max - 3).collect();
        format!("{}...", keep)
    }
}
