//! Markdown summary generation
//!
//! This module renders a finished crawl as a human-readable markdown file:
//! run information, task statistics, fetched pages and failures.

use crate::output::stats::CrawlReport;
use crate::output::traits::{CrawlRecord, FetchFailure, OutputResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Longest content excerpt shown per page
const EXCERPT_CHARS: usize = 80;

/// Writes a markdown summary of a crawl to `output_path`
///
/// # Arguments
///
/// * `report` - Statistics of the finished crawl
/// * `records` - Every fetched page
/// * `failures` - Every failed fetch
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown_summary(
    report: &CrawlReport,
    records: &[CrawlRecord],
    failures: &[FetchFailure],
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_summary(report, records, failures);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl as markdown
///
/// Pages are listed by depth, then address, so the output is stable across
/// runs even though fetch order is not.
pub fn format_markdown_summary(
    report: &CrawlReport,
    records: &[CrawlRecord],
    failures: &[FetchFailure],
) -> String {
    let mut md = String::new();

    md.push_str("# Ripple-Crawl Summary\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Seed**: {}\n", report.seed));
    md.push_str(&format!("- **Max Depth**: {}\n", report.max_depth));
    md.push_str(&format!(
        "- **Started**: {}\n",
        report.started_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        report.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {:.2} seconds\n",
        report.duration().as_secs_f64()
    ));
    let status = if report.cancelled {
        "cancelled"
    } else {
        "completed"
    };
    md.push_str(&format!("- **Status**: {}\n\n", status));

    // Task statistics
    md.push_str("## Task Breakdown\n\n");
    md.push_str("| Outcome | Count |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Fetched | {} |\n", report.pages_fetched));
    md.push_str(&format!("| Failed | {} |\n", report.fetch_failures));
    md.push_str(&format!(
        "| Skipped (depth exhausted) | {} |\n",
        report.skipped_depth
    ));
    md.push_str(&format!(
        "| Skipped (duplicate) | {} |\n",
        report.skipped_duplicate
    ));
    md.push_str(&format!(
        "| Skipped (cancelled) | {} |\n",
        report.skipped_cancelled
    ));
    md.push_str(&format!("| **Total** | {} |\n\n", report.tasks_spawned));
    md.push_str(&format!(
        "- **Links Discovered**: {}\n- **Success Rate**: {:.2}%\n\n",
        report.links_discovered,
        report.success_rate()
    ));

    if !records.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| Depth | Address | Links | Content |\n");
        md.push_str("|-------|---------|-------|---------|\n");

        let mut sorted: Vec<&CrawlRecord> = records.iter().collect();
        sorted.sort_by(|a, b| a.depth.cmp(&b.depth).then_with(|| a.address.cmp(&b.address)));

        for record in sorted {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                record.depth,
                escape_cell(&record.address),
                record.link_count,
                escape_cell(&excerpt(&record.content))
            ));
        }
        md.push('\n');

        let mut per_depth: BTreeMap<u32, u64> = BTreeMap::new();
        for record in records {
            *per_depth.entry(record.depth).or_default() += 1;
        }
        md.push_str("## Depth Breakdown\n\n");
        md.push_str("| Depth | Pages |\n");
        md.push_str("|-------|-------|\n");
        for (depth, count) in per_depth {
            md.push_str(&format!("| {} | {} |\n", depth, count));
        }
        md.push('\n');
    }

    if !failures.is_empty() {
        md.push_str("## Failures\n\n");
        let mut sorted: Vec<&FetchFailure> = failures.iter().collect();
        sorted.sort_by(|a, b| a.address.cmp(&b.address));
        for failure in sorted {
            md.push_str(&format!(
                "- `{}` (depth {}): {}\n",
                failure.address, failure.depth, failure.error
            ));
        }
        md.push('\n');
    }

    md
}

/// Cuts content down to a single-line excerpt
fn excerpt(content: &str) -> String {
    let flat: String = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= EXCERPT_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(EXCERPT_CHARS).collect();
    cut.push('…');
    cut
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
