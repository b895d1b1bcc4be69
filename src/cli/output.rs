//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use repowatch::RepowatchError;
use repowatch::analysis::RepositoryMetrics;

/// Writes a repository health summary to stdout.
pub fn write_repository_summary(metrics: &RepositoryMetrics) -> Result<(), RepowatchError> {
    let mut stdout = io::stdout().lock();
    write_repository_summary_to(&mut stdout, metrics)
}

/// Writes a repository health summary to the given writer.
pub fn write_repository_summary_to<W: Write>(
    writer: &mut W,
    metrics: &RepositoryMetrics,
) -> Result<(), RepowatchError> {
    writeln!(writer, "Repository health for {}:", metrics.repository)?;
    writeln!(writer)?;
    writeln!(
        writer,
        "  Pull requests: {} ({} closed)",
        metrics.pull_request_count, metrics.closed_pull_request_count
    )?;
    writeln!(
        writer,
        "  Comments: {} ({:.2} per PR, {:.2} words each, median {:.1})",
        metrics.comment_count,
        metrics.mean_comments_per_pull_request,
        metrics.mean_words_per_comment,
        metrics.median_words_per_comment
    )?;
    writeln!(
        writer,
        "  Approvals: {} ({:.2} per PR)",
        metrics.approval_count, metrics.mean_approvals_per_pull_request
    )?;
    writeln!(
        writer,
        "  Median time open: {:.1} hours",
        metrics.median_hours_open
    )?;

    if metrics.score_totals.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "Scores:")?;
    for (attribute, total) in &metrics.score_totals {
        writeln!(
            writer,
            "  {attribute}: {} ({:.2} points)",
            total.count, total.points
        )?;
    }
    writeln!(writer, "  Total: {:.2} points", metrics.total_points)?;
    Ok(())
}
