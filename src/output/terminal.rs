// Colored terminal output for group statistics, label reports and videos.
//
// The main.rs subcommands delegate all display work here.

use colored::Colorize;

use super::format_metric;
use crate::analysis::metrics::ClassificationReport;
use crate::db::models::{GroupCategory, GroupStatistics, VideoView};

/// Display group statistics as a table, in the order given.
pub fn display_group_stats(groups: &[GroupStatistics]) {
    if groups.is_empty() {
        println!("No group statistics stored. Run `vidstats process` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Group Statistics ({} groups) ===", groups.len()).bold()
    );
    println!();

    println!(
        "  {:<8} {:<28} {:>9}  {:>9}  {:>9}  {:>10}",
        "Category".dimmed(),
        "Name".dimmed(),
        "Precision".dimmed(),
        "Recall".dimmed(),
        "F1".dimmed(),
        "Cos. dist".dimmed(),
    );
    println!("  {}", "-".repeat(82).dimmed());

    for g in groups {
        println!(
            "  {:<8} {:<28} {:>9}  {:>9}  {:>9}  {:>10.3}",
            colorize_category(g.category),
            g.name,
            colorize_metric(g.eval_metrics.precision),
            colorize_metric(g.eval_metrics.recall),
            colorize_metric(g.eval_metrics.f1_score),
            g.avg_cosine_intra_similarity,
        );
    }
    println!();
}

/// Display the per-label breakdown of a classification report.
pub fn display_label_report(report: &ClassificationReport) {
    println!("{}", "=== Per-label Scores (whole dataset) ===".bold());
    println!();
    println!(
        "  {:<28} {:>9}  {:>9}  {:>9}  {:>7}",
        "Label".dimmed(),
        "Precision".dimmed(),
        "Recall".dimmed(),
        "F1".dimmed(),
        "Support".dimmed(),
    );
    for s in &report.labels {
        println!(
            "  {:<28} {:>9}  {:>9}  {:>9}  {:>7}",
            s.label,
            colorize_metric(s.precision),
            colorize_metric(s.recall),
            colorize_metric(s.f1_score),
            s.support,
        );
    }
    println!(
        "  {:<28} {:>9}  {:>9}  {:>9}",
        "macro avg".bold(),
        colorize_metric(report.macro_avg.precision),
        colorize_metric(report.macro_avg.recall),
        colorize_metric(report.macro_avg.f1_score),
    );
    println!();
}

/// Display videos with their projected coordinates.
pub fn display_videos(videos: &[VideoView]) {
    if videos.is_empty() {
        println!("No matching videos.");
        return;
    }

    println!("\n{}", format!("=== Videos ({}) ===", videos.len()).bold());
    println!();
    println!(
        "  {:<16} {:<18} {:<18} {:<22} {:>9} {:>9}",
        "Content ID".dimmed(),
        "Topic".dimmed(),
        "Predicted".dimmed(),
        "TV show".dimmed(),
        "PCA x".dimmed(),
        "PCA y".dimmed(),
    );
    println!("  {}", "-".repeat(96).dimmed());

    for v in videos {
        let predicted = if v.predicted_topic == v.topic {
            v.predicted_topic.green()
        } else {
            v.predicted_topic.red()
        };
        println!(
            "  {:<16} {:<18} {:<18} {:<22} {:>9.3} {:>9.3}",
            v.content_id, v.topic, predicted, v.tv_show, v.pca_x, v.pca_y,
        );
    }
    println!();
}

fn colorize_category(category: GroupCategory) -> colored::ColoredString {
    match category {
        GroupCategory::All => category.as_str().bold(),
        GroupCategory::Topic => category.as_str().cyan(),
        GroupCategory::TvShow => category.as_str().magenta(),
    }
}

/// Green for strong scores, yellow for middling, red for weak, dim for n/a.
fn colorize_metric(value: Option<f64>) -> colored::ColoredString {
    let text = format_metric(value);
    match value {
        None => text.dimmed(),
        Some(v) if v >= 0.8 => text.green(),
        Some(v) if v >= 0.5 => text.yellow(),
        Some(_) => text.red(),
    }
}
