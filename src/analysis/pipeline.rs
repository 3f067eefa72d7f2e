// The batch pipeline: raw table in, group statistics and videos out.
//
//   parse vectors -> label universe -> partition + score -> project -> assemble
//
// The run is all-or-nothing. Nothing is handed back until both collections
// are complete, and any error aborts the run.

use super::error::Result;
use super::features::parse_feature_matrix;
use super::groups::group_statistics;
use super::metrics::{classification_report, ClassificationReport, LabelUniverse, ZeroDivision};
use super::projection::Projection;
use crate::db::models::{GroupStatistics, RawVideoRow, VideoRecord};

/// Knobs for a pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// How zero denominators in precision/recall/F1 are treated.
    pub zero_division: ZeroDivision,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// One record per partition member, in enumeration order.
    pub group_stats: Vec<GroupStatistics>,
    /// One record per input row, in input order.
    pub videos: Vec<VideoRecord>,
    /// Per-label breakdown over the whole dataset (the `all` group).
    pub label_report: ClassificationReport,
}

/// Run the full pipeline over one input table.
pub fn run(rows: &[RawVideoRow], options: &PipelineOptions) -> Result<PipelineOutput> {
    let matrix = parse_feature_matrix(rows)?;
    let universe = LabelUniverse::from_labels(rows.iter().map(|r| r.actual_label.as_str()));

    let group_stats = group_statistics(rows, &matrix, &universe, options.zero_division)?;

    let label_report = classification_report(
        rows.iter()
            .map(|r| (r.actual_label.as_str(), r.predicted_label.as_str())),
        &universe,
        options.zero_division,
    );

    let coords = Projection::fit(&matrix).transform(&matrix);

    let videos = rows
        .iter()
        .zip(matrix)
        .zip(coords)
        .map(|((row, feature_vector), [pca_x, pca_y])| VideoRecord {
            content_id: row.content_id.clone(),
            topic: row.actual_label.clone(),
            predicted_topic: row.predicted_label.clone(),
            tv_show: row.tvshow.clone(),
            pca_x,
            pca_y,
            feature_vector,
        })
        .collect();

    Ok(PipelineOutput {
        group_stats,
        videos,
        label_report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::error::AnalysisError;
    use crate::db::models::GroupCategory;

    fn row(id: &str, actual: &str, predicted: &str, show: &str, vector: &str) -> RawVideoRow {
        RawVideoRow {
            content_id: id.to_string(),
            actual_label: actual.to_string(),
            predicted_label: predicted.to_string(),
            tvshow: show.to_string(),
            feature_vector: vector.to_string(),
        }
    }

    #[test]
    fn test_two_row_scenario() {
        let rows = vec![
            row("A", "news", "news", "X", "1, 0"),
            row("B", "sports", "news", "X", "0, 1"),
        ];
        let out = run(&rows, &PipelineOptions::default()).unwrap();

        assert_eq!(out.group_stats.len(), 1 + 2 + 1);
        let news = out.label_report.label("news").unwrap();
        assert_eq!(news.precision, Some(0.5));
        assert_eq!(news.recall, Some(1.0));
        assert_eq!(out.label_report.label("sports").unwrap().precision, None);

        let show = out
            .group_stats
            .iter()
            .find(|g| g.category == GroupCategory::TvShow && g.name == "X")
            .unwrap();
        assert!((show.avg_cosine_intra_similarity - 1.0).abs() < 1e-12);

        assert_eq!(out.videos.len(), 2);
        assert_eq!(out.videos[1].topic, "sports");
        assert_eq!(out.videos[1].predicted_topic, "news");
        assert_eq!(out.videos[1].tv_show, "X");
        assert_eq!(out.videos[1].feature_vector, vec![0.0, 1.0]);
    }

    #[test]
    fn test_one_policy_fills_sports_precision() {
        let rows = vec![
            row("A", "news", "news", "X", "1, 0"),
            row("B", "sports", "news", "X", "0, 1"),
        ];
        let options = PipelineOptions {
            zero_division: ZeroDivision::One,
        };
        let out = run(&rows, &options).unwrap();
        assert_eq!(out.label_report.label("sports").unwrap().precision, Some(1.0));
        assert_eq!(out.group_stats[0].eval_metrics.precision, Some(0.75));
    }

    #[test]
    fn test_empty_table_fails() {
        let err = run(&[], &PipelineOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::EmptyGroup {
                category: GroupCategory::All,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_row_produces_no_output() {
        let rows = vec![
            row("A", "news", "news", "X", "1, 0, 0"),
            row("B", "news", "news", "X", "1, 0"),
            row("C", "news", "news", "X", "0, 0, 1"),
        ];
        assert!(matches!(
            run(&rows, &PipelineOptions::default()),
            Err(AnalysisError::MalformedInput { row: 1, .. })
        ));
    }

    #[test]
    fn test_zero_vector_fails_run() {
        let rows = vec![
            row("A", "news", "news", "X", "1, 0"),
            row("B", "news", "news", "Y", "0, 0"),
        ];
        assert_eq!(
            run(&rows, &PipelineOptions::default()).unwrap_err(),
            AnalysisError::DegenerateVector { row: 1 }
        );
    }
}
