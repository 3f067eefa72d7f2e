// Group partitioning and per-group scoring.
//
// Three partitions over the dataset:
//   all      one group holding every row, named "all"
//   topic    one group per distinct ground-truth topic
//   tv_show  one group per distinct show
//
// Groups are enumerated in order of first appearance in the input, never
// sorted, so the output order is stable for a given table.

use std::collections::HashMap;

use super::error::{AnalysisError, Result};
use super::metrics::{macro_metrics, LabelUniverse, ZeroDivision};
use super::similarity::mean_pairwise_distance;
use crate::db::models::{GroupCategory, GroupStatistics, RawVideoRow};

/// Name of the single group in the `all` partition.
pub const ALL_GROUP_NAME: &str = "all";

/// One partition member: which rows belong to it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSpec {
    pub category: GroupCategory,
    pub name: String,
    pub members: Vec<usize>,
}

/// Map each distinct key to the row indices carrying it, in first-seen
/// key order.
pub fn group_by<'a, I>(keys: I) -> Vec<(String, Vec<usize>)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();

    for (row, key) in keys.into_iter().enumerate() {
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push((key.to_string(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row);
    }

    groups
}

/// Enumerate all three partitions: `all`, then topics, then shows.
pub fn partitions(rows: &[RawVideoRow]) -> Vec<GroupSpec> {
    let mut specs = vec![GroupSpec {
        category: GroupCategory::All,
        name: ALL_GROUP_NAME.to_string(),
        members: (0..rows.len()).collect(),
    }];

    let by_topic = group_by(rows.iter().map(|r| r.actual_label.as_str()));
    let by_show = group_by(rows.iter().map(|r| r.tvshow.as_str()));

    specs.extend(by_topic.into_iter().map(|(name, members)| GroupSpec {
        category: GroupCategory::Topic,
        name,
        members,
    }));
    specs.extend(by_show.into_iter().map(|(name, members)| GroupSpec {
        category: GroupCategory::TvShow,
        name,
        members,
    }));

    specs
}

/// Score one group: macro metrics over its label pairs and mean cosine
/// distance over its vectors.
pub fn score_group(
    spec: &GroupSpec,
    rows: &[RawVideoRow],
    matrix: &[Vec<f64>],
    universe: &LabelUniverse,
    policy: ZeroDivision,
) -> Result<GroupStatistics> {
    if spec.members.is_empty() {
        return Err(AnalysisError::EmptyGroup {
            category: spec.category,
            name: spec.name.clone(),
        });
    }

    let pairs = spec.members.iter().map(|&i| {
        let r = &rows[i];
        (r.actual_label.as_str(), r.predicted_label.as_str())
    });
    let eval_metrics = macro_metrics(pairs, universe, policy);
    let avg_cosine_intra_similarity = mean_pairwise_distance(matrix, &spec.members)?;

    Ok(GroupStatistics {
        category: spec.category,
        name: spec.name.clone(),
        eval_metrics,
        avg_cosine_intra_similarity,
    })
}

/// Build and score every partition member.
///
/// Produces exactly `1 + distinct topics + distinct shows` records for a
/// non-empty table. The first failing group aborts the whole computation.
pub fn group_statistics(
    rows: &[RawVideoRow],
    matrix: &[Vec<f64>],
    universe: &LabelUniverse,
    policy: ZeroDivision,
) -> Result<Vec<GroupStatistics>> {
    partitions(rows)
        .iter()
        .map(|spec| score_group(spec, rows, matrix, universe, policy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, actual: &str, predicted: &str, show: &str) -> RawVideoRow {
        RawVideoRow {
            content_id: id.to_string(),
            actual_label: actual.to_string(),
            predicted_label: predicted.to_string(),
            tvshow: show.to_string(),
            feature_vector: String::new(),
        }
    }

    #[test]
    fn test_group_by_keeps_first_seen_order() {
        let groups = group_by(["b", "a", "b", "c", "a"]);
        assert_eq!(
            groups,
            vec![
                ("b".to_string(), vec![0, 2]),
                ("a".to_string(), vec![1, 4]),
                ("c".to_string(), vec![3]),
            ]
        );
    }

    #[test]
    fn test_partitions_order_and_count() {
        let rows = vec![
            row("1", "sports", "sports", "Z"),
            row("2", "news", "news", "Y"),
            row("3", "sports", "news", "Y"),
        ];
        let specs = partitions(&rows);
        let names: Vec<(GroupCategory, &str)> =
            specs.iter().map(|s| (s.category, s.name.as_str())).collect();
        assert_eq!(
            names,
            vec![
                (GroupCategory::All, "all"),
                (GroupCategory::Topic, "sports"),
                (GroupCategory::Topic, "news"),
                (GroupCategory::TvShow, "Z"),
                (GroupCategory::TvShow, "Y"),
            ]
        );
        assert_eq!(specs[0].members, vec![0, 1, 2]);
        assert_eq!(specs[4].members, vec![1, 2]);
    }

    #[test]
    fn test_empty_group_is_rejected() {
        let spec = GroupSpec {
            category: GroupCategory::TvShow,
            name: "ghost".to_string(),
            members: vec![],
        };
        let universe = LabelUniverse::from_labels(["news"]);
        let err = score_group(&spec, &[], &[], &universe, ZeroDivision::Undefined).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::EmptyGroup {
                category: GroupCategory::TvShow,
                name: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_topic_group_scored_against_full_universe() {
        let rows = vec![
            row("1", "news", "news", "X"),
            row("2", "sports", "news", "X"),
        ];
        let matrix = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let universe = LabelUniverse::from_labels(rows.iter().map(|r| r.actual_label.as_str()));
        let stats = group_statistics(&rows, &matrix, &universe, ZeroDivision::One).unwrap();

        let sports = stats
            .iter()
            .find(|s| s.category == GroupCategory::Topic && s.name == "sports")
            .unwrap();
        // news: p = 0/1, r = 1 (no true news); sports: p = 1 (nothing predicted), r = 0/1
        assert_eq!(sports.eval_metrics.precision, Some(0.5));
        assert_eq!(sports.eval_metrics.recall, Some(0.5));
        assert_eq!(sports.avg_cosine_intra_similarity, 1.0);

        let show = stats.iter().find(|s| s.category == GroupCategory::TvShow).unwrap();
        assert!((show.avg_cosine_intra_similarity - 1.0).abs() < 1e-12);
    }
}
