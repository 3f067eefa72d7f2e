// Data models: Rust structs that flow through the pipeline and the store.
//
// These are separate from the database queries so the analysis modules can
// use them without depending on rusqlite directly. Field names match the
// public read interface (`topic`, `predicted_topic`, `tv_show`), not the
// input table's column names.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One row of the input table, exactly as loaded.
///
/// `feature_vector` is still the raw comma-separated string; parsing
/// happens inside the pipeline so malformed rows are reported by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawVideoRow {
    pub content_id: String,
    pub actual_label: String,
    pub predicted_label: String,
    pub tvshow: String,
    pub feature_vector: String,
}

/// A fully processed video: labels, projected coordinates, and the parsed
/// feature vector (kept for storage, never served).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub content_id: String,
    pub topic: String,
    pub predicted_topic: String,
    pub tv_show: String,
    pub pca_x: f64,
    pub pca_y: f64,
    pub feature_vector: Vec<f64>,
}

impl VideoRecord {
    /// The public read shape of this record (no feature vector).
    pub fn view(&self) -> VideoView {
        VideoView {
            content_id: self.content_id.clone(),
            topic: self.topic.clone(),
            predicted_topic: self.predicted_topic.clone(),
            tv_show: self.tv_show.clone(),
            pca_x: self.pca_x,
            pca_y: self.pca_y,
        }
    }
}

/// A video as exposed through read paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoView {
    pub content_id: String,
    pub topic: String,
    pub predicted_topic: String,
    pub tv_show: String,
    pub pca_x: f64,
    pub pca_y: f64,
}

/// Which partition a group statistics record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupCategory {
    All,
    Topic,
    TvShow,
}

impl GroupCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupCategory::All => "all",
            GroupCategory::Topic => "topic",
            GroupCategory::TvShow => "tv_show",
        }
    }
}

impl std::fmt::Display for GroupCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GroupCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(GroupCategory::All),
            "topic" => Ok(GroupCategory::Topic),
            "tv_show" => Ok(GroupCategory::TvShow),
            other => Err(format!(
                "unknown group category '{other}' (expected all, topic or tv_show)"
            )),
        }
    }
}

/// Macro-averaged classification quality for one group.
///
/// `None` is the explicit "undefined" marker: every label's value hit a
/// zero denominator under the `Undefined` zero-division policy. It is
/// serialized as `null`, never as NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1_score: Option<f64>,
}

/// Statistics for one partition member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub category: GroupCategory,
    pub name: String,
    pub eval_metrics: EvalMetrics,
    /// Mean pairwise cosine distance inside the group, in [0, 1].
    pub avg_cosine_intra_similarity: f64,
}

/// Exact-match filters for group statistics reads. Unset fields match all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupFilter {
    pub category: Option<GroupCategory>,
    pub name: Option<String>,
}

/// Exact-match filters for video reads. Unset fields match all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoFilter {
    pub content_id: Option<String>,
    pub topic: Option<String>,
    pub predicted_topic: Option<String>,
    pub tv_show: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip_through_str() {
        for cat in [GroupCategory::All, GroupCategory::Topic, GroupCategory::TvShow] {
            assert_eq!(cat.as_str().parse::<GroupCategory>().unwrap(), cat);
        }
        assert!("show".parse::<GroupCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&GroupCategory::TvShow).unwrap();
        assert_eq!(json, "\"tv_show\"");
    }

    #[test]
    fn test_undefined_metric_serializes_as_null() {
        let metrics = EvalMetrics {
            precision: None,
            recall: Some(1.0),
            f1_score: Some(0.5),
        };
        let json = serde_json::to_value(metrics).unwrap();
        assert!(json["precision"].is_null());
        assert_eq!(json["recall"], 1.0);
    }

    #[test]
    fn test_view_drops_feature_vector() {
        let record = VideoRecord {
            content_id: "v1".to_string(),
            topic: "news".to_string(),
            predicted_topic: "sports".to_string(),
            tv_show: "X".to_string(),
            pca_x: 0.25,
            pca_y: -1.5,
            feature_vector: vec![1.0, 2.0],
        };
        let json = serde_json::to_value(record.view()).unwrap();
        assert!(json.get("feature_vector").is_none());
        assert_eq!(json["predicted_topic"], "sports");
    }
}
