// Error taxonomy for the analysis pipeline.
//
// Every variant is fatal for the run: the pipeline either produces both
// output collections or returns one of these. Nothing here is retried.

use thiserror::Error;

use crate::db::models::GroupCategory;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// A feature-vector string failed to parse or has the wrong dimension.
    #[error("malformed input at row {row} (content_id {content_id:?}): {reason}")]
    MalformedInput {
        row: usize,
        content_id: String,
        reason: String,
    },

    /// A zero-length or all-zero vector took part in a cosine distance.
    #[error("degenerate feature vector at row {row}: cosine distance is undefined")]
    DegenerateVector { row: usize },

    /// A partition member with no rows.
    #[error("group {category}/{name:?} has no rows")]
    EmptyGroup {
        category: GroupCategory,
        name: String,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
