// Database trait: backend-agnostic async interface for the result store.
//
// The pipeline hands its two collections to an implementor in one call and
// reads come back through exact-match filters. Methods are async so a sync
// backend (rusqlite behind a Mutex) and a native async one fit the same
// interface.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{GroupFilter, GroupStatistics, VideoFilter, VideoRecord, VideoView};

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Results ---

    /// Atomically replace both collections with a new run's output and
    /// record the run metadata.
    async fn replace_results(
        &self,
        group_stats: &[GroupStatistics],
        videos: &[VideoRecord],
        run_meta: &[(&str, &str)],
    ) -> Result<()>;

    /// Group statistics matching the filter, in pipeline order.
    async fn get_group_stats(&self, filter: &GroupFilter) -> Result<Vec<GroupStatistics>>;

    /// Videos matching the filter, without feature vectors.
    async fn get_videos(&self, filter: &VideoFilter) -> Result<Vec<VideoView>>;

    /// The stored feature vector for one video.
    async fn get_feature_vector(&self, content_id: &str) -> Result<Option<Vec<f64>>>;

    /// Row counts of (group statistics, videos).
    async fn collection_counts(&self) -> Result<(i64, i64)>;

    // --- Run state ---

    /// Get a run state value by key (e.g., "last_run_at").
    async fn get_run_state(&self, key: &str) -> Result<Option<String>>;
}
