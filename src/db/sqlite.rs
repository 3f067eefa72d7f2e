// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{GroupFilter, GroupStatistics, VideoFilter, VideoRecord, VideoView};
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn replace_results(
        &self,
        group_stats: &[GroupStatistics],
        videos: &[VideoRecord],
        run_meta: &[(&str, &str)],
    ) -> Result<()> {
        let mut conn = self.conn.lock().await;
        super::queries::replace_results(&mut conn, group_stats, videos, run_meta)
    }

    async fn get_group_stats(&self, filter: &GroupFilter) -> Result<Vec<GroupStatistics>> {
        let conn = self.conn.lock().await;
        super::queries::get_group_stats(&conn, filter)
    }

    async fn get_videos(&self, filter: &VideoFilter) -> Result<Vec<VideoView>> {
        let conn = self.conn.lock().await;
        super::queries::get_videos(&conn, filter)
    }

    async fn get_feature_vector(&self, content_id: &str) -> Result<Option<Vec<f64>>> {
        let conn = self.conn.lock().await;
        super::queries::get_feature_vector(&conn, content_id)
    }

    async fn collection_counts(&self) -> Result<(i64, i64)> {
        let conn = self.conn.lock().await;
        super::queries::collection_counts(&conn)
    }

    async fn get_run_state(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        super::queries::get_run_state(&conn, key)
    }
}
