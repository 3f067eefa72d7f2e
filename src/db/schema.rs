// Database schema: table creation.
//
// Two result collections plus a small key/value table for run metadata.
// Rows keep an autoincrement id so reads come back in insertion order,
// which is the pipeline's enumeration order.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// Idempotent; safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- One row per partition member of the last run
        CREATE TABLE IF NOT EXISTS group_statistics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL,            -- all / topic / tv_show
            name TEXT NOT NULL,
            precision REAL,                    -- NULL when undefined
            recall REAL,
            f1_score REAL,
            avg_cosine_intra_similarity REAL NOT NULL
        );

        -- One row per input video of the last run
        CREATE TABLE IF NOT EXISTS videos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            content_id TEXT NOT NULL,
            topic TEXT NOT NULL,
            predicted_topic TEXT NOT NULL,
            tv_show TEXT NOT NULL,
            pca_x REAL NOT NULL,
            pca_y REAL NOT NULL,
            feature_vector TEXT NOT NULL       -- JSON array, never served
        );

        -- Run metadata: last run timestamp, input path, policy
        CREATE TABLE IF NOT EXISTS run_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_groups_category_name
            ON group_statistics(category, name);

        CREATE INDEX IF NOT EXISTS idx_videos_content_id
            ON videos(content_id);

        CREATE INDEX IF NOT EXISTS idx_videos_topic
            ON videos(topic);

        CREATE INDEX IF NOT EXISTS idx_videos_tv_show
            ON videos(tv_show);
        ",
    )
    .context("Failed to create database tables")?;

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
