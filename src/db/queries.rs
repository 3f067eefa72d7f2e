// Database queries: CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::Result;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{
    EvalMetrics, GroupCategory, GroupFilter, GroupStatistics, VideoFilter, VideoRecord, VideoView,
};

// --- Results ---

/// Replace both result collections in a single transaction.
///
/// Clears the previous run's rows, inserts the new ones in order, and
/// records `last_run_at` plus any extra run metadata. If anything fails the
/// transaction rolls back and the previous results stay intact.
pub fn replace_results(
    conn: &mut Connection,
    group_stats: &[GroupStatistics],
    videos: &[VideoRecord],
    run_meta: &[(&str, &str)],
) -> Result<()> {
    let tx = conn.transaction()?;

    tx.execute("DELETE FROM group_statistics", [])?;
    tx.execute("DELETE FROM videos", [])?;

    {
        let mut stmt = tx.prepare(
            "INSERT INTO group_statistics
                (category, name, precision, recall, f1_score, avg_cosine_intra_similarity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for g in group_stats {
            stmt.execute(params![
                g.category.as_str(),
                g.name,
                g.eval_metrics.precision,
                g.eval_metrics.recall,
                g.eval_metrics.f1_score,
                g.avg_cosine_intra_similarity,
            ])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO videos
                (content_id, topic, predicted_topic, tv_show, pca_x, pca_y, feature_vector)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for v in videos {
            let vector_json = serde_json::to_string(&v.feature_vector)?;
            stmt.execute(params![
                v.content_id,
                v.topic,
                v.predicted_topic,
                v.tv_show,
                v.pca_x,
                v.pca_y,
                vector_json,
            ])?;
        }
    }

    let now = chrono::Utc::now().to_rfc3339();
    set_run_state(&tx, "last_run_at", &now)?;
    for (key, value) in run_meta {
        set_run_state(&tx, key, value)?;
    }

    tx.commit()?;
    Ok(())
}

/// Read group statistics matching every set filter field, in insertion order.
pub fn get_group_stats(conn: &Connection, filter: &GroupFilter) -> Result<Vec<GroupStatistics>> {
    let mut stmt = conn.prepare(
        "SELECT category, name, precision, recall, f1_score, avg_cosine_intra_similarity
         FROM group_statistics
         WHERE (?1 IS NULL OR category = ?1)
           AND (?2 IS NULL OR name = ?2)
         ORDER BY id",
    )?;

    let rows = stmt.query_map(
        params![filter.category.map(|c| c.as_str()), filter.name],
        |row| {
            let category: String = row.get(0)?;
            let category = category.parse::<GroupCategory>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Text, e.into())
            })?;
            Ok(GroupStatistics {
                category,
                name: row.get(1)?,
                eval_metrics: EvalMetrics {
                    precision: row.get(2)?,
                    recall: row.get(3)?,
                    f1_score: row.get(4)?,
                },
                avg_cosine_intra_similarity: row.get(5)?,
            })
        },
    )?;

    let mut groups = Vec::new();
    for row in rows {
        groups.push(row?);
    }
    Ok(groups)
}

/// Read videos matching every set filter field, in insertion order.
/// Feature vectors are never selected here.
pub fn get_videos(conn: &Connection, filter: &VideoFilter) -> Result<Vec<VideoView>> {
    let mut stmt = conn.prepare(
        "SELECT content_id, topic, predicted_topic, tv_show, pca_x, pca_y
         FROM videos
         WHERE (?1 IS NULL OR content_id = ?1)
           AND (?2 IS NULL OR topic = ?2)
           AND (?3 IS NULL OR predicted_topic = ?3)
           AND (?4 IS NULL OR tv_show = ?4)
         ORDER BY id",
    )?;

    let rows = stmt.query_map(
        params![
            filter.content_id,
            filter.topic,
            filter.predicted_topic,
            filter.tv_show
        ],
        |row| {
            Ok(VideoView {
                content_id: row.get(0)?,
                topic: row.get(1)?,
                predicted_topic: row.get(2)?,
                tv_show: row.get(3)?,
                pca_x: row.get(4)?,
                pca_y: row.get(5)?,
            })
        },
    )?;

    let mut videos = Vec::new();
    for row in rows {
        videos.push(row?);
    }
    Ok(videos)
}

/// Load the stored feature vector for a video (first match by content id).
pub fn get_feature_vector(conn: &Connection, content_id: &str) -> Result<Option<Vec<f64>>> {
    let mut stmt =
        conn.prepare("SELECT feature_vector FROM videos WHERE content_id = ?1 ORDER BY id LIMIT 1")?;
    let result: Option<String> = stmt
        .query_row(params![content_id], |row| row.get(0))
        .optional()?;

    match result {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Row counts of (group_statistics, videos).
pub fn collection_counts(conn: &Connection) -> Result<(i64, i64)> {
    let groups: i64 = conn.query_row("SELECT COUNT(*) FROM group_statistics", [], |row| row.get(0))?;
    let videos: i64 = conn.query_row("SELECT COUNT(*) FROM videos", [], |row| row.get(0))?;
    Ok((groups, videos))
}

// --- Run state ---

/// Get a run state value by key (e.g., "last_run_at").
pub fn get_run_state(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM run_state WHERE key = ?1")?;
    let result = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    Ok(result)
}

/// Set a run state value (upsert).
pub fn set_run_state(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO run_state (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
        params![key, value],
    )?;
    Ok(())
}
