// System status display: shows DB stats, collection sizes and the last run.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::db::Database;

/// Display system status to the terminal.
pub async fn show(db: &Arc<dyn Database>, db_path: &str) -> Result<()> {
    // Database file size
    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path, file_size);

    let (groups, videos) = db.collection_counts().await?;
    println!("Group statistics: {groups}");
    println!("Videos: {videos}");

    match db.get_run_state("last_run_at").await? {
        Some(last_run) => {
            println!("Last run: {last_run}");
            if let Some(source) = db.get_run_state("source").await? {
                println!("  Input: {source}");
            }
            if let Some(policy) = db.get_run_state("zero_division").await? {
                println!("  Zero-division policy: {policy}");
            }
        }
        None => {
            println!("Last run: never");
            println!("  Run `vidstats process` to compute results");
        }
    }

    Ok(())
}

/// Whether the database file exists at all.
pub fn database_exists(db_path: &str) -> bool {
    Path::new(db_path).exists()
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
