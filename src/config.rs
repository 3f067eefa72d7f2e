use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::analysis::ZeroDivision;
use crate::ingest::{parse_delimiter, DEFAULT_DELIMITER};

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override the input path, delimiter and zero-division policy per run.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file holding the result collections.
    pub db_path: String,
    /// Input table read by `vidstats process`.
    pub data_path: PathBuf,
    /// Column delimiter of the input table.
    pub delimiter: u8,
    /// Zero-denominator policy for precision/recall/F1.
    pub zero_division: ZeroDivision,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only malformed values are errors.
    pub fn load() -> Result<Self> {
        let delimiter = match env::var("VIDSTATS_DELIMITER") {
            Ok(raw) => parse_delimiter(&raw).context("Invalid VIDSTATS_DELIMITER")?,
            Err(_) => DEFAULT_DELIMITER,
        };

        let zero_division = match env::var("VIDSTATS_ZERO_DIVISION") {
            Ok(raw) => raw
                .parse::<ZeroDivision>()
                .map_err(|e| anyhow::anyhow!("Invalid VIDSTATS_ZERO_DIVISION: {e}"))?,
            Err(_) => ZeroDivision::default(),
        };

        Ok(Self {
            db_path: env::var("VIDSTATS_DB_PATH").unwrap_or_else(|_| "./vidstats.db".to_string()),
            data_path: env::var("VIDSTATS_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/videos.csv")),
            delimiter,
            zero_division,
        })
    }

    /// Check that the input table exists.
    /// Call this before any operation that reads the dataset.
    pub fn require_data_file(&self) -> Result<()> {
        require_file(&self.data_path)
    }
}

fn require_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        anyhow::bail!(
            "Input table not found at {}\n\
             Set VIDSTATS_DATA_PATH in your .env file or pass --input.",
            path.display()
        );
    }
    Ok(())
}
