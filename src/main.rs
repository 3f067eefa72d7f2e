use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use vidstats::analysis::{self, PipelineOptions, ZeroDivision};
use vidstats::config::Config;
use vidstats::db::models::{GroupCategory, GroupFilter, VideoFilter};
use vidstats::db::Database;

/// vidstats: classification quality and intra-group similarity for a
/// labeled video dataset.
///
/// Computes macro precision/recall/F1 and mean cosine distance for the
/// whole dataset, each topic and each TV show, plus a 2-D PCA projection
/// of every video's feature vector.
#[derive(Parser)]
#[command(name = "vidstats", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Run the pipeline over an input table and replace the stored results
    Process {
        /// Input table (defaults to VIDSTATS_DATA_PATH)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Column delimiter, e.g. ";" or "tab" (defaults to VIDSTATS_DELIMITER)
        #[arg(long)]
        delimiter: Option<String>,

        /// Zero-division policy: undefined or one (defaults to VIDSTATS_ZERO_DIVISION)
        #[arg(long)]
        zero_division: Option<ZeroDivision>,
    },

    /// Show stored group statistics
    Groups {
        /// Only this category (all, topic, tv_show)
        #[arg(long)]
        category: Option<GroupCategory>,

        /// Only groups with this name
        #[arg(long)]
        name: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show stored videos with their projected coordinates
    Videos {
        #[arg(long)]
        content_id: Option<String>,

        #[arg(long)]
        topic: Option<String>,

        #[arg(long)]
        predicted_topic: Option<String>,

        #[arg(long)]
        tv_show: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show system status (DB stats, last run)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vidstats=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing vidstats database...");
            let config = Config::load()?;
            let db = vidstats::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: run `vidstats process --input <table>`");
        }

        Commands::Process {
            input,
            delimiter,
            zero_division,
        } => {
            let mut config = Config::load()?;
            if let Some(path) = input {
                config.data_path = path;
            }
            if let Some(raw) = delimiter {
                config.delimiter = vidstats::ingest::parse_delimiter(&raw)?;
            }
            if let Some(policy) = zero_division {
                config.zero_division = policy;
            }
            config.require_data_file()?;

            let db = vidstats::db::initialize_sqlite(&config.db_path)?;
            process(&config, &db).await?;
        }

        Commands::Groups {
            category,
            name,
            json,
        } => {
            let config = Config::load()?;
            let db = vidstats::db::open_sqlite(&config.db_path)?;
            let groups = db.get_group_stats(&GroupFilter { category, name }).await?;
            if json {
                println!("{}", vidstats::output::to_json(&groups)?);
            } else {
                vidstats::output::terminal::display_group_stats(&groups);
            }
        }

        Commands::Videos {
            content_id,
            topic,
            predicted_topic,
            tv_show,
            json,
        } => {
            let config = Config::load()?;
            let db = vidstats::db::open_sqlite(&config.db_path)?;
            let filter = VideoFilter {
                content_id,
                topic,
                predicted_topic,
                tv_show,
            };
            let videos = db.get_videos(&filter).await?;
            if json {
                println!("{}", vidstats::output::to_json(&videos)?);
            } else {
                vidstats::output::terminal::display_videos(&videos);
            }
        }

        Commands::Status => {
            let config = Config::load()?;
            if !vidstats::status::database_exists(&config.db_path) {
                println!("Database: not initialized");
                println!("\nRun `vidstats init` to set up the database.");
                return Ok(());
            }
            let db = vidstats::db::open_sqlite(&config.db_path)?;
            vidstats::status::show(&db, &config.db_path).await?;
        }
    }

    Ok(())
}

/// Load the input table, run the pipeline and store both collections.
///
/// The pipeline runs to completion before anything is written, and the
/// store replaces both collections in one transaction, so a failure at any
/// step leaves the previous results untouched.
async fn process(config: &Config, db: &Arc<dyn Database>) -> Result<()> {
    println!("Loading {}...", config.data_path.display());
    let rows = vidstats::ingest::load_table(&config.data_path, config.delimiter)?;
    if rows.is_empty() {
        warn!(path = %config.data_path.display(), "Input table has no rows");
    }

    let options = PipelineOptions {
        zero_division: config.zero_division,
    };
    info!(
        rows = rows.len(),
        zero_division = %options.zero_division,
        "Running analysis pipeline"
    );
    let output = analysis::run(&rows, &options).with_context(|| {
        format!(
            "Analysis failed for {}; stored results were left unchanged",
            config.data_path.display()
        )
    })?;

    let source = config.data_path.display().to_string();
    db.replace_results(
        &output.group_stats,
        &output.videos,
        &[
            ("source", source.as_str()),
            ("zero_division", options.zero_division.as_str()),
        ],
    )
    .await?;
    info!(
        groups = output.group_stats.len(),
        videos = output.videos.len(),
        "Stored pipeline results"
    );

    vidstats::output::terminal::display_label_report(&output.label_report);
    vidstats::output::terminal::display_group_stats(&output.group_stats);

    println!(
        "{}",
        format!(
            "Processed {} videos into {} groups.",
            output.videos.len(),
            output.group_stats.len()
        )
        .bold()
    );
    Ok(())
}
