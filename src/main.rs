//! CLI entry point for the holiday episode analysis.
//!
//! Provides subcommands for running the full report, printing the summary
//! tables, and listing per-genre runtime/rating sweet spots.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use holiday_episodes::analyzers::analyzer::{analyze, load_dataset};
use holiday_episodes::analyzers::density::density_peaks;
use holiday_episodes::analyzers::top::{top_genres, top_rated_episodes, top_voted_episodes};
use holiday_episodes::config::PipelineConfig;
use holiday_episodes::output::write_report;
use holiday_episodes::stats::SummaryStats;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const EPISODES_URL: &str = "https://raw.githubusercontent.com/rfordatascience/tidytuesday/master/data/2023/2023-12-19/holiday_episodes.csv";
const GENRES_URL: &str = "https://raw.githubusercontent.com/rfordatascience/tidytuesday/master/data/2023/2023-12-19/holiday_episode_genres.csv";

#[derive(Parser)]
#[command(name = "holiday_episodes")]
#[command(about = "Descriptive analysis of holiday TV episodes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Sources {
    /// Episode table: path or URL (gzip accepted)
    #[arg(long, value_name = "FILE_OR_URL", default_value = EPISODES_URL)]
    episodes: String,

    /// Genre table: path or URL (gzip accepted)
    #[arg(long, value_name = "FILE_OR_URL", default_value = GENRES_URL)]
    genres: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every analysis and write all tables to a directory
    Analyze {
        #[command(flatten)]
        sources: Sources,

        /// Directory to write CSV tables and report.json into
        #[arg(short, long, default_value = "report")]
        output_dir: PathBuf,

        /// JSON file overriding pipeline parameters
        #[arg(short, long)]
        config: Option<String>,
    },
    /// Log the summary statistics and top-10 tables
    Summary {
        #[command(flatten)]
        sources: Sources,
    },
    /// Log the runtime/rating sweet spot of the most-voted genres
    SweetSpots {
        #[command(flatten)]
        sources: Sources,

        /// JSON file overriding pipeline parameters
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/holiday_episodes.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("holiday_episodes.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            sources,
            output_dir,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let report = analyze(&sources.episodes, &sources.genres, &config).await?;
            write_report(&output_dir, &report)?;
        }
        Commands::Summary { sources } => {
            let table = load_dataset(&sources.episodes, &sources.genres).await?;
            let config = PipelineConfig::default();

            for m in SummaryStats::from_table(&table).metrics() {
                info!(metric = %m.metric, value = ?m.value, "Summary");
            }

            for row in top_genres(table.genre_rows(), config.top_n).rows() {
                info!(
                    rank = row.rank,
                    by_votes = ?row.votes_genre,
                    mean_votes = ?row.mean_votes,
                    by_rating = ?row.rating_genre,
                    mean_rating = ?row.mean_rating,
                    by_count = ?row.count_genre,
                    episodes = ?row.episode_count,
                    "Top genres"
                );
            }

            let episodes = table.episode_view();
            for row in top_rated_episodes(&episodes, config.top_n) {
                info!(
                    rank = row.rank,
                    title = ?row.title,
                    series = ?row.parent_title,
                    rating = ?row.average_rating,
                    "Top rated episode"
                );
            }
            for row in top_voted_episodes(&episodes, config.top_n) {
                info!(
                    rank = row.rank,
                    title = ?row.title,
                    series = ?row.parent_title,
                    votes = ?row.num_votes,
                    "Top voted episode"
                );
            }
        }
        Commands::SweetSpots { sources, config } => {
            let config = load_config(config.as_deref())?;
            let table = load_dataset(&sources.episodes, &sources.genres).await?;
            let density = density_peaks(table.genre_rows(), &config);

            for spot in &density.sweet_spots {
                info!(
                    genre = %spot.genre,
                    runtime = %format!("{:.1}", spot.runtime_center),
                    rating = %format!("{:.2}", spot.rating_center),
                    samples = spot.sample_size,
                    "Sweet spot"
                );
            }
            for skipped in &density.skipped {
                warn!(genre = %skipped.genre, reason = %skipped.reason, "Genre skipped");
            }
        }
    }

    Ok(())
}

/// Loads a pipeline config from `path`, or the defaults when none is given.
fn load_config(path: Option<&str>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            let config = PipelineConfig::load(path)?;
            info!(path, ?config, "Loaded pipeline config");
            Ok(config)
        }
        None => Ok(PipelineConfig::default()),
    }
}
