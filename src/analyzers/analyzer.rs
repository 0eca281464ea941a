use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::analyzers::density::density_peaks;
use crate::analyzers::rating_delta::{episode_deltas, genre_deltas};
use crate::analyzers::top::{top_genres, top_rated_episodes, top_voted_episodes};
use crate::analyzers::types::Report;
use crate::analyzers::vote_share::vote_share;
use crate::config::PipelineConfig;
use crate::join::{JoinedTable, join_genres};
use crate::parser::{parse_episodes, parse_genres};
use crate::source::load_source;
use crate::stats::SummaryStats;

/// Loads both tables from their sources (paths or URLs) and joins them.
///
/// # Errors
///
/// Fails if either source cannot be read, or if either table is missing a
/// required column or holds an invalid value.
pub async fn load_dataset(episodes_source: &str, genres_source: &str) -> Result<JoinedTable> {
    let (episode_bytes, genre_bytes) =
        tokio::try_join!(load_source(episodes_source), load_source(genres_source))?;

    let episodes = parse_episodes(episode_bytes.as_slice())
        .with_context(|| format!("parsing episode table '{episodes_source}'"))?;
    let genres = parse_genres(genre_bytes.as_slice())
        .with_context(|| format!("parsing genre table '{genres_source}'"))?;

    info!(
        episodes = episodes.len(),
        genre_rows = genres.len(),
        "Input tables loaded"
    );
    Ok(join_genres(episodes, &genres))
}

/// Runs every analysis over the joined table.
#[tracing::instrument(skip_all, fields(rows = table.len()))]
pub fn build_report(table: &JoinedTable, config: &PipelineConfig) -> Report {
    let episodes = table.episode_view();
    let genre_rows = table.genre_rows();

    let summary = SummaryStats::from_table(table);
    info!(
        episodes = summary.total_episodes,
        series = summary.parent_series,
        genres = summary.genres,
        "Dataset summary"
    );

    let density = density_peaks(genre_rows, config);
    info!(
        analyzed = density.sweet_spots.len(),
        skipped = density.skipped.len(),
        "Density analysis complete"
    );

    Report {
        generated_at: Utc::now(),
        summary: summary.metrics(),
        top_genres: top_genres(genre_rows, config.top_n),
        top_rated_episodes: top_rated_episodes(&episodes, config.top_n),
        top_voted_episodes: top_voted_episodes(&episodes, config.top_n),
        vote_share: vote_share(genre_rows, &config.vote_share_genres),
        density,
        genre_rating_delta: genre_deltas(genre_rows),
        episode_rating_delta: episode_deltas(&episodes),
    }
}

/// Loads, joins and analyzes both tables.
///
/// Nothing is written here; a failure leaves no partial output behind.
#[tracing::instrument(skip(config))]
pub async fn analyze(
    episodes_source: &str,
    genres_source: &str,
    config: &PipelineConfig,
) -> Result<Report> {
    config.validate()?;
    let table = load_dataset(episodes_source, genres_source).await?;
    Ok(build_report(&table, config))
}
