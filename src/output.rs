//! Output persistence for the report tables.
//!
//! Every table is written as its own CSV file; the whole report is also
//! written as pretty-printed JSON.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::Report;

/// Writes `rows` to a CSV file at `path`, replacing any existing file.
///
/// The header row is written even when `rows` is empty.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T], headers: &[&str]) -> Result<()> {
    debug!(path = %path.display(), rows = rows.len(), "Writing CSV table");

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new()
        .has_headers(!rows.is_empty())
        .from_writer(file);

    if rows.is_empty() {
        writer.write_record(headers)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes `value` as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

/// Writes every table of `report` into `dir` and returns the paths written.
///
/// The directory is created if needed.
pub fn write_report(dir: &Path, report: &Report) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();

    macro_rules! table {
        ($file:expr, $rows:expr, [$($header:expr),* $(,)?]) => {{
            let path = dir.join($file);
            write_table(&path, $rows, &[$($header),*])?;
            written.push(path);
        }};
    }

    table!("summary.csv", &report.summary, ["metric", "value"]);
    table!(
        "top_genres.csv",
        &report.top_genres.rows(),
        [
            "rank",
            "votes_genre",
            "mean_votes",
            "rating_genre",
            "mean_rating",
            "count_genre",
            "episode_count",
        ]
    );
    table!(
        "top_rated_episodes.csv",
        &report.top_rated_episodes,
        ["rank", "tconst", "title", "parent_title", "year", "average_rating", "num_votes"]
    );
    table!(
        "top_voted_episodes.csv",
        &report.top_voted_episodes,
        ["rank", "tconst", "title", "parent_title", "year", "average_rating", "num_votes"]
    );
    table!(
        "vote_share.csv",
        &report.vote_share,
        ["decade_start", "decade", "genre", "total_votes", "proportion"]
    );
    table!(
        "density_surface.csv",
        &report.density.surface,
        ["genre", "runtime", "rating", "density"]
    );
    table!(
        "sweet_spots.csv",
        &report.density.sweet_spots,
        [
            "genre",
            "runtime_center",
            "rating_center",
            "density",
            "sample_size",
            "bandwidth_runtime",
            "bandwidth_rating",
        ]
    );
    table!(
        "density_skipped.csv",
        &report.density.skipped,
        ["genre", "reason"]
    );
    table!(
        "genre_rating_delta.csv",
        &report.genre_rating_delta,
        ["genre", "mean_diff", "rows", "category"]
    );
    table!(
        "episode_rating_delta.csv",
        &report.episode_rating_delta,
        ["tconst", "title", "parent_title", "rating_diff"]
    );

    let json_path = dir.join("report.json");
    write_json(&json_path, report)?;
    written.push(json_path);

    info!(dir = %dir.display(), files = written.len(), "Report written");
    Ok(written)
}
