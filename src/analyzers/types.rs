//! Output tables produced by the analysis pipeline.
//!
//! Each `*Row` type is flat so it can be written as one CSV row.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::aggregate::GroupStat;
use crate::analyzers::category::DeltaCategory;

/// One named metric of the dataset summary table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetric {
    pub metric: String,
    pub value: Option<i64>,
}

/// Three ranked genre lists: by mean votes, by mean rating, by row count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopGenreComparison {
    pub by_votes: Vec<GroupStat>,
    pub by_rating: Vec<GroupStat>,
    pub by_count: Vec<GroupStat>,
}

/// One rank of [`TopGenreComparison`], flattened side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopGenreRow {
    pub rank: usize,
    pub votes_genre: Option<String>,
    pub mean_votes: Option<f64>,
    pub rating_genre: Option<String>,
    pub mean_rating: Option<f64>,
    pub count_genre: Option<String>,
    pub episode_count: Option<usize>,
}

impl TopGenreComparison {
    pub fn rows(&self) -> Vec<TopGenreRow> {
        let len = self
            .by_votes
            .len()
            .max(self.by_rating.len())
            .max(self.by_count.len());

        (0..len)
            .map(|i| {
                let votes = self.by_votes.get(i);
                let rating = self.by_rating.get(i);
                let count = self.by_count.get(i);
                TopGenreRow {
                    rank: i + 1,
                    votes_genre: votes.map(|s| s.key.clone()),
                    mean_votes: votes.map(|s| s.value),
                    rating_genre: rating.map(|s| s.key.clone()),
                    mean_rating: rating.map(|s| s.value),
                    count_genre: count.map(|s| s.key.clone()),
                    episode_count: count.map(|s| s.rows),
                }
            })
            .collect()
    }
}

/// One entry of a ranked episode table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRankRow {
    pub rank: usize,
    pub tconst: String,
    pub title: Option<String>,
    pub parent_title: Option<String>,
    pub year: Option<i32>,
    pub average_rating: Option<f64>,
    pub num_votes: Option<u64>,
}

/// Share of a decade's weighted votes held by one genre bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteShareRow {
    pub decade_start: i32,
    /// Display label, e.g. `"1990-1999"`.
    pub decade: String,
    /// A named genre or `"Other"`.
    pub genre: String,
    pub total_votes: f64,
    /// NaN when the decade has no votes at all.
    pub proportion: f64,
}

/// One cell of a genre's normalized density surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfacePoint {
    pub genre: String,
    pub runtime: f64,
    pub rating: f64,
    pub density: f64,
}

/// Location of a genre's density peak.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweetSpot {
    pub genre: String,
    pub runtime_center: f64,
    pub rating_center: f64,
    pub density: f64,
    pub sample_size: usize,
    pub bandwidth_runtime: f64,
    pub bandwidth_rating: f64,
}

/// A genre the density analyzer did not estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedGenre {
    pub genre: String,
    pub reason: String,
}

/// Density surfaces and sweet spots across all analyzed genres.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DensityReport {
    pub surface: Vec<SurfacePoint>,
    pub sweet_spots: Vec<SweetSpot>,
    pub skipped: Vec<SkippedGenre>,
}

/// Mean rating delta of a genre's episodes against their parent series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreRatingDelta {
    pub genre: String,
    pub mean_diff: f64,
    pub rows: usize,
    pub category: DeltaCategory,
}

/// Rating delta of one episode against its parent series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeRatingDelta {
    pub tconst: String,
    pub title: Option<String>,
    pub parent_title: Option<String>,
    pub rating_diff: f64,
}

/// Every table produced by one pipeline run, serialized as `report.json`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub summary: Vec<SummaryMetric>,
    pub top_genres: TopGenreComparison,
    pub top_rated_episodes: Vec<EpisodeRankRow>,
    pub top_voted_episodes: Vec<EpisodeRankRow>,
    pub vote_share: Vec<VoteShareRow>,
    pub density: DensityReport,
    pub genre_rating_delta: Vec<GenreRatingDelta>,
    pub episode_rating_delta: Vec<EpisodeRatingDelta>,
}
