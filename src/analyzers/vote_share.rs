//! Per-decade vote share of each genre.
//!
//! An episode listed under `k` genres has its votes split evenly across its
//! `k` genre rows, so every episode's votes are counted exactly once per
//! decade no matter how many genres it carries.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::analyzers::types::VoteShareRow;
use crate::join::GenreRowView;

pub const OTHER_GENRE: &str = "Other";

/// `floor(year / 10) * 10`.
pub fn decade_start(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Display label of a decade, e.g. `"1990-1999"`.
pub fn decade_label(start: i32) -> String {
    format!("{}-{}", start, start + 9)
}

/// A genre row's share of an episode's votes.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedVote<'a> {
    pub tconst: &'a str,
    pub genre: &'a str,
    pub decade_start: i32,
    pub weighted_votes: f64,
}

/// Rows with a genre, votes and year, each carrying `num_votes / n_genres`.
///
/// `n_genres` counts the episode's rows that pass the same filter.
pub fn weighted_votes<'a>(view: GenreRowView<'a>) -> Vec<WeightedVote<'a>> {
    let qualifying: Vec<_> = view
        .labelled()
        .filter_map(|(genre, row)| {
            let votes = row.episode.num_votes?;
            let year = row.episode.year?;
            Some((row.tconst(), genre, year, votes))
        })
        .collect();

    let mut n_genres: HashMap<&str, usize> = HashMap::new();
    for &(tconst, ..) in &qualifying {
        *n_genres.entry(tconst).or_default() += 1;
    }

    qualifying
        .into_iter()
        .map(|(tconst, genre, year, votes)| WeightedVote {
            tconst,
            genre,
            decade_start: decade_start(year),
            weighted_votes: votes as f64 / n_genres[tconst] as f64,
        })
        .collect()
}

/// Vote share per decade and genre bucket.
///
/// Genres outside `named_genres` are collapsed into [`OTHER_GENRE`] before
/// summing. Rows are ordered by decade, then by `named_genres` order with
/// `"Other"` last; buckets with no rows in a decade are omitted. A decade
/// whose total is zero reports NaN proportions.
pub fn vote_share(view: GenreRowView<'_>, named_genres: &[String]) -> Vec<VoteShareRow> {
    let other = named_genres.len();
    let bucket_of = |genre: &str| {
        named_genres
            .iter()
            .position(|g| g == genre)
            .unwrap_or(other)
    };

    // decade -> per-bucket (rows, total)
    let mut decades: BTreeMap<i32, Vec<(usize, f64)>> = BTreeMap::new();
    for vote in weighted_votes(view) {
        let buckets = decades
            .entry(vote.decade_start)
            .or_insert_with(|| vec![(0, 0.0); other + 1]);
        let slot = &mut buckets[bucket_of(vote.genre)];
        slot.0 += 1;
        slot.1 += vote.weighted_votes;
    }

    let mut rows = Vec::new();
    for (start, buckets) in decades {
        let decade_total: f64 = buckets.iter().map(|&(_, total)| total).sum();
        if decade_total == 0.0 {
            debug!(decade = start, "Decade has no votes; proportions undefined");
        }

        for (bucket, &(count, total)) in buckets.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let genre = named_genres
                .get(bucket)
                .map_or(OTHER_GENRE, String::as_str);
            let proportion = if decade_total == 0.0 {
                f64::NAN
            } else {
                total / decade_total
            };
            rows.push(VoteShareRow {
                decade_start: start,
                decade: decade_label(start),
                genre: genre.to_string(),
                total_votes: total,
                proportion,
            });
        }
    }

    rows
}
