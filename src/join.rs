//! Joins episodes with their genre labels and exposes the two views every
//! analysis works from.
//!
//! - [`EpisodeView`]: one row per distinct episode identifier, for
//!   episode-level statistics.
//! - [`GenreRowView`]: one row per (episode, genre) pair, for genre-level
//!   statistics. Multi-genre episodes appear once per genre.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::model::{Episode, GenreLabel, JoinedRow};

/// Result of the left outer join of the episode table with the genre table.
#[derive(Debug, Clone, Default)]
pub struct JoinedTable {
    rows: Vec<JoinedRow>,
}

/// Left outer join on `tconst`.
///
/// Every episode is kept. An episode with `k` genre labels yields `k` rows
/// with `main_genre` set to each label in genre-table order; an episode with
/// none yields one row with `main_genre = None`. The episode's own `genres`
/// field is carried as `genre_combi`. No de-duplication happens here.
pub fn join_genres(episodes: Vec<Episode>, genres: &[GenreLabel]) -> JoinedTable {
    let mut by_id: HashMap<&str, Vec<Option<&str>>> = HashMap::new();
    for label in genres {
        by_id
            .entry(label.tconst.as_str())
            .or_default()
            .push(label.genre.as_deref());
    }

    let mut rows = Vec::with_capacity(episodes.len());
    let mut unmatched = 0usize;

    for episode in episodes {
        let episode = Arc::new(episode);
        match by_id.get(episode.tconst.as_str()) {
            Some(labels) => {
                for label in labels {
                    rows.push(JoinedRow {
                        episode: Arc::clone(&episode),
                        main_genre: label.map(str::to_string),
                    });
                }
            }
            None => {
                unmatched += 1;
                rows.push(JoinedRow {
                    episode,
                    main_genre: None,
                });
            }
        }
    }

    debug!(rows = rows.len(), unmatched, "Genre join complete");
    JoinedTable { rows }
}

impl JoinedTable {
    pub fn from_rows(rows: Vec<JoinedRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct-on-identifier view; keeps the first row of each episode.
    pub fn episode_view(&self) -> EpisodeView<'_> {
        let mut seen = HashSet::new();
        let episodes = self
            .rows
            .iter()
            .filter(|row| seen.insert(row.tconst()))
            .map(|row| row.episode.as_ref())
            .collect();
        EpisodeView { episodes }
    }

    /// Non-deduplicated view: every (episode, genre) row.
    pub fn genre_rows(&self) -> GenreRowView<'_> {
        GenreRowView { rows: &self.rows }
    }
}

/// Episodes de-duplicated by identifier, in first-appearance order.
#[derive(Debug, Clone)]
pub struct EpisodeView<'a> {
    episodes: Vec<&'a Episode>,
}

impl<'a> EpisodeView<'a> {
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Episode> + '_ {
        self.episodes.iter().copied()
    }
}

/// One row per episode/genre pair.
#[derive(Debug, Clone, Copy)]
pub struct GenreRowView<'a> {
    rows: &'a [JoinedRow],
}

impl<'a> GenreRowView<'a> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a JoinedRow> + 'a {
        self.rows.iter()
    }

    /// Rows carrying a genre label.
    pub fn labelled(&self) -> impl Iterator<Item = (&'a str, &'a JoinedRow)> + 'a {
        self.rows
            .iter()
            .filter_map(|row| row.genre().map(|genre| (genre, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(tconst: &str, combi: &str) -> Episode {
        Episode {
            tconst: tconst.to_string(),
            genre_combi: Some(combi.to_string()),
            ..Default::default()
        }
    }

    fn label(tconst: &str, genre: &str) -> GenreLabel {
        GenreLabel {
            tconst: tconst.to_string(),
            genre: Some(genre.to_string()),
        }
    }

    fn sample_table() -> JoinedTable {
        join_genres(
            vec![episode("e1", "Comedy,Drama"), episode("e2", "Family")],
            &[label("e1", "Comedy"), label("e1", "Drama"), label("e9", "Horror")],
        )
    }

    #[test]
    fn test_left_join_keeps_unmatched_episodes() {
        let table = sample_table();
        let rows: Vec<_> = table.genre_rows().iter().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].genre(), Some("Comedy"));
        assert_eq!(rows[1].genre(), Some("Drama"));
        assert_eq!(rows[2].tconst(), "e2");
        assert_eq!(rows[2].genre(), None);
    }

    #[test]
    fn test_genre_fields_are_disambiguated() {
        let table = sample_table();
        let first = table.genre_rows().iter().next().unwrap();

        assert_eq!(first.main_genre.as_deref(), Some("Comedy"));
        assert_eq!(first.episode.genre_combi.as_deref(), Some("Comedy,Drama"));
    }

    #[test]
    fn test_episode_view_is_distinct_on_identifier() {
        let table = sample_table();
        let ids: Vec<_> = table.episode_view().iter().map(|e| e.tconst.as_str()).collect();
        assert_eq!(ids, vec!["e1", "e2"]);
    }

    #[test]
    fn test_labelled_skips_missing_genre() {
        let table = sample_table();
        let genres: Vec<_> = table.genre_rows().labelled().map(|(g, _)| g).collect();
        assert_eq!(genres, vec!["Comedy", "Drama"]);
    }

    #[test]
    fn test_genre_rows_for_unknown_episode_are_dropped() {
        let table = sample_table();
        assert!(table.genre_rows().iter().all(|row| row.tconst() != "e9"));
    }
}
