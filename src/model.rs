//! Record types for the episode and genre tables.

use std::sync::Arc;

/// One row of the episode table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Episode {
    pub tconst: String,
    pub parent_tconst: Option<String>,
    pub primary_title: Option<String>,
    pub year: Option<i32>,
    pub runtime_minutes: Option<f64>,
    /// The episode's own multi-value genre string (e.g. `"Comedy,Drama"`).
    pub genre_combi: Option<String>,
    pub average_rating: Option<f64>,
    pub num_votes: Option<u64>,
    pub parent_primary_title: Option<String>,
    pub parent_average_rating: Option<f64>,

    // holiday keyword flags
    pub christmas: bool,
    pub hanukkah: bool,
    pub kwanzaa: bool,
    pub holiday: bool,
}

impl Episode {
    /// Key identifying the parent series: its identifier, or its title when the identifier is absent.
    pub fn parent_key(&self) -> Option<&str> {
        self.parent_tconst
            .as_deref()
            .or(self.parent_primary_title.as_deref())
    }

    /// `average_rating - parent_average_rating` when both are present.
    pub fn rating_diff(&self) -> Option<f64> {
        Some(self.average_rating? - self.parent_average_rating?)
    }
}

/// One row of the genre table: a single genre label for an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreLabel {
    pub tconst: String,
    pub genre: Option<String>,
}

/// One row of the joined table.
///
/// The episode is shared between all rows produced for it by the join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub episode: Arc<Episode>,
    pub main_genre: Option<String>,
}

impl JoinedRow {
    pub fn tconst(&self) -> &str {
        &self.episode.tconst
    }

    pub fn genre(&self) -> Option<&str> {
        self.main_genre.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_diff_requires_both_ratings() {
        let mut episode = Episode {
            average_rating: Some(9.1),
            parent_average_rating: Some(8.4),
            ..Default::default()
        };
        let diff = episode.rating_diff().unwrap();
        assert!((diff - 0.7).abs() < 1e-9);

        episode.parent_average_rating = None;
        assert_eq!(episode.rating_diff(), None);
    }

    #[test]
    fn test_parent_key_falls_back_to_title() {
        let episode = Episode {
            parent_primary_title: Some("Frasier".into()),
            ..Default::default()
        };
        assert_eq!(episode.parent_key(), Some("Frasier"));
    }
}
