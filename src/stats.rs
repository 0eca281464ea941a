use std::collections::HashSet;

use serde::Serialize;

use crate::analyzers::types::SummaryMetric;
use crate::join::JoinedTable;

/// Headline counts of the joined dataset.
///
/// Episode counts are taken over distinct episodes; the genre count over
/// genre rows.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_episodes: usize,
    pub parent_series: usize,
    pub genres: usize,
    pub earliest_year: Option<i32>,
    pub latest_year: Option<i32>,

    // holiday keyword categories
    pub christmas_episodes: usize,
    pub hanukkah_episodes: usize,
    pub kwanzaa_episodes: usize,
    pub holiday_episodes: usize,
}

impl SummaryStats {
    pub fn from_table(table: &JoinedTable) -> Self {
        let episodes = table.episode_view();
        let mut s = SummaryStats {
            total_episodes: episodes.len(),
            ..Default::default()
        };

        let mut parents = HashSet::new();
        for e in episodes.iter() {
            if let Some(parent) = e.parent_key() {
                parents.insert(parent);
            }

            if let Some(year) = e.year {
                s.earliest_year = Some(s.earliest_year.map_or(year, |y| y.min(year)));
                s.latest_year = Some(s.latest_year.map_or(year, |y| y.max(year)));
            }

            if e.christmas {
                s.christmas_episodes += 1;
            }

            if e.hanukkah {
                s.hanukkah_episodes += 1;
            }

            if e.kwanzaa {
                s.kwanzaa_episodes += 1;
            }

            if e.holiday {
                s.holiday_episodes += 1;
            }
        }
        s.parent_series = parents.len();

        s.genres = table
            .genre_rows()
            .labelled()
            .map(|(genre, _)| genre)
            .collect::<HashSet<_>>()
            .len();

        s
    }

    /// The summary as a `(metric, value)` table.
    pub fn metrics(&self) -> Vec<SummaryMetric> {
        let count = |n: usize| i64::try_from(n).ok();
        [
            ("Total episodes", count(self.total_episodes)),
            ("Parent series", count(self.parent_series)),
            ("Genres", count(self.genres)),
            ("Earliest year", self.earliest_year.map(i64::from)),
            ("Latest year", self.latest_year.map(i64::from)),
            ("Christmas episodes", count(self.christmas_episodes)),
            ("Hanukkah episodes", count(self.hanukkah_episodes)),
            ("Kwanzaa episodes", count(self.kwanzaa_episodes)),
            ("General holiday episodes", count(self.holiday_episodes)),
        ]
        .into_iter()
        .map(|(metric, value)| SummaryMetric {
            metric: metric.to_string(),
            value,
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::join_genres;
    use crate::model::{Episode, GenreLabel};

    fn episode(tconst: &str, parent: &str, year: Option<i32>) -> Episode {
        Episode {
            tconst: tconst.to_string(),
            parent_tconst: Some(parent.to_string()),
            year,
            ..Default::default()
        }
    }

    fn label(tconst: &str, genre: &str) -> GenreLabel {
        GenreLabel {
            tconst: tconst.to_string(),
            genre: Some(genre.to_string()),
        }
    }

    #[test]
    fn test_summary_counts_distinct_episodes() {
        let mut e1 = episode("e1", "p1", Some(1994));
        e1.christmas = true;
        let mut e2 = episode("e2", "p1", Some(1962));
        e2.hanukkah = true;
        e2.holiday = true;
        let e3 = episode("e3", "p2", None);

        let table = join_genres(
            vec![e1, e2, e3],
            &[label("e1", "Comedy"), label("e1", "Drama"), label("e2", "Comedy")],
        );
        let stats = SummaryStats::from_table(&table);

        assert_eq!(stats.total_episodes, 3);
        assert_eq!(stats.parent_series, 2);
        assert_eq!(stats.genres, 2);
        assert_eq!(stats.earliest_year, Some(1962));
        assert_eq!(stats.latest_year, Some(1994));
        assert_eq!(stats.christmas_episodes, 1);
        assert_eq!(stats.hanukkah_episodes, 1);
        assert_eq!(stats.kwanzaa_episodes, 0);
        assert_eq!(stats.holiday_episodes, 1);
    }

    #[test]
    fn test_metrics_table() {
        let stats = SummaryStats {
            total_episodes: 5,
            earliest_year: Some(1949),
            ..Default::default()
        };
        let metrics = stats.metrics();

        assert_eq!(metrics.len(), 9);
        assert_eq!(metrics[0].metric, "Total episodes");
        assert_eq!(metrics[0].value, Some(5));
        assert_eq!(metrics[3].value, Some(1949));
        assert_eq!(metrics[4].value, None);
    }

    #[test]
    fn test_empty_table() {
        let stats = SummaryStats::from_table(&JoinedTable::default());
        assert_eq!(stats, SummaryStats::default());
    }
}
