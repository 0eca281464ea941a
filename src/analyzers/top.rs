//! Ranked genre and episode tables.

use crate::analyzers::aggregate::{Aggregate, descending, group_by, top_k};
use crate::analyzers::types::{EpisodeRankRow, TopGenreComparison};
use crate::join::{EpisodeView, GenreRowView};
use crate::model::Episode;

/// Top `n` genres by mean votes, by mean rating and by number of episodes.
///
/// Computed over genre rows, so a multi-genre episode counts toward each of
/// its genres. Rows missing the ranked value are left out of that list only.
pub fn top_genres(view: GenreRowView<'_>, n: usize) -> TopGenreComparison {
    let votes = view
        .labelled()
        .filter_map(|(genre, row)| Some((genre, Some(row.episode.num_votes? as f64))));
    let ratings = view
        .labelled()
        .filter_map(|(genre, row)| Some((genre, Some(row.episode.average_rating?))));
    let counts = view.labelled().map(|(genre, _)| (genre, None));

    TopGenreComparison {
        by_votes: top_k(group_by(votes, Aggregate::Mean), n),
        by_rating: top_k(group_by(ratings, Aggregate::Mean), n),
        by_count: top_k(group_by(counts, Aggregate::Count), n),
    }
}

fn rank_episodes<F>(view: &EpisodeView<'_>, n: usize, key: F) -> Vec<EpisodeRankRow>
where
    F: Fn(&Episode) -> Option<f64>,
{
    let mut ranked: Vec<(&Episode, f64)> = view
        .iter()
        .filter_map(|episode| Some((episode, key(episode)?)))
        .collect();
    ranked.sort_by(|a, b| descending(a.1, b.1));
    ranked.truncate(n);

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (episode, _))| EpisodeRankRow {
            rank: i + 1,
            tconst: episode.tconst.clone(),
            title: episode.primary_title.clone(),
            parent_title: episode.parent_primary_title.clone(),
            year: episode.year,
            average_rating: episode.average_rating,
            num_votes: episode.num_votes,
        })
        .collect()
}

/// Top `n` distinct episodes by rating; ties keep input order.
pub fn top_rated_episodes(view: &EpisodeView<'_>, n: usize) -> Vec<EpisodeRankRow> {
    rank_episodes(view, n, |e| e.average_rating)
}

/// Top `n` distinct episodes by number of votes; ties keep input order.
pub fn top_voted_episodes(view: &EpisodeView<'_>, n: usize) -> Vec<EpisodeRankRow> {
    rank_episodes(view, n, |e| e.num_votes.map(|v| v as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::join::{JoinedTable, join_genres};
    use crate::model::GenreLabel;

    fn episode(tconst: &str, rating: Option<f64>, votes: Option<u64>) -> Episode {
        Episode {
            tconst: tconst.to_string(),
            average_rating: rating,
            num_votes: votes,
            ..Default::default()
        }
    }

    fn table() -> JoinedTable {
        let episodes = vec![
            episode("e1", Some(8.0), Some(100)),
            episode("e2", Some(6.0), Some(900)),
            episode("e3", None, Some(50)),
            episode("e4", Some(8.0), None),
        ];
        let labels: Vec<_> = [
            ("e1", "Comedy"),
            ("e1", "Drama"),
            ("e2", "Drama"),
            ("e3", "Comedy"),
            ("e4", "Animation"),
        ]
        .into_iter()
        .map(|(tconst, genre)| GenreLabel {
            tconst: tconst.to_string(),
            genre: Some(genre.to_string()),
        })
        .collect();
        join_genres(episodes, &labels)
    }

    fn keys(stats: &[crate::analyzers::aggregate::GroupStat]) -> Vec<&str> {
        stats.iter().map(|s| s.key.as_str()).collect()
    }

    #[test]
    fn test_top_genres_by_votes() {
        let t = table();
        let top = top_genres(t.genre_rows(), 10);

        // Animation has no votes and must not be ranked by votes
        assert_eq!(keys(&top.by_votes), vec!["Drama", "Comedy"]);
        assert_eq!(top.by_votes[0].value, 500.0);
        assert_eq!(top.by_votes[1].value, 75.0);
    }

    #[test]
    fn test_top_genres_by_rating_and_count() {
        let t = table();
        let top = top_genres(t.genre_rows(), 2);

        assert_eq!(keys(&top.by_rating), vec!["Comedy", "Animation"]);
        assert_eq!(keys(&top.by_count), vec!["Comedy", "Drama"]);
        assert_eq!(top.by_count[0].value, 2.0);
        assert!(top.by_rating.len() <= 2);
    }

    #[test]
    fn test_top_episodes_are_distinct_and_stable() {
        let t = table();
        let rated = top_rated_episodes(&t.episode_view(), 10);
        let ids: Vec<_> = rated.iter().map(|r| r.tconst.as_str()).collect();

        assert_eq!(ids, vec!["e1", "e4", "e2"]);
        assert_eq!(rated[0].rank, 1);
    }

    #[test]
    fn test_top_voted_episodes() {
        let t = table();
        let voted = top_voted_episodes(&t.episode_view(), 2);
        let ids: Vec<_> = voted.iter().map(|r| r.tconst.as_str()).collect();
        assert_eq!(ids, vec!["e2", "e1"]);
    }
}
