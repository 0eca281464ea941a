use crate::analyzers::aggregate::{Aggregate, descending, group_by};
use crate::analyzers::category::delta_category;
use crate::analyzers::types::{EpisodeRatingDelta, GenreRatingDelta};
use crate::join::{EpisodeView, GenreRowView};

/// `average_rating - parent_average_rating` for every episode with both ratings.
pub fn episode_deltas(view: &EpisodeView<'_>) -> Vec<EpisodeRatingDelta> {
    view.iter()
        .filter_map(|episode| {
            Some(EpisodeRatingDelta {
                tconst: episode.tconst.clone(),
                title: episode.primary_title.clone(),
                parent_title: episode.parent_primary_title.clone(),
                rating_diff: episode.rating_diff()?,
            })
        })
        .collect()
}

/// Mean rating delta per genre, highest first.
///
/// Only rows with a genre and both ratings contribute. Ties keep encounter order.
pub fn genre_deltas(view: GenreRowView<'_>) -> Vec<GenreRatingDelta> {
    let pairs = view
        .labelled()
        .filter_map(|(genre, row)| Some((genre, Some(row.episode.rating_diff()?))));

    let mut deltas: Vec<GenreRatingDelta> = group_by(pairs, Aggregate::Mean)
        .into_iter()
        .map(|stat| GenreRatingDelta {
            category: delta_category(stat.value),
            genre: stat.key,
            mean_diff: stat.value,
            rows: stat.rows,
        })
        .collect();
    deltas.sort_by(|a, b| descending(a.mean_diff, b.mean_diff));
    deltas
}
