//! Runtime/rating "sweet spot" per genre.
//!
//! For each of the most-voted genres, a 2D kernel density estimate of its
//! (runtime, rating) pairs is evaluated on a fixed grid, normalized so its
//! peak is 1.0, and the peak cell is reported as the genre's sweet spot.

use tracing::{debug, info, warn};

use crate::analyzers::aggregate::{Aggregate, group_by, top_k};
use crate::analyzers::kde::{bandwidth, kde2d};
use crate::analyzers::types::{DensityReport, SkippedGenre, SurfacePoint, SweetSpot};
use crate::config::PipelineConfig;
use crate::error::AnalysisError;
use crate::join::GenreRowView;

/// Density estimate of a single genre.
#[derive(Debug, Clone, PartialEq)]
pub struct GenreDensity {
    pub sweet_spot: SweetSpot,
    /// Cells above the surface threshold, runtime-major.
    pub surface: Vec<SurfacePoint>,
}

/// The `k` genres with the highest mean votes.
pub fn density_genres(view: GenreRowView<'_>, k: usize) -> Vec<String> {
    let pairs = view
        .labelled()
        .filter_map(|(genre, row)| Some((genre, Some(row.episode.num_votes? as f64))));
    top_k(group_by(pairs, Aggregate::Mean), k)
        .into_iter()
        .map(|s| s.key)
        .collect()
}

/// Finite (runtime, rating) pairs of every row labelled `genre`.
pub fn genre_points(view: GenreRowView<'_>, genre: &str) -> Vec<(f64, f64)> {
    view.labelled()
        .filter(|&(g, _)| g == genre)
        .filter_map(|(_, row)| {
            let runtime = row.episode.runtime_minutes?;
            let rating = row.episode.average_rating?;
            (runtime.is_finite() && rating.is_finite()).then_some((runtime, rating))
        })
        .collect()
}

/// Estimates the density surface and sweet spot of one genre.
///
/// # Errors
///
/// [`AnalysisError::InsufficientSample`] when fewer than
/// `config.min_density_sample` points are given, and
/// [`AnalysisError::DegenerateDensity`] when an axis has zero spread or the
/// grid carries no density.
pub fn analyze_genre(
    genre: &str,
    points: &[(f64, f64)],
    config: &PipelineConfig,
) -> Result<GenreDensity, AnalysisError> {
    if points.len() < config.min_density_sample {
        return Err(AnalysisError::InsufficientSample {
            genre: genre.to_string(),
            required: config.min_density_sample,
            actual: points.len(),
        });
    }

    let degenerate = |reason: &str| AnalysisError::DegenerateDensity {
        genre: genre.to_string(),
        reason: reason.to_string(),
    };

    let runtimes: Vec<f64> = points.iter().map(|p| p.0).collect();
    let ratings: Vec<f64> = points.iter().map(|p| p.1).collect();
    let hx = bandwidth(&runtimes).ok_or_else(|| degenerate("runtime has zero spread"))?;
    let hy = bandwidth(&ratings).ok_or_else(|| degenerate("rating has zero spread"))?;

    let mut grid = kde2d(
        points,
        (hx, hy),
        config.grid_size,
        config.runtime_bounds,
        config.rating_bounds,
    );
    if !grid.normalize() {
        return Err(degenerate("no density inside the grid bounds"));
    }

    let (i, j) = grid
        .argmax()
        .ok_or_else(|| degenerate("empty density grid"))?;
    let sweet_spot = SweetSpot {
        genre: genre.to_string(),
        runtime_center: grid.xs[i],
        rating_center: grid.ys[j],
        density: grid.get(i, j),
        sample_size: points.len(),
        bandwidth_runtime: hx,
        bandwidth_rating: hy,
    };

    let surface = grid
        .cells()
        .filter(|&(_, _, density)| density > config.surface_threshold)
        .map(|(runtime, rating, density)| SurfacePoint {
            genre: genre.to_string(),
            runtime,
            rating,
            density,
        })
        .collect();

    Ok(GenreDensity {
        sweet_spot,
        surface,
    })
}

/// Runs [`analyze_genre`] over the top `config.density_top_k` genres by mean
/// votes and merges the results. Genres that cannot be estimated are listed
/// in [`DensityReport::skipped`].
#[tracing::instrument(skip_all, fields(top_k = config.density_top_k))]
pub fn density_peaks(view: GenreRowView<'_>, config: &PipelineConfig) -> DensityReport {
    let mut report = DensityReport::default();

    for genre in density_genres(view, config.density_top_k) {
        let points = genre_points(view, &genre);
        debug!(genre = %genre, points = points.len(), "Estimating density");

        match analyze_genre(&genre, &points, config) {
            Ok(density) => {
                info!(
                    genre = %genre,
                    runtime = density.sweet_spot.runtime_center,
                    rating = density.sweet_spot.rating_center,
                    surface_cells = density.surface.len(),
                    "Sweet spot found"
                );
                report.sweet_spots.push(density.sweet_spot);
                report.surface.extend(density.surface);
            }
            Err(e) => {
                warn!(genre = %genre, error = %e, "Skipping genre");
                report.skipped.push(SkippedGenre {
                    genre,
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}
