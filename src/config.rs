use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Tunable parameters of the analysis pipeline.
///
/// Stored as a JSON object on disk; any field left out keeps its default:
/// ```json
/// {
///   "density_top_k": 3,
///   "vote_share_genres": ["Comedy", "Drama"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Length of every ranked table.
    pub top_n: usize,
    /// Number of genres (ranked by mean votes) given a density estimate.
    pub density_top_k: usize,
    /// Points per axis of the density evaluation grid.
    pub grid_size: usize,
    pub runtime_bounds: (f64, f64),
    pub rating_bounds: (f64, f64),
    /// Genres with fewer valid (runtime, rating) rows are skipped.
    pub min_density_sample: usize,
    /// Surface cells at or below this normalized density are dropped from output.
    pub surface_threshold: f64,
    /// Genres kept by name in the vote share table; all others become "Other".
    pub vote_share_genres: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            density_top_k: 5,
            grid_size: 200,
            runtime_bounds: (0.0, 250.0),
            rating_bounds: (0.0, 10.0),
            min_density_sample: 10,
            surface_threshold: 0.02,
            vote_share_genres: ["Animation", "Comedy", "Family", "Drama", "Sci-Fi", "Western"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path` and validates it.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_size < 2 {
            bail!("grid_size must be at least 2, got {}", self.grid_size);
        }
        for (name, (lo, hi)) in [
            ("runtime_bounds", self.runtime_bounds),
            ("rating_bounds", self.rating_bounds),
        ] {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                bail!("{name} must be finite with lower < upper, got ({lo}, {hi})");
            }
        }
        if !(0.0..1.0).contains(&self.surface_threshold) {
            bail!(
                "surface_threshold must be in [0, 1), got {}",
                self.surface_threshold
            );
        }
        Ok(())
    }
}
