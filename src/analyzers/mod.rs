//! Analyses over the joined episode table.
//!
//! Grouped aggregation, per-decade vote share, per-genre runtime/rating
//! density peaks and rating deltas against the parent series, plus the
//! orchestration that bundles them into a [`types::Report`].

pub mod aggregate;
pub mod analyzer;
pub mod category;
pub mod density;
pub mod kde;
pub mod rating_delta;
pub mod top;
pub mod types;
pub mod utility;
pub mod vote_share;
