//! Filtering and scoring of film candidates.
//!
//! This crate provides:
//! - Filter trait and one filter per constraint field
//! - FilterPipeline for composing filters
//! - ConstraintFilter, which builds a pipeline from a refinement Constraint
//! - SimilarityScorer for scores and their per-group breakdown
//!
//! ## Architecture
//! The pipeline processes a candidate pool in stages:
//! 1. Filters remove candidates that violate the constraint (genre, years, country, anchor)
//! 2. The scorer computes a similarity score for each survivor, in parallel
//! 3. Scored candidates are ranked, score descending with ties by film id
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{ConstraintFilter, SimilarityScorer};
//!
//! let filtered = ConstraintFilter::new(catalogue.clone()).apply(candidates, &constraint, &profile)?;
//!
//! let scorer = SimilarityScorer::new(vectorizer);
//! let ranked = SimilarityScorer::rank(scorer.score_all(&filtered, &profile, 3), 10);
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;
pub mod constraint_filter;
pub mod scorer;

// Re-export main types
pub use constraint_filter::ConstraintFilter;
pub use filter_pipeline::FilterPipeline;
pub use filters::similar_to::DEFAULT_SIMILAR_TO_THRESHOLD;
pub use scorer::{clamp_top_n, Contribution, ScoredCandidate, SimilarityScorer, MAX_TOP_N};
pub use traits::Filter;
