//! Turns a [`Constraint`] into a [`FilterPipeline`].
//!
//! Each present field adds one filter; absent fields add nothing, so an
//! unconstrained request passes the pool through untouched.

use crate::filter_pipeline::FilterPipeline;
use crate::filters::{CountryFilter, GenreFilter, SimilarToFilter, YearRangeFilter};
use crate::filters::similar_to::DEFAULT_SIMILAR_TO_THRESHOLD;
use anyhow::Result;
use data_loader::Catalogue;
use refinement::Constraint;
use sources::{Candidate, UserProfile, Vectorizer};
use std::sync::Arc;
use tracing::{instrument, warn};

/// Builds constraint pipelines against a shared catalogue.
#[derive(Clone)]
pub struct ConstraintFilter {
    catalogue: Arc<dyn Catalogue>,
    vectorizer: Vectorizer,
    similar_to_threshold: f64,
}

impl ConstraintFilter {
    pub fn new(catalogue: Arc<dyn Catalogue>) -> Self {
        Self {
            catalogue,
            vectorizer: Vectorizer::new(),
            similar_to_threshold: DEFAULT_SIMILAR_TO_THRESHOLD,
        }
    }

    /// Vectorizer used for anchor similarity (default: equal group weights)
    pub fn with_vectorizer(mut self, vectorizer: Vectorizer) -> Self {
        self.vectorizer = vectorizer;
        self
    }

    pub fn with_similar_to_threshold(mut self, threshold: f64) -> Self {
        self.similar_to_threshold = threshold;
        self
    }

    /// The filters for a constraint, in field order
    pub fn pipeline(&self, constraint: &Constraint) -> FilterPipeline {
        let mut pipeline = FilterPipeline::new();

        if !constraint.genres.is_empty() {
            pipeline = pipeline.add_filter(GenreFilter::new(&constraint.genres));
        }
        if constraint.year_min.is_some() || constraint.year_max.is_some() {
            pipeline = pipeline.add_filter(YearRangeFilter::new(constraint.year_min, constraint.year_max));
        }
        if !constraint.countries.is_empty() {
            pipeline = pipeline.add_filter(CountryFilter::new(&constraint.countries));
        }
        if let Some(anchor_id) = &constraint.similar_to {
            match self.catalogue.get(anchor_id) {
                Some(anchor) => {
                    pipeline = pipeline.add_filter(
                        SimilarToFilter::new(&anchor, self.vectorizer.clone())
                            .with_threshold(self.similar_to_threshold),
                    );
                }
                None => warn!("Anchor film {} is not in the catalogue, ignoring similar_to", anchor_id),
            }
        }

        pipeline
    }

    /// Narrow a candidate pool to the films satisfying every field
    #[instrument(skip(self, candidates, constraint, profile), fields(pool = candidates.len()))]
    pub fn apply(
        &self,
        candidates: Vec<Candidate>,
        constraint: &Constraint,
        profile: &UserProfile,
    ) -> Result<Vec<Candidate>> {
        self.pipeline(constraint).apply(candidates, profile)
    }
}
