//! The FilterPipeline chains filters together.
//!
//! Filters run in the order they were added; a candidate must pass all
//! of them, so the pipeline is the AND of its filters.

use crate::traits::Filter;
use anyhow::{Context, Result};
use sources::{Candidate, UserProfile};
use tracing::debug;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(GenreFilter::new(["Comedy"]))
///     .add_filter(YearRangeFilter::new(Some(1990), None));
///
/// let filtered = pipeline.apply(candidates, &profile)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn filter_names(&self) -> Vec<&str> {
        self.filters.iter().map(|filter| filter.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence, logging the pool size around each.
    pub fn apply(&self, candidates: Vec<Candidate>, profile: &UserProfile) -> Result<Vec<Candidate>> {
        let mut current = candidates;
        for filter in &self.filters {
            debug!("Applying filter: {} (input count: {})", filter.name(), current.len());
            current = filter
                .apply(current, profile)
                .with_context(|| format!("filter {} failed", filter.name()))?;
            debug!("Filter applied: {} (output count: {})", filter.name(), current.len());
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
