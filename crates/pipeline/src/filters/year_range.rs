//! Filter for release-year bounds.

use crate::traits::Filter;
use anyhow::Result;
use sources::{Candidate, UserProfile};

/// Keeps films released within `[year_min, year_max]`.
///
/// ## Algorithm
/// 1. An unset bound is open
/// 2. With at least one bound set, films without a year are dropped
/// 3. With no bounds set, every film passes
pub struct YearRangeFilter {
    year_min: Option<u16>,
    year_max: Option<u16>,
}

impl YearRangeFilter {
    pub fn new(year_min: Option<u16>, year_max: Option<u16>) -> Self {
        Self { year_min, year_max }
    }

    fn accepts(&self, year: Option<u16>) -> bool {
        if self.year_min.is_none() && self.year_max.is_none() {
            return true;
        }
        match year {
            Some(year) => {
                self.year_min.is_none_or(|min| year >= min) && self.year_max.is_none_or(|max| year <= max)
            }
            None => false,
        }
    }
}

impl Filter for YearRangeFilter {
    fn name(&self) -> &str {
        "YearRangeFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _profile: &UserProfile) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| self.accepts(candidate.film.year))
            .collect())
    }
}
