//! The structured form of a refinement request.

use data_loader::FilmId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Optional restrictions on a recommendation request.
///
/// An absent field is unconstrained; present fields are ANDed by the
/// filter stage. `k` overrides the request's result count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraint {
    pub k: Option<usize>,
    pub genres: BTreeSet<String>,
    pub year_min: Option<u16>,
    pub year_max: Option<u16>,
    pub countries: BTreeSet<String>,
    pub similar_to: Option<FilmId>,
}

impl Constraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres.extend(genres.into_iter().map(Into::into));
        self
    }

    /// Set either year bound; `None` leaves that side open
    pub fn with_year_range(mut self, year_min: Option<u16>, year_max: Option<u16>) -> Self {
        self.year_min = year_min;
        self.year_max = year_max;
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries.extend(countries.into_iter().map(Into::into));
        self
    }

    pub fn with_similar_to(mut self, film_id: impl Into<FilmId>) -> Self {
        self.similar_to = Some(film_id.into());
        self
    }

    /// True when no field is set at all
    pub fn is_unconstrained(&self) -> bool {
        self.k.is_none() && !self.has_filters()
    }

    /// True when any field that narrows the candidate pool is set
    pub fn has_filters(&self) -> bool {
        !self.genres.is_empty()
            || self.year_min.is_some()
            || self.year_max.is_some()
            || !self.countries.is_empty()
            || self.similar_to.is_some()
    }

    /// Fold a later extraction into this one.
    ///
    /// Sets are unioned. Scalars keep the value already present, so a
    /// later match can add information but never erase an earlier one.
    pub fn merge(&mut self, other: Constraint) {
        self.k = self.k.or(other.k);
        self.genres.extend(other.genres);
        self.year_min = self.year_min.or(other.year_min);
        self.year_max = self.year_max.or(other.year_max);
        self.countries.extend(other.countries);
        self.similar_to = self.similar_to.take().or(other.similar_to);
    }
}
