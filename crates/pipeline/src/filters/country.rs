//! Filter to keep only films from at least one requested country.

use super::{label_key, label_keys};
use crate::traits::Filter;
use anyhow::Result;
use refinement::lexicon::COUNTRIES;
use sources::{Candidate, UserProfile};
use std::collections::HashSet;

/// Keeps candidates produced in at least one requested country.
///
/// "USA", "United States" and "american" all compare equal.
pub struct CountryFilter {
    countries: HashSet<String>,
}

impl CountryFilter {
    pub fn new<I, S>(countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            countries: label_keys(&COUNTRIES, countries),
        }
    }
}

impl Filter for CountryFilter {
    fn name(&self) -> &str {
        "CountryFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _profile: &UserProfile) -> Result<Vec<Candidate>> {
        if self.countries.is_empty() {
            return Ok(candidates);
        }

        Ok(candidates
            .into_iter()
            .filter(|candidate| {
                candidate
                    .film
                    .countries
                    .iter()
                    .any(|country| self.countries.contains(&label_key(&COUNTRIES, country)))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::FilmRecord;
    use std::sync::Arc;

    #[test]
    fn test_country_filter() {
        let candidates: Vec<Candidate> = [
            FilmRecord::new("oldboy", "Oldboy").with_countries(["South Korea"]),
            FilmRecord::new("fargo", "Fargo").with_countries(["USA", "United Kingdom"]),
            FilmRecord::new("amelie", "Amélie").with_countries(["France", "Germany"]),
            FilmRecord::new("unknown", "Unknown"),
        ]
        .into_iter()
        .map(|film| Candidate::new(Arc::new(film)))
        .collect();

        let filtered = CountryFilter::new(["united states", "korean"])
            .apply(candidates, &UserProfile::new("alice"))
            .unwrap();

        let ids: Vec<_> = filtered.iter().map(|c| c.film_id()).collect();
        assert_eq!(ids, vec!["oldboy", "fargo"]);
    }
}
