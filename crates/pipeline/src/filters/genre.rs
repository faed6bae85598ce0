//! Filter to keep only films in at least one requested genre.

use super::{label_key, label_keys};
use crate::traits::Filter;
use anyhow::Result;
use refinement::lexicon::GENRES;
use sources::{Candidate, UserProfile};
use std::collections::HashSet;

/// Keeps candidates sharing at least one genre with the request.
///
/// Matching is case-insensitive and alias-aware: "sci-fi" matches a
/// film tagged "Science Fiction".
pub struct GenreFilter {
    genres: HashSet<String>,
}

impl GenreFilter {
    pub fn new<I, S>(genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            genres: label_keys(&GENRES, genres),
        }
    }
}

impl Filter for GenreFilter {
    fn name(&self) -> &str {
        "GenreFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _profile: &UserProfile) -> Result<Vec<Candidate>> {
        if self.genres.is_empty() {
            return Ok(candidates);
        }

        Ok(candidates
            .into_iter()
            .filter(|candidate| {
                candidate
                    .film
                    .genres
                    .iter()
                    .any(|genre| self.genres.contains(&label_key(&GENRES, genre)))
            })
            .collect())
    }
}
