//! Filter to keep films close to an anchor film.

use crate::scorer::similarity;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::{FilmId, FilmRecord};
use sources::{Candidate, FeatureVector, UserProfile, Vectorizer};

/// Similarity a candidate must exceed to count as "like" the anchor
pub const DEFAULT_SIMILAR_TO_THRESHOLD: f64 = 0.05;

/// Keeps candidates whose similarity to the anchor film is strictly
/// above the threshold. The anchor itself never passes.
///
/// Similarity uses the scorer's formula with the anchor's vector in
/// place of the user profile.
pub struct SimilarToFilter {
    anchor_id: FilmId,
    anchor_vector: FeatureVector,
    vectorizer: Vectorizer,
    threshold: f64,
}

impl SimilarToFilter {
    pub fn new(anchor: &FilmRecord, vectorizer: Vectorizer) -> Self {
        Self {
            anchor_id: anchor.id.clone(),
            anchor_vector: vectorizer.film_vector(anchor),
            vectorizer,
            threshold: DEFAULT_SIMILAR_TO_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Similarity of a film to the anchor
    pub fn similarity_to_anchor(&self, film: &FilmRecord) -> f64 {
        similarity(&self.vectorizer.film_vector(film), &self.anchor_vector)
    }
}

impl Filter for SimilarToFilter {
    fn name(&self) -> &str {
        "SimilarToFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _profile: &UserProfile) -> Result<Vec<Candidate>> {
        Ok(candidates
            .into_iter()
            .filter(|candidate| {
                candidate.film_id() != self.anchor_id
                    && self.similarity_to_anchor(&candidate.film) > self.threshold
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn matrix() -> FilmRecord {
        FilmRecord::new("the-matrix", "The Matrix")
            .with_year(1999)
            .with_genres(["Action", "Science Fiction"])
            .with_directors(["Lana Wachowski", "Lilly Wachowski"])
    }

    fn candidates() -> Vec<Candidate> {
        [
            matrix(),
            // Shares both genres and both directors
            FilmRecord::new("the-matrix-reloaded", "The Matrix Reloaded")
                .with_year(2003)
                .with_genres(["Action", "Science Fiction"])
                .with_directors(["Lana Wachowski", "Lilly Wachowski"]),
            // Shares only the decade: 1/3 × 1/3
            FilmRecord::new("magnolia", "Magnolia").with_year(1999).with_genres(["Drama"]).with_directors(["P.T. Anderson"]),
            // Shares one genre of two: 1/6 × 1/6
            FilmRecord::new("speed-racer", "Speed Racer")
                .with_year(2008)
                .with_genres(["Action", "Family"])
                .with_directors(["Someone Else"]),
            FilmRecord::new("undated", "Undated"),
        ]
        .into_iter()
        .map(|film| Candidate::new(Arc::new(film)))
        .collect()
    }

    #[test]
    fn test_similar_to_filter() {
        let filter = SimilarToFilter::new(&matrix(), Vectorizer::new());
        let filtered = filter.apply(candidates(), &UserProfile::new("alice")).unwrap();

        let ids: Vec<_> = filtered.iter().map(|c| c.film_id()).collect();
        assert_eq!(ids, vec!["the-matrix-reloaded", "magnolia"]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let magnolia = FilmRecord::new("magnolia", "Magnolia").with_year(1999).with_genres(["Drama"]);
        let filter = SimilarToFilter::new(&matrix(), Vectorizer::new());

        // Undirected film: decade gets half the mass, 1/2 × 1/3
        let exact = filter.similarity_to_anchor(&magnolia);
        assert!((exact - 1.0 / 6.0).abs() < 1e-9);

        let at_threshold = SimilarToFilter::new(&matrix(), Vectorizer::new()).with_threshold(exact);
        let filtered = at_threshold
            .apply(vec![Candidate::new(Arc::new(magnolia))], &UserProfile::new("alice"))
            .unwrap();
        assert!(filtered.is_empty());
    }
}
