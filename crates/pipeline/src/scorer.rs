//! Similarity scoring with a per-group contribution breakdown.
//!
//! ## Formula
//! ```text
//! score(candidate) = Σ over shared keys k of candidate(k) × profile(k)
//! ```
//! `candidate` is the film's own group-split vector (unit mass, not
//! normalised again) and `profile` is the L1-normalised profile.
//! Summing the per-key terms by attribute group gives the breakdown
//! that explains a score.

use data_loader::{FilmId, FilmRecord};
use rayon::prelude::*;
use serde::Serialize;
use sources::{Candidate, FeatureGroup, FeatureVector, UserProfile, Vectorizer};
use std::cmp::Ordering;
use tracing::debug;

/// Upper bound for any "top N" request
pub const MAX_TOP_N: usize = 50;

/// Overlap values listed per group in an explanation
const EXPLANATION_VALUES: usize = 3;

/// Clamp a requested breakdown length to `1..=MAX_TOP_N`
pub fn clamp_top_n(top_n: usize) -> usize {
    top_n.clamp(1, MAX_TOP_N)
}

/// How much one attribute group added to a score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub group: FeatureGroup,
    pub contribution: f64,
    /// Shared values in this group, sorted
    pub overlaps: Vec<String>,
}

/// A film with its score and contribution breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    pub film_id: FilmId,
    pub title: String,
    pub year: Option<u16>,
    pub score: f64,
    /// Descending by contribution, ties by group key ascending
    pub contributions: Vec<Contribution>,
}

impl ScoredCandidate {
    /// Keep only the first `top_n` contributions (clamped to `1..=50`)
    pub fn truncate_contributions(&mut self, top_n: usize) {
        self.contributions.truncate(clamp_top_n(top_n));
    }

    /// One-line, human-readable reason for the score
    pub fn explanation(&self) -> String {
        let parts: Vec<String> = self
            .contributions
            .iter()
            .filter(|c| !c.overlaps.is_empty())
            .map(|c| {
                let label = match c.group {
                    FeatureGroup::Genre => "genres",
                    FeatureGroup::Director => "directors",
                    FeatureGroup::Decade => "decade",
                };
                let values: Vec<&str> = c
                    .overlaps
                    .iter()
                    .take(EXPLANATION_VALUES)
                    .map(String::as_str)
                    .collect();
                format!("{}: {}", label, values.join(", "))
            })
            .collect();

        if parts.is_empty() {
            format!("Score {:.3}. Nothing in common with your films", self.score)
        } else {
            format!(
                "Score {:.3}. Similar to films you've watched ({})",
                self.score,
                parts.join("; ")
            )
        }
    }
}

/// Order for ranked results: score descending, then film id ascending
pub fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.film_id.cmp(&b.film_id))
}

/// Order for a breakdown: contribution descending, then group key ascending
fn contribution_order(a: &Contribution, b: &Contribution) -> Ordering {
    b.contribution
        .partial_cmp(&a.contribution)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.group.as_str().cmp(b.group.as_str()))
}

/// Dot product over shared keys, summed in key order
pub fn similarity(candidate: &FeatureVector, reference: &FeatureVector) -> f64 {
    candidate
        .iter()
        .map(|(key, weight)| weight * reference.get(key))
        .sum()
}

/// Per-group breakdown of [`similarity`]. Every group is present, with a
/// zero contribution when nothing is shared.
pub fn contributions(candidate: &FeatureVector, reference: &FeatureVector) -> Vec<Contribution> {
    let mut breakdown: Vec<Contribution> = FeatureGroup::ALL
        .iter()
        .map(|group| Contribution {
            group: *group,
            contribution: 0.0,
            overlaps: Vec::new(),
        })
        .collect();

    for (key, weight) in candidate.iter() {
        let shared = reference.get(key);
        if shared <= 0.0 {
            continue;
        }
        let Some((group, value)) = FeatureGroup::parse_key(key) else {
            continue;
        };
        if let Some(entry) = breakdown.iter_mut().find(|c| c.group == group) {
            entry.contribution += weight * shared;
            entry.overlaps.push(value.to_string());
        }
    }

    for entry in &mut breakdown {
        entry.overlaps.sort();
    }
    breakdown.sort_by(contribution_order);
    breakdown
}

/// Scores films against a profile.
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    vectorizer: Vectorizer,
}

impl SimilarityScorer {
    pub fn new(vectorizer: Vectorizer) -> Self {
        Self { vectorizer }
    }

    /// Score one film, keeping the `top_n` largest contributions
    pub fn score_film(&self, film: &FilmRecord, profile: &UserProfile, top_n: usize) -> ScoredCandidate {
        let vector = self.vectorizer.film_vector(film);
        let mut scored = ScoredCandidate {
            film_id: film.id.clone(),
            title: film.title.clone(),
            year: film.year,
            score: similarity(&vector, &profile.vector),
            contributions: contributions(&vector, &profile.vector),
        };
        scored.truncate_contributions(top_n);
        scored
    }

    /// Score a whole pool in parallel. Output order follows input order.
    pub fn score_all(
        &self,
        candidates: &[Candidate],
        profile: &UserProfile,
        top_n: usize,
    ) -> Vec<ScoredCandidate> {
        let scored: Vec<ScoredCandidate> = candidates
            .par_iter()
            .map(|candidate| self.score_film(&candidate.film, profile, top_n))
            .collect();
        debug!("Scored {} candidates for {}", scored.len(), profile.username);
        scored
    }

    /// Sort by score descending (ties by film id) and keep the top `k`
    pub fn rank(mut scored: Vec<ScoredCandidate>, k: usize) -> Vec<ScoredCandidate> {
        scored.sort_by(rank_order);
        scored.truncate(k);
        scored
    }
}
