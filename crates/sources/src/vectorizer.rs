//! Feature vectors built from categorical film attributes.
//!
//! ## Algorithm
//! Every film carries one unit of mass. The mass is split across the
//! attribute groups the film actually has (genre, director, decade)
//! according to [`GroupWeights`], then divided evenly among the members
//! of each group:
//!
//! ```text
//! The Matrix: genres [Action, Science Fiction], directors [Lana, Lilly Wachowski], 1999
//!   genre:Action             = 1/3 / 2 = 0.1667
//!   genre:Science Fiction    = 1/3 / 2 = 0.1667
//!   director:Lana Wachowski  = 1/3 / 2 = 0.1667
//!   director:Lilly Wachowski = 1/3 / 2 = 0.1667
//!   decade:1990s             = 1/3     = 0.3333
//! ```
//!
//! A group the film lacks gives its share to the groups it has, in
//! proportion to their weights. Vectors of several films are summed.

use data_loader::FilmRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute group a feature key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureGroup {
    Genre,
    Director,
    Decade,
}

impl FeatureGroup {
    pub const ALL: [FeatureGroup; 3] = [FeatureGroup::Genre, FeatureGroup::Director, FeatureGroup::Decade];

    /// Key prefix, also used to order groups in contribution ties
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureGroup::Genre => "genre",
            FeatureGroup::Director => "director",
            FeatureGroup::Decade => "decade",
        }
    }

    /// Build the feature key for a value in this group (`genre:Drama`)
    pub fn key(&self, value: &str) -> String {
        format!("{}:{}", self.as_str(), value)
    }

    /// Split a feature key back into its group and value.
    pub fn parse_key(key: &str) -> Option<(FeatureGroup, &str)> {
        let (prefix, value) = key.split_once(':')?;
        let group = match prefix {
            "genre" => FeatureGroup::Genre,
            "director" => FeatureGroup::Director,
            "decade" => FeatureGroup::Decade,
            _ => return None,
        };
        Some((group, value))
    }
}

impl fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse, additive map from feature key to non-negative weight.
///
/// Keys iterate in lexical order so every sum over a vector is
/// computed in the same order on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    weights: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to `key`. Non-positive and non-finite weights are ignored.
    pub fn add(&mut self, key: impl Into<String>, weight: f64) {
        if !weight.is_finite() || weight <= 0.0 {
            return;
        }
        *self.weights.entry(key.into()).or_insert(0.0) += weight;
    }

    /// Weight of `key`, 0.0 when absent
    pub fn get(&self, key: &str) -> f64 {
        self.weights.get(key).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(key, weight)| (key.as_str(), *weight))
    }

    /// Sum another vector into this one
    pub fn merge(&mut self, other: &FeatureVector) {
        for (key, weight) in other.iter() {
            self.add(key, weight);
        }
    }

    /// Total mass (L1 norm, weights are never negative)
    pub fn total_mass(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Mass held by one attribute group
    pub fn group_mass(&self, group: FeatureGroup) -> f64 {
        self.iter()
            .filter(|(key, _)| matches!(FeatureGroup::parse_key(key), Some((g, _)) if g == group))
            .map(|(_, weight)| weight)
            .sum()
    }

    /// Scale to unit mass. An empty vector stays empty.
    pub fn normalized(&self) -> FeatureVector {
        let total = self.total_mass();
        if total <= 0.0 {
            return FeatureVector::new();
        }
        FeatureVector {
            weights: self
                .weights
                .iter()
                .map(|(key, weight)| (key.clone(), weight / total))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Share of a film's unit mass given to each attribute group.
///
/// Only the ratios matter: the shares of the groups a film has are
/// rescaled to sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupWeights {
    pub genre: f64,
    pub director: f64,
    pub decade: f64,
}

impl GroupWeights {
    pub fn new(genre: f64, director: f64, decade: f64) -> Self {
        Self { genre, director, decade }
    }

    /// Weight for a group; negative or non-finite weights count as 0.0
    pub fn weight(&self, group: FeatureGroup) -> f64 {
        let raw = match group {
            FeatureGroup::Genre => self.genre,
            FeatureGroup::Director => self.director,
            FeatureGroup::Decade => self.decade,
        };
        if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
    }
}

impl Default for GroupWeights {
    fn default() -> Self {
        Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }
}

/// Turns films into feature vectors.
#[derive(Debug, Clone, Default)]
pub struct Vectorizer {
    weights: GroupWeights,
}

impl Vectorizer {
    /// Create a vectorizer with equal group weights
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the per-group split (default: 1/3 each)
    pub fn with_group_weights(mut self, weights: GroupWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Vector for a single film, total mass 1.0 (or empty if the film
    /// has no attributes in any weighted group).
    pub fn film_vector(&self, film: &FilmRecord) -> FeatureVector {
        let decade = film.decade_label();
        let members: [(FeatureGroup, Vec<&str>); 3] = [
            (FeatureGroup::Genre, film.genres.iter().map(String::as_str).collect()),
            (FeatureGroup::Director, film.directors.iter().map(String::as_str).collect()),
            (FeatureGroup::Decade, decade.as_deref().into_iter().collect()),
        ];

        let present_total: f64 = members
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(group, _)| self.weights.weight(*group))
            .sum();

        let mut vector = FeatureVector::new();
        if present_total <= 0.0 {
            return vector;
        }

        for (group, values) in &members {
            if values.is_empty() {
                continue;
            }
            let share = self.weights.weight(*group) / present_total;
            let per_member = share / values.len() as f64;
            for value in values {
                vector.add(group.key(value), per_member);
            }
        }
        vector
    }

    /// Summed vector over a set of films
    pub fn vectorize<'a>(&self, films: impl IntoIterator<Item = &'a FilmRecord>) -> FeatureVector {
        let mut total = FeatureVector::new();
        for film in films {
            total.merge(&self.film_vector(film));
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn matrix() -> FilmRecord {
        FilmRecord::new("the-matrix", "The Matrix")
            .with_year(1999)
            .with_genres(["Action", "Science Fiction"])
            .with_directors(["Lana Wachowski", "Lilly Wachowski"])
    }

    #[test]
    fn test_full_film_splits_mass_in_thirds() {
        let vector = Vectorizer::new().film_vector(&matrix());

        assert!((vector.total_mass() - 1.0).abs() < EPS);
        for group in FeatureGroup::ALL {
            assert!((vector.group_mass(group) - 1.0 / 3.0).abs() < EPS, "{group}");
        }
        assert!((vector.get("genre:Action") - 1.0 / 6.0).abs() < EPS);
        assert!((vector.get("decade:1990s") - 1.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_missing_group_redistributes() {
        // No directors: genre and decade get half each
        let film = FilmRecord::new("alien", "Alien")
            .with_year(1979)
            .with_genres(["Horror", "Science Fiction", "Thriller"]);
        let vector = Vectorizer::new().film_vector(&film);

        assert!((vector.total_mass() - 1.0).abs() < EPS);
        assert!((vector.group_mass(FeatureGroup::Genre) - 0.5).abs() < EPS);
        assert!((vector.group_mass(FeatureGroup::Decade) - 0.5).abs() < EPS);
        assert_eq!(vector.group_mass(FeatureGroup::Director), 0.0);
        assert!((vector.get("genre:Horror") - 0.5 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_custom_weights_redistribute_proportionally() {
        let vectorizer = Vectorizer::new().with_group_weights(GroupWeights::new(0.5, 0.3, 0.2));

        let full = vectorizer.film_vector(&matrix());
        assert!((full.group_mass(FeatureGroup::Genre) - 0.5).abs() < EPS);
        assert!((full.group_mass(FeatureGroup::Director) - 0.3).abs() < EPS);

        // Without a year, decade's 0.2 is shared 5:3 between genre and director
        let undated = FilmRecord::new("x", "X").with_genres(["Drama"]).with_directors(["Someone"]);
        let vector = vectorizer.film_vector(&undated);
        assert!((vector.group_mass(FeatureGroup::Genre) - 0.625).abs() < EPS);
        assert!((vector.group_mass(FeatureGroup::Director) - 0.375).abs() < EPS);
    }

    #[test]
    fn test_film_without_attributes_is_empty() {
        let vector = Vectorizer::new().film_vector(&FilmRecord::new("blank", "Blank"));
        assert!(vector.is_empty());
        assert_eq!(vector.total_mass(), 0.0);
    }

    #[test]
    fn test_vectorize_sums_films() {
        let other = FilmRecord::new("speed", "Speed").with_year(1994).with_genres(["Action"]);
        let vector = Vectorizer::new().vectorize([&matrix(), &other]);

        assert!((vector.total_mass() - 2.0).abs() < EPS);
        assert!((vector.get("genre:Action") - (1.0 / 6.0 + 0.5)).abs() < EPS);
        assert!((vector.get("decade:1990s") - (1.0 / 3.0 + 0.5)).abs() < EPS);
    }

    #[test]
    fn test_normalized_has_unit_mass() {
        let other = FilmRecord::new("speed", "Speed").with_year(1994).with_genres(["Action"]);
        let vector = Vectorizer::new().vectorize([&matrix(), &other]).normalized();
        assert!((vector.total_mass() - 1.0).abs() < EPS);
        assert!(FeatureVector::new().normalized().is_empty());
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(
            FeatureGroup::parse_key("director:Bong Joon-ho"),
            Some((FeatureGroup::Director, "Bong Joon-ho"))
        );
        assert_eq!(FeatureGroup::parse_key("genre:Sci:Fi"), Some((FeatureGroup::Genre, "Sci:Fi")));
        assert_eq!(FeatureGroup::parse_key("unknown"), None);
    }
}
