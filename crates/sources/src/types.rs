//! Shared types for candidate generation and profiles.

use crate::vectorizer::FeatureVector;
use data_loader::{FilmId, FilmRecord, UserLists, Username};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Which history list a profile or summary is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    #[default]
    Watched,
    Watchlist,
    /// Union of watched and watchlist
    All,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Watched => "watched",
            ListKind::Watchlist => "watchlist",
            ListKind::All => "all",
        }
    }

    /// The film ids this list kind selects from a user's lists
    pub fn select(&self, lists: &UserLists) -> BTreeSet<FilmId> {
        match self {
            ListKind::Watched => lists.watched.clone(),
            ListKind::Watchlist => lists.watchlist.clone(),
            ListKind::All => lists.all(),
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a list kind string is not `watched`, `watchlist` or `all`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown list kind: {0:?} (expected watched, watchlist or all)")]
pub struct ParseListKindError(pub String);

impl FromStr for ListKind {
    type Err = ParseListKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "watched" => Ok(ListKind::Watched),
            "watchlist" => Ok(ListKind::Watchlist),
            "all" => Ok(ListKind::All),
            _ => Err(ParseListKindError(s.to_string())),
        }
    }
}

/// A user's normalised taste profile.
///
/// Built once per request from the user's lists; recommendation calls
/// only read it.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub username: Username,
    pub list_kind: ListKind,
    /// L1-normalised feature vector (unit mass, or empty)
    pub vector: FeatureVector,
    pub watched: BTreeSet<FilmId>,
    pub watchlist: BTreeSet<FilmId>,
    /// Number of selected films found in the catalogue
    pub film_count: usize,
}

impl UserProfile {
    /// Create an empty profile for a user
    pub fn new(username: impl Into<Username>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    /// True if the film is on the user's watched list or watchlist
    pub fn has_seen_or_listed(&self, film_id: &str) -> bool {
        self.watched.contains(film_id) || self.watchlist.contains(film_id)
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }
}

/// A film eligible for recommendation.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub film: Arc<FilmRecord>,
}

impl Candidate {
    pub fn new(film: Arc<FilmRecord>) -> Self {
        Self { film }
    }

    pub fn film_id(&self) -> &str {
        &self.film.id
    }
}
