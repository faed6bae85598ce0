//! Core domain types for the film catalogue and viewing history.
//!
//! Films are keyed by a stable string identifier (a slug such as
//! `the-matrix`). Everything here is immutable once loaded; the
//! in-memory indices below are the default implementations of the
//! [`Catalogue`](crate::Catalogue) and [`HistoryProvider`](crate::HistoryProvider)
//! traits.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

// =============================================================================
// Type Aliases
// =============================================================================

/// Stable identifier for a film (e.g. `"the-matrix"`)
pub type FilmId = String;

/// Name of an ingested user
pub type Username = String;

// =============================================================================
// Film Record
// =============================================================================

/// A film and its categorical attributes.
///
/// Lists are ordered and de-duplicated on load. `null` or missing lists
/// in the source JSON become empty lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilmRecord {
    #[serde(alias = "slug")]
    pub id: FilmId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Release year, when known
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub directors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub countries: Vec<String>,
}

impl FilmRecord {
    /// Create a record with no attributes beyond its id and title.
    pub fn new(id: impl Into<FilmId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: None,
            genres: Vec::new(),
            directors: Vec::new(),
            countries: Vec::new(),
        }
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = dedup_ordered(genres.into_iter().map(Into::into));
        self
    }

    pub fn with_directors<I, S>(mut self, directors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directors = dedup_ordered(directors.into_iter().map(Into::into));
        self
    }

    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = dedup_ordered(countries.into_iter().map(Into::into));
        self
    }

    /// First year of the film's decade (1994 -> 1990)
    pub fn decade(&self) -> Option<u16> {
        self.year.map(|year| year / 10 * 10)
    }

    /// Decade label used in feature keys and summaries (e.g. `"1990s"`)
    pub fn decade_label(&self) -> Option<String> {
        self.decade().map(|decade| format!("{}s", decade))
    }

    /// Trim attribute values and drop blanks and repeats, keeping first-seen order.
    pub(crate) fn normalise(mut self) -> Self {
        self.id = self.id.trim().to_string();
        self.title = self.title.trim().to_string();
        for list in [&mut self.genres, &mut self.directors, &mut self.countries] {
            let cleaned = dedup_ordered(
                list.drain(..)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty()),
            );
            *list = cleaned;
        }
        self
    }
}

/// Remove duplicates while preserving the first occurrence order.
pub(crate) fn dedup_ordered(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    values.filter(|value| seen.insert(value.clone())).collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Viewing History
// =============================================================================

/// The two history lists ingested for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLists {
    pub watched: BTreeSet<FilmId>,
    pub watchlist: BTreeSet<FilmId>,
}

impl UserLists {
    pub fn new<W, L, S>(watched: W, watchlist: L) -> Self
    where
        W: IntoIterator<Item = S>,
        L: IntoIterator<Item = S>,
        S: Into<FilmId>,
    {
        Self {
            watched: watched.into_iter().map(Into::into).collect(),
            watchlist: watchlist.into_iter().map(Into::into).collect(),
        }
    }

    /// Union of watched and watchlist ids
    pub fn all(&self) -> BTreeSet<FilmId> {
        self.watched.union(&self.watchlist).cloned().collect()
    }

    /// True if the film is on either list
    pub fn contains(&self, film_id: &str) -> bool {
        self.watched.contains(film_id) || self.watchlist.contains(film_id)
    }
}

// =============================================================================
// In-memory indices
// =============================================================================

/// In-memory catalogue keyed by film id.
///
/// Records are shared behind `Arc` so candidate pools can hold them
/// without copying attribute lists.
#[derive(Debug, Default)]
pub struct CatalogueIndex {
    pub(crate) films: HashMap<FilmId, Arc<FilmRecord>>,
}

impl CatalogueIndex {
    /// Creates a new, empty CatalogueIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from records, later duplicates replacing earlier ones.
    pub fn from_films(films: impl IntoIterator<Item = FilmRecord>) -> Self {
        let mut index = Self::new();
        for film in films {
            index.insert_film(film);
        }
        index
    }

    /// Get a film by id
    pub fn get_film(&self, id: &str) -> Option<&Arc<FilmRecord>> {
        self.films.get(id)
    }

    /// Insert a film, returning the record it replaced (if any)
    pub fn insert_film(&mut self, film: FilmRecord) -> Option<Arc<FilmRecord>> {
        let film = film.normalise();
        self.films.insert(film.id.clone(), Arc::new(film))
    }

    /// Case-insensitive title search: exact matches first, then substring
    /// matches, each group in id order.
    pub fn search_title(&self, query: &str) -> Vec<Arc<FilmRecord>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<(u8, Arc<FilmRecord>)> = self
            .films
            .values()
            .filter_map(|film| {
                let title = film.title.to_lowercase();
                if title == needle {
                    Some((0, film.clone()))
                } else if title.contains(&needle) {
                    Some((1, film.clone()))
                } else {
                    None
                }
            })
            .collect();

        matches.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        matches.into_iter().map(|(_, film)| film).collect()
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }
}

/// In-memory history store keyed by username.
#[derive(Debug, Default)]
pub struct HistoryIndex {
    pub(crate) users: HashMap<Username, UserLists>,
}

impl HistoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the lists for a user
    pub fn insert_user(&mut self, username: impl Into<Username>, lists: UserLists) {
        self.users.insert(username.into(), lists);
    }

    /// Get the lists for a user, `None` if the user was never ingested
    pub fn get_user(&self, username: &str) -> Option<&UserLists> {
        self.users.get(username)
    }

    /// All ingested usernames, sorted
    pub fn usernames(&self) -> Vec<Username> {
        let mut names: Vec<Username> = self.users.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
