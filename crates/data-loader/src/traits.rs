//! Read-only repository traits consumed by the recommendation core.
//!
//! The core never owns storage: it is handed a catalogue and a history
//! provider as `Arc<dyn ...>` and only reads through them. The in-memory
//! indices in [`crate::types`] implement both traits.

use crate::types::{CatalogueIndex, FilmRecord, HistoryIndex, UserLists};
use std::sync::Arc;

/// Lookup of film attributes by id.
///
/// `Send + Sync` so one catalogue can be shared across concurrent requests.
pub trait Catalogue: Send + Sync {
    /// Get a film by id, `None` if the catalogue doesn't know it
    fn get(&self, film_id: &str) -> Option<Arc<FilmRecord>>;

    /// Every film in the catalogue, ordered by id
    fn list_all(&self) -> Vec<Arc<FilmRecord>>;
}

/// Source of the watched / watchlist lists for a user.
///
/// The lists are produced by feed ingestion elsewhere; `None` means the
/// user has not been ingested.
pub trait HistoryProvider: Send + Sync {
    fn get_lists(&self, username: &str) -> Option<UserLists>;
}

impl Catalogue for CatalogueIndex {
    fn get(&self, film_id: &str) -> Option<Arc<FilmRecord>> {
        self.get_film(film_id).cloned()
    }

    fn list_all(&self) -> Vec<Arc<FilmRecord>> {
        let mut films: Vec<Arc<FilmRecord>> = self.films.values().cloned().collect();
        films.sort_by(|a, b| a.id.cmp(&b.id));
        films
    }
}

impl HistoryProvider for HistoryIndex {
    fn get_lists(&self, username: &str) -> Option<UserLists> {
        self.get_user(username).cloned()
    }
}
