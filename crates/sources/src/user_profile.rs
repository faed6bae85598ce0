//! Helper functions to build a UserProfile from a user's lists
//!
//! The profile is the single aggregate the scorer compares candidates
//! against: the summed feature vectors of the selected films, scaled to
//! unit mass so users with long and short histories score on the same
//! scale.

use crate::types::{ListKind, UserProfile};
use crate::vectorizer::Vectorizer;
use data_loader::{Catalogue, UserLists};
use tracing::{debug, instrument};

/// Build a UserProfile for `username` from their lists.
///
/// ## Steps
/// 1. Select film ids by `list_kind` (watched, watchlist or their union)
/// 2. Look each id up in the catalogue; ids the catalogue doesn't know are skipped
/// 3. Vectorize the films and L1-normalise the sum
///
/// The raw watched / watchlist sets are always copied in full, whatever
/// `list_kind` is, since both are excluded from recommendations.
#[instrument(skip(catalogue, vectorizer, lists))]
pub fn build_user_profile(
    catalogue: &dyn Catalogue,
    vectorizer: &Vectorizer,
    username: &str,
    lists: &UserLists,
    list_kind: ListKind,
) -> UserProfile {
    let selected = list_kind.select(lists);

    let films: Vec<_> = selected
        .iter()
        .filter_map(|film_id| {
            let film = catalogue.get(film_id);
            if film.is_none() {
                debug!("Film {} is not in the catalogue, skipping", film_id);
            }
            film
        })
        .collect();

    let vector = vectorizer.vectorize(films.iter().map(|film| film.as_ref())).normalized();

    debug!(
        "Built profile for {}: {} of {} films found, {} features",
        username,
        films.len(),
        selected.len(),
        vector.len()
    );

    UserProfile {
        username: username.to_string(),
        list_kind,
        vector,
        watched: lists.watched.clone(),
        watchlist: lists.watchlist.clone(),
        film_count: films.len(),
    }
}
