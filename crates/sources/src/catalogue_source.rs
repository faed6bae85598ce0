//! Catalogue Source - the candidate pool
//!
//! Every catalogue film is a candidate unless the user has already seen
//! it, listed it, or been shown it earlier in the same session:
//!
//! ```text
//! pool = catalogue − (watched ∪ watchlist ∪ session.excluded)
//! ```
//!
//! Candidates come back in catalogue (id) order.

use crate::types::{Candidate, UserProfile};
use data_loader::{Catalogue, FilmId};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Generates the candidate pool from the whole catalogue
#[derive(Clone)]
pub struct CatalogueSource {
    /// Shared, read-only catalogue
    catalogue: Arc<dyn Catalogue>,
}

impl CatalogueSource {
    pub fn new(catalogue: Arc<dyn Catalogue>) -> Self {
        Self { catalogue }
    }

    /// Candidate pool for a profile, minus the session's already-returned ids
    #[instrument(skip(self, profile, excluded), fields(username = %profile.username))]
    pub fn get_candidates(
        &self,
        profile: &UserProfile,
        excluded: &HashSet<FilmId>,
    ) -> Vec<Candidate> {
        let films = self.catalogue.list_all();
        let catalogue_size = films.len();

        let candidates: Vec<Candidate> = films
            .into_par_iter()
            .filter(|film| !profile.has_seen_or_listed(&film.id) && !excluded.contains(&film.id))
            .map(Candidate::new)
            .collect();

        debug!(
            "Candidate pool: {} of {} films (session excluded {})",
            candidates.len(),
            catalogue_size,
            excluded.len()
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{CatalogueIndex, FilmRecord};

    fn create_test_catalogue() -> Arc<dyn Catalogue> {
        Arc::new(CatalogueIndex::from_films([
            FilmRecord::new("alien", "Alien"),
            FilmRecord::new("heat", "Heat"),
            FilmRecord::new("parasite", "Parasite"),
            FilmRecord::new("seven", "Se7en"),
            FilmRecord::new("whiplash", "Whiplash"),
        ]))
    }

    #[test]
    fn test_pool_excludes_lists_and_session() {
        let source = CatalogueSource::new(create_test_catalogue());

        let mut profile = UserProfile::new("alice");
        profile.watched.insert("alien".to_string());
        profile.watchlist.insert("heat".to_string());

        let excluded: HashSet<FilmId> = ["seven".to_string()].into_iter().collect();

        let candidates = source.get_candidates(&profile, &excluded);
        let ids: Vec<_> = candidates.iter().map(|c| c.film_id()).collect();
        assert_eq!(ids, vec!["parasite", "whiplash"]);
    }

    #[test]
    fn test_pool_without_history_is_whole_catalogue() {
        let source = CatalogueSource::new(create_test_catalogue());
        let candidates = source.get_candidates(&UserProfile::new("bob"), &HashSet::new());
        assert_eq!(candidates.len(), 5);
    }
}
