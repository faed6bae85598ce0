//! # Sources Crate
//!
//! Turns films and user lists into feature vectors, and generates the
//! candidate pool a recommendation is drawn from.
//!
//! ## Components
//!
//! ### Vectorizer
//! Sparse categorical vectors over `genre:*`, `director:*` and `decade:*`
//! keys. Each film has unit mass split across the groups it has.
//!
//! ### Profile Builder
//! Sums the vectors of a user's selected films and scales the sum to
//! unit mass.
//!
//! ### Catalogue Source
//! Every catalogue film the user hasn't watched, listed, or already been
//! shown in the current session.
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::{build_user_profile, CatalogueSource, ListKind, Vectorizer};
//! use data_loader::{load_dataset, HistoryProvider};
//! use std::collections::HashSet;
//! use std::sync::Arc;
//!
//! let (catalogue, history) = load_dataset(catalogue_path, history_dir)?;
//! let catalogue = Arc::new(catalogue);
//!
//! let lists = history.get_lists("alice").unwrap();
//! let profile = build_user_profile(catalogue.as_ref(), &Vectorizer::new(), "alice", &lists, ListKind::Watched);
//!
//! let source = CatalogueSource::new(catalogue.clone());
//! let candidates = source.get_candidates(&profile, &HashSet::new());
//! ```

// Public modules
pub mod types;
pub mod vectorizer;
pub mod user_profile;
pub mod catalogue_source;

// Re-export commonly used types
pub use catalogue_source::CatalogueSource;
pub use types::{Candidate, ListKind, ParseListKindError, UserProfile};
pub use user_profile::build_user_profile;
pub use vectorizer::{FeatureGroup, FeatureVector, GroupWeights, Vectorizer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_kind_from_str() {
        assert_eq!("watched".parse::<ListKind>(), Ok(ListKind::Watched));
        assert_eq!(" Watchlist ".parse::<ListKind>(), Ok(ListKind::Watchlist));
        assert_eq!("ALL".parse::<ListKind>(), Ok(ListKind::All));
        assert_eq!(
            "favourites".parse::<ListKind>(),
            Err(ParseListKindError("favourites".to_string()))
        );
    }

    #[test]
    fn test_list_kind_select() {
        let lists = data_loader::UserLists::new(["alien"], ["heat"]);
        assert_eq!(ListKind::Watched.select(&lists).len(), 1);
        assert!(ListKind::Watchlist.select(&lists).contains("heat"));
        assert_eq!(ListKind::All.select(&lists).len(), 2);
    }

    #[test]
    fn test_empty_profile() {
        let profile = UserProfile::new("carol");
        assert!(profile.is_empty());
        assert!(!profile.has_seen_or_listed("alien"));
    }
}
