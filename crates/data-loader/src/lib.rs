//! # Data Loader Crate
//!
//! Loads and indexes the film catalogue and users' viewing history.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (FilmRecord, UserLists, CatalogueIndex, HistoryIndex)
//! - **traits**: `Catalogue` and `HistoryProvider`, the read-only seams the core consumes
//! - **parser**: Parse the JSON-lines catalogue and the per-user list files
//! - **index**: Build the in-memory indices from disk
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{load_dataset, Catalogue, HistoryProvider};
//! use std::path::Path;
//!
//! let (catalogue, history) = load_dataset(Path::new("data/films.jsonl"), Path::new("data/users"))?;
//!
//! let film = catalogue.get("the-matrix").unwrap();
//! let lists = history.get_lists("alice").unwrap();
//! println!("{} ({:?}) - alice watched {}", film.title, film.year, lists.watched.len());
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod traits;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::load_dataset;
pub use traits::{Catalogue, HistoryProvider};
pub use types::{
    // Type aliases
    FilmId,
    Username,
    // Core types
    FilmRecord,
    UserLists,
    CatalogueIndex,
    HistoryIndex,
};
