//! Building the in-memory indices from files on disk.
//!
//! The catalogue and the history directory are independent, so
//! [`load_dataset`] parses them in parallel with `rayon::join`, and the
//! per-user directories are parsed in parallel as well.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

impl CatalogueIndex {
    /// Load a JSON-lines catalogue and validate it.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let films = parser::parse_catalogue(path)?;
        let parsed = films.len();

        let mut index = CatalogueIndex::new();
        for film in films {
            let id = film.id.clone();
            if index.insert_film(film).is_some() {
                return Err(DataLoadError::DuplicateFilm { id });
            }
        }
        index.validate()?;

        info!("Loaded {} films from {}", parsed, path.display());
        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Every record must have a non-empty id and title, and must be
    /// stored under its own id.
    pub fn validate(&self) -> Result<()> {
        for (key, film) in &self.films {
            if film.id.is_empty() || key != &film.id {
                return Err(DataLoadError::InvalidValue {
                    field: "id".to_string(),
                    value: key.clone(),
                });
            }
            if film.title.is_empty() {
                return Err(DataLoadError::ValidationError(format!(
                    "Film {} has no title",
                    film.id
                )));
            }
        }
        Ok(())
    }
}

impl HistoryIndex {
    /// Load every user directory under `history_dir`.
    ///
    /// Each sub-directory name is a username; see [`parser::parse_user_lists`]
    /// for the files read inside it.
    pub fn load_from_dir(history_dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(history_dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
                path: history_dir.display().to_string(),
            },
            _ => DataLoadError::IoError(e),
        })?;

        let mut user_dirs = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                user_dirs.push(entry.path());
            }
        }

        let users: Vec<(Username, UserLists)> = user_dirs
            .par_iter()
            .map(|dir| {
                let username = dir
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let lists = parser::parse_user_lists(dir)?;
                debug!(
                    "Parsed history for {}: watched={}, watchlist={}",
                    username,
                    lists.watched.len(),
                    lists.watchlist.len()
                );
                Ok((username, lists))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut index = HistoryIndex::new();
        for (username, lists) in users {
            index.insert_user(username, lists);
        }

        info!("Loaded history for {} users from {}", index.len(), history_dir.display());
        Ok(index)
    }
}

/// Load the catalogue and history directory in parallel.
pub fn load_dataset(
    catalogue_path: &Path,
    history_dir: &Path,
) -> Result<(CatalogueIndex, HistoryIndex)> {
    let (catalogue, history) = rayon::join(
        || CatalogueIndex::load_from_file(catalogue_path),
        || HistoryIndex::load_from_dir(history_dir),
    );
    Ok((catalogue?, history?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{WATCHED_FILE, WATCHLIST_FILE};

    fn write_catalogue(dir: &Path, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.join("films.jsonl");
        fs::write(&path, lines.join("\n")).unwrap();
        path
    }

    #[test]
    fn test_load_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let catalogue_path = write_catalogue(
            dir.path(),
            &[
                r#"{"id": "alien", "title": "Alien", "year": 1979, "genres": ["Horror"]}"#,
                r#"{"id": "heat", "title": "Heat", "year": 1995, "genres": ["Crime"]}"#,
            ],
        );

        let history_dir = dir.path().join("users");
        let alice = history_dir.join("alice");
        fs::create_dir_all(&alice).unwrap();
        fs::write(alice.join(WATCHED_FILE), "alien\n").unwrap();
        fs::write(alice.join(WATCHLIST_FILE), "heat\n").unwrap();
        fs::create_dir_all(history_dir.join("bob")).unwrap();

        let (catalogue, history) = load_dataset(&catalogue_path, &history_dir).unwrap();

        assert_eq!(catalogue.len(), 2);
        assert_eq!(history.usernames(), vec!["alice".to_string(), "bob".to_string()]);

        let alice_lists = history.get_user("alice").unwrap();
        assert!(alice_lists.watched.contains("alien"));
        assert!(alice_lists.watchlist.contains("heat"));

        // A user directory without list files is ingested with empty lists
        let bob_lists = history.get_user("bob").unwrap();
        assert!(bob_lists.all().is_empty());
    }

    #[test]
    fn test_duplicate_film_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let catalogue_path = write_catalogue(
            dir.path(),
            &[r#"{"id": "alien"}"#, r#"{"id": "alien", "title": "Alien again"}"#],
        );

        let err = CatalogueIndex::load_from_file(&catalogue_path).unwrap_err();
        assert!(matches!(err, DataLoadError::DuplicateFilm { id } if id == "alien"));
    }

    #[test]
    fn test_missing_history_dir() {
        let err = HistoryIndex::load_from_dir(Path::new("/no/such/history")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
