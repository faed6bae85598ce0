//! Parsers for the catalogue and history files.
//!
//! - catalogue: JSON lines, one film per line
//!   (`{"slug": "the-matrix", "title": "The Matrix", "year": 1999, ...}`)
//! - history: `<user>/watched.txt` and `<user>/watchlist.txt`, one film id per line

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Name of the watched list inside a user directory
pub const WATCHED_FILE: &str = "watched.txt";
/// Name of the watchlist inside a user directory
pub const WATCHLIST_FILE: &str = "watchlist.txt";

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    Ok(content.lines().map(|s| s.to_string()).collect())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse a JSON-lines catalogue file.
///
/// Blank lines are skipped. A record without a title gets one derived
/// from its id; a record without a year falls back to a trailing
/// `(YYYY)` in its title.
pub fn parse_catalogue(path: &Path) -> Result<Vec<FilmRecord>> {
    let lines = read_lines(path)?;
    let file = file_label(path);
    let mut films = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }
        let film = parse_film_line(line_trimmed).map_err(|reason| DataLoadError::ParseError {
            file: file.clone(),
            line: line_no,
            reason,
        })?;
        films.push(film);
    }
    Ok(films)
}

fn parse_film_line(line: &str) -> std::result::Result<FilmRecord, String> {
    let mut film: FilmRecord =
        serde_json::from_str(line).map_err(|e| format!("Invalid film record: {}", e))?;

    if film.id.trim().is_empty() {
        return Err("Missing film id".to_string());
    }
    if film.title.trim().is_empty() {
        film.title = title_from_id(&film.id);
    }
    if film.year.is_none() {
        film.year = extract_year_from_title(&film.title);
    }
    Ok(film)
}

/// Read one history list. A missing file is an empty list.
pub fn parse_list_file(path: &Path) -> Result<Vec<FilmId>> {
    let lines = match read_lines(path) {
        Ok(lines) => lines,
        Err(DataLoadError::FileNotFound { .. }) => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    Ok(dedup_ordered(
        lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty()),
    ))
}

/// Read both lists from a user directory.
pub fn parse_user_lists(user_dir: &Path) -> Result<UserLists> {
    if !user_dir.is_dir() {
        return Err(DataLoadError::FileNotFound {
            path: user_dir.display().to_string(),
        });
    }
    let watched = parse_list_file(&user_dir.join(WATCHED_FILE))?;
    let watchlist = parse_list_file(&user_dir.join(WATCHLIST_FILE))?;
    Ok(UserLists::new(watched, watchlist))
}

/// Derive a display title from a slug
///
/// Example: "the-grand-budapest-hotel" -> "The Grand Budapest Hotel"
fn title_from_id(id: &str) -> String {
    id.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract year from a film title
///
/// Example: "Alien (1979)" -> Some(1979)
///          "Alien" -> None
fn extract_year_from_title(title: &str) -> Option<u16> {
    let start = title.rfind('(')?;
    let end = title.rfind(')')?;
    if start < end {
        let year_str = &title[start + 1..end];
        if year_str.len() == 4 {
            return year_str.parse::<u16>().ok();
        }
    }
    None
}
