//! Summary counts over a user's lists.

use data_loader::FilmRecord;
use pipeline::clamp_top_n;
use serde::Serialize;
use sources::ListKind;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountEntry {
    pub name: String,
    pub count: usize,
}

/// Most frequent genres, decades and directors in a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Infographic {
    pub username: String,
    pub list_kind: ListKind,
    /// Films selected by the list kind
    pub film_count: usize,
    /// Selected films the catalogue knows about
    pub films_found: usize,
    pub top_genres: Vec<CountEntry>,
    pub top_decades: Vec<CountEntry>,
    pub top_directors: Vec<CountEntry>,
}

/// Count by descending frequency, ties by name, truncated to `top_n`
fn top_counts<'a>(names: impl Iterator<Item = &'a str>, top_n: usize) -> Vec<CountEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(name, count)| CountEntry {
            name: name.to_string(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    entries.truncate(top_n);
    entries
}

pub fn build_infographic(
    username: &str,
    list_kind: ListKind,
    film_count: usize,
    films: &[Arc<FilmRecord>],
    top_n: usize,
) -> Infographic {
    let top_n = clamp_top_n(top_n);
    let decades: Vec<String> = films.iter().filter_map(|film| film.decade_label()).collect();

    Infographic {
        username: username.to_string(),
        list_kind,
        film_count,
        films_found: films.len(),
        top_genres: top_counts(films.iter().flat_map(|f| f.genres.iter().map(String::as_str)), top_n),
        top_decades: top_counts(decades.iter().map(String::as_str), top_n),
        top_directors: top_counts(films.iter().flat_map(|f| f.directors.iter().map(String::as_str)), top_n),
    }
}
