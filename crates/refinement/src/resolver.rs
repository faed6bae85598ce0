//! Resolving a free-text title phrase to a film id.

use data_loader::{Catalogue, FilmId};
use std::sync::Arc;
use tracing::debug;

/// Jaro-Winkler score a fuzzy title match must reach
pub const DEFAULT_FUZZY_TITLE_THRESHOLD: f64 = 0.88;

/// Maps the phrase after "like" / "similar to" to a film id.
pub trait TitleResolver: Send + Sync {
    /// Best film for the phrase, approximate matches allowed
    fn resolve(&self, phrase: &str) -> Option<FilmId>;

    /// A film whose id or title is exactly the phrase. Resolvers that
    /// can't check titles return `None`.
    fn resolve_exact(&self, _phrase: &str) -> Option<FilmId> {
        None
    }
}

/// Lower-case slug: alphanumeric runs joined by single hyphens.
///
/// `"The Matrix"` and `"the-matrix"` both become `the-matrix`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else if c != '\'' && c != '’' {
            pending_hyphen = true;
        }
    }
    slug
}

/// Resolver used when there is no catalogue: the slug is the id.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugResolver;

impl TitleResolver for SlugResolver {
    fn resolve(&self, phrase: &str) -> Option<FilmId> {
        let slug = slugify(phrase);
        (!slug.is_empty()).then_some(slug)
    }
}

/// Resolves against a catalogue: exact id, then exact title, then the
/// closest fuzzy title at or above the threshold.
#[derive(Clone)]
pub struct CatalogueResolver {
    catalogue: Arc<dyn Catalogue>,
    fuzzy_threshold: f64,
}

impl CatalogueResolver {
    pub fn new(catalogue: Arc<dyn Catalogue>) -> Self {
        Self {
            catalogue,
            fuzzy_threshold: DEFAULT_FUZZY_TITLE_THRESHOLD,
        }
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }
}

/// Title comparison key: slug with hyphens as spaces
fn title_key(text: &str) -> String {
    slugify(text).replace('-', " ")
}

impl TitleResolver for CatalogueResolver {
    fn resolve_exact(&self, phrase: &str) -> Option<FilmId> {
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return None;
        }

        if let Some(film) = self
            .catalogue
            .get(phrase)
            .or_else(|| self.catalogue.get(&phrase.to_lowercase()))
        {
            return Some(film.id.clone());
        }

        let wanted = title_key(phrase);
        if wanted.is_empty() {
            return None;
        }
        self.catalogue
            .list_all()
            .into_iter()
            .find(|film| title_key(&film.title) == wanted)
            .map(|film| film.id.clone())
    }

    fn resolve(&self, phrase: &str) -> Option<FilmId> {
        if let Some(film_id) = self.resolve_exact(phrase) {
            return Some(film_id);
        }

        let wanted = title_key(phrase);
        if wanted.is_empty() {
            return None;
        }
        let films = self.catalogue.list_all();

        // Ties keep the earliest film in catalogue order
        let mut best: Option<(f64, &FilmId)> = None;
        for film in &films {
            let score = strsim::jaro_winkler(&wanted, &title_key(&film.title));
            if score >= self.fuzzy_threshold && best.is_none_or(|(top, _)| score > top) {
                best = Some((score, &film.id));
            }
        }

        match best {
            Some((score, id)) => {
                debug!("Fuzzy title match {:?} -> {} ({:.3})", phrase, id, score);
                Some(id.clone())
            }
            None => {
                debug!("No film matches {:?}", phrase);
                None
            }
        }
    }
}
