//! Genre names and aliases ("sci-fi", "rom-com", "scary").

use super::{Extraction, ExtractionRule};
use crate::constraint::Constraint;
use crate::lexicon::GENRES;

#[derive(Debug, Clone, Copy, Default)]
pub struct GenreRule;

impl ExtractionRule for GenreRule {
    fn name(&self) -> &'static str {
        "genre"
    }

    fn extract(&self, text: &str) -> Vec<Extraction> {
        GENRES
            .find_all(text)
            .into_iter()
            .map(|(span, genres)| {
                Extraction::new(span, Constraint::new().with_genres(genres.iter().copied()))
            })
            .collect()
    }
}
