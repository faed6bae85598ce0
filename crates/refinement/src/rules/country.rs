//! Country names and demonyms ("korean", "south korea", "uk").

use super::{Extraction, ExtractionRule};
use crate::constraint::Constraint;
use crate::lexicon::COUNTRIES;

#[derive(Debug, Clone, Copy, Default)]
pub struct CountryRule;

impl ExtractionRule for CountryRule {
    fn name(&self) -> &'static str {
        "country"
    }

    fn extract(&self, text: &str) -> Vec<Extraction> {
        COUNTRIES
            .find_all(text)
            .into_iter()
            .map(|(span, countries)| {
                Extraction::new(span, Constraint::new().with_countries(countries.iter().copied()))
            })
            .collect()
    }
}
