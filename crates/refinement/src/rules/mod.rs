//! Extraction rules.
//!
//! Each rule scans the whole prompt independently and reports what it
//! found together with the byte span it matched. The parser decides which
//! extractions survive when spans overlap.

pub mod count;
pub mod country;
pub mod genre;
pub mod similar_to;
pub mod year;

use crate::constraint::Constraint;
use crate::resolver::TitleResolver;
use std::ops::Range;
use std::sync::Arc;

pub use count::{CountRule, MAX_COUNT};
pub use country::CountryRule;
pub use genre::GenreRule;
pub use similar_to::SimilarToRule;
pub use year::YearRule;

/// A partial constraint and the text it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub span: Range<usize>,
    pub partial: Constraint,
}

impl Extraction {
    pub fn new(span: Range<usize>, partial: Constraint) -> Self {
        Self { span, partial }
    }

    pub fn overlaps(&self, other: &Extraction) -> bool {
        self.span.start < other.span.end && other.span.start < self.span.end
    }
}

/// One independent extractor over the raw prompt text.
pub trait ExtractionRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract(&self, text: &str) -> Vec<Extraction>;
}

/// The built-in rules, in tie-break order
pub fn default_rules(resolver: Arc<dyn TitleResolver>) -> Vec<Box<dyn ExtractionRule>> {
    vec![
        Box::new(CountRule),
        Box::new(GenreRule),
        Box::new(YearRule),
        Box::new(CountryRule),
        Box::new(SimilarToRule::new(resolver)),
    ]
}
