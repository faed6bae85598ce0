//! Filter implementations for the candidate pipeline.
//!
//! One filter per constraint field. Each keeps candidates in their input
//! order.

pub mod country;
pub mod genre;
pub mod similar_to;
pub mod year_range;

// Re-export for convenience
pub use country::CountryFilter;
pub use genre::GenreFilter;
pub use similar_to::SimilarToFilter;
pub use year_range::YearRangeFilter;

use refinement::lexicon::Lexicon;
use std::collections::HashSet;

/// Comparison key for a genre or country label: the lexicon's canonical
/// name when it has one, lower-cased.
pub(crate) fn label_key(lexicon: &Lexicon, label: &str) -> String {
    lexicon
        .canonical(label)
        .map(str::to_lowercase)
        .unwrap_or_else(|| label.trim().to_lowercase())
}

pub(crate) fn label_keys<I, S>(lexicon: &Lexicon, labels: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| label_key(lexicon, label.as_ref()))
        .filter(|key| !key.is_empty())
        .collect()
}
