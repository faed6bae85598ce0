//! Result count: "top 5", "show me 3", "5 more ...", "10 films".

use super::{Extraction, ExtractionRule};
use crate::constraint::Constraint;
use regex::Regex;
use std::sync::LazyLock;

/// Largest count a prompt may ask for
pub const MAX_COUNT: usize = 50;

static COUNT_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\btop\s+(\d{1,3})\b").unwrap(),
        Regex::new(r"(?i)\b(?:show|give|get|find|recommend)\s+me\s+(\d{1,3})\b").unwrap(),
        Regex::new(r"^\s*(\d{1,3})\b").unwrap(),
        Regex::new(r"(?i)\b(\d{1,3})\s+(?:more\s+)?(?:films?|movies?|picks?|recommendations?|recs?)\b")
            .unwrap(),
    ]
});

#[derive(Debug, Clone, Copy, Default)]
pub struct CountRule;

impl ExtractionRule for CountRule {
    fn name(&self) -> &'static str {
        "count"
    }

    fn extract(&self, text: &str) -> Vec<Extraction> {
        let mut found = Vec::new();
        for pattern in COUNT_PATTERNS.iter() {
            for caps in pattern.captures_iter(text) {
                let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let Ok(k) = number.as_str().parse::<usize>() else {
                    continue;
                };
                if !(1..=MAX_COUNT).contains(&k) {
                    continue;
                }
                // The leading-number pattern may swallow whitespace
                let start = whole.start() + (whole.len() - whole.as_str().trim_start().len());
                found.push(Extraction::new(start..whole.end(), Constraint::new().with_k(k)));
            }
        }
        found
    }
}
