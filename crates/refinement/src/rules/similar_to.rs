//! Anchor film: "like Parasite", "similar to 'The Matrix'".

use super::{CountRule, CountryRule, Extraction, ExtractionRule, GenreRule, YearRule};
use crate::constraint::Constraint;
use crate::resolver::TitleResolver;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::debug;

static TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:similar\s+to|like)\s+").unwrap());

/// Where a title phrase always stops
const HARD_BOUNDARIES: &[&str] = &[
    " but ", " after ", " before ", " between ", " since ", " until ", " top ", " only ",
    " released ", ",", ";",
];

/// Words a title may contain. The phrase is also read up to each of them.
const SOFT_BOUNDARIES: &[&str] = &[" and ", " or ", " with ", " from ", " in "];

/// Words that turn "like" into a verb ("I'd like", "would like")
const VERB_SUBJECTS: &[&str] = &["i", "i'd", "i’d", "id", "would", "you", "we", "they", "you'd", "we'd"];

const TRIM_CHARS: &[char] = &['"', '\'', '“', '”', '‘', '’', '.', ',', ';', ':', '!', '?', '(', ')'];

fn is_verb_use(before: &str) -> bool {
    let before = before.trim_end().to_lowercase();
    VERB_SUBJECTS.iter().any(|subject| {
        before.strip_suffix(subject).is_some_and(|rest| {
            rest.chars().last().is_none_or(|c| !c.is_alphanumeric() && c != '\'')
        })
    })
}

/// Offsets into `text[from..]` where another rule's match begins
fn match_starts(rules: &[Box<dyn ExtractionRule>], text: &str, from: usize) -> Vec<usize> {
    rules
        .iter()
        .flat_map(|rule| rule.extract(text))
        .filter(|extraction| extraction.span.start >= from)
        .map(|extraction| extraction.span.start - from)
        .collect()
}

/// `rest[..end]` without surrounding quotes and punctuation, with the
/// number of bytes trimmed from the front
fn reading(rest: &str, end: usize) -> Option<(usize, &str)> {
    let raw = &rest[..end];
    let phrase = raw.trim_start_matches(|c: char| c.is_whitespace() || TRIM_CHARS.contains(&c));
    let lead = raw.len() - phrase.len();
    let phrase = phrase.trim_end_matches(|c: char| c.is_whitespace() || TRIM_CHARS.contains(&c));
    (!phrase.is_empty()).then_some((lead, phrase))
}

/// Extracts the anchor film after "like" or "similar to".
///
/// The phrase always ends at a hard boundary or where a count or year
/// match begins. Inside that, soft boundaries and genre or country
/// matches give shorter readings. The longest reading that names a film
/// exactly wins; otherwise the shortest reading is resolved, fuzzy
/// matching allowed, so trailing genres and countries stay with their
/// own rules.
pub struct SimilarToRule {
    resolver: Arc<dyn TitleResolver>,
    hard_stops: Vec<Box<dyn ExtractionRule>>,
    soft_stops: Vec<Box<dyn ExtractionRule>>,
}

impl SimilarToRule {
    pub fn new(resolver: Arc<dyn TitleResolver>) -> Self {
        Self {
            resolver,
            hard_stops: vec![Box::new(CountRule), Box::new(YearRule)],
            soft_stops: vec![Box::new(GenreRule), Box::new(CountryRule)],
        }
    }
}

impl ExtractionRule for SimilarToRule {
    fn name(&self) -> &'static str {
        "similar_to"
    }

    fn extract(&self, text: &str) -> Vec<Extraction> {
        let mut found = Vec::new();

        for trigger in TRIGGER.find_iter(text) {
            if is_verb_use(&text[..trigger.start()]) {
                continue;
            }

            let rest = &text[trigger.end()..];
            let lowered = rest.to_ascii_lowercase();
            let hard_end = HARD_BOUNDARIES
                .iter()
                .filter_map(|boundary| lowered.find(boundary))
                .chain(match_starts(&self.hard_stops, text, trigger.end()))
                .min()
                .unwrap_or(rest.len());

            let mut ends: Vec<usize> = SOFT_BOUNDARIES
                .iter()
                .flat_map(|boundary| lowered.match_indices(boundary).map(|(at, _)| at))
                .chain(match_starts(&self.soft_stops, text, trigger.end()))
                .filter(|&end| end < hard_end)
                .collect();
            ends.push(hard_end);
            ends.sort_unstable_by(|a, b| b.cmp(a));
            ends.dedup();

            // Longest first
            let readings: Vec<(usize, &str)> = ends.iter().filter_map(|&end| reading(rest, end)).collect();
            let Some(&(short_lead, shortest)) = readings.last() else {
                continue;
            };

            let exact = readings.iter().find_map(|&(lead, phrase)| {
                self.resolver.resolve_exact(phrase).map(|film_id| (lead, phrase, Some(film_id)))
            });
            let (lead, phrase, film_id) =
                exact.unwrap_or_else(|| (short_lead, shortest, self.resolver.resolve(shortest)));

            let end = trigger.end() + lead + phrase.len();
            let partial = match film_id {
                Some(film_id) => Constraint::new().with_similar_to(film_id),
                None => {
                    debug!("Could not resolve {:?} to a film", phrase);
                    Constraint::new()
                }
            };
            found.push(Extraction::new(trigger.start()..end, partial));
        }
        found
    }
}
