//! Rule-based refinement parser.
//!
//! ## Algorithm
//! 1. Run every rule over the prompt and collect all extractions
//! 2. Resolve overlaps: longest span first, then earliest, then rule order
//! 3. Merge the survivors left to right into one [`Constraint`]
//!
//! Parsing never fails. Text no rule recognises is ignored, so an empty
//! or unrelated prompt yields an unconstrained result.

use crate::constraint::Constraint;
use crate::resolver::{SlugResolver, TitleResolver};
use crate::rules::{default_rules, Extraction, ExtractionRule};
use regex::Regex;
use serde::Serialize;
use std::sync::{Arc, LazyLock};
use tracing::debug;

static MORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bmore\b").unwrap());

static DEFAULT_PARSER: LazyLock<RefinementParser> = LazyLock::new(RefinementParser::new);

/// Whether a prompt asks for more of the same or changes direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefinementIntent {
    More,
    Refine,
}

/// A parsed prompt with its intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRefinement {
    pub intent: RefinementIntent,
    pub constraint: Constraint,
    pub raw_prompt: String,
}

/// Turns free text into a [`Constraint`] with an ordered set of rules.
pub struct RefinementParser {
    rules: Vec<Box<dyn ExtractionRule>>,
}

impl Default for RefinementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RefinementParser {
    /// Parser with the built-in rules; titles resolve to their slug
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(SlugResolver))
    }

    /// Parser with the built-in rules and a custom title resolver
    pub fn with_resolver(resolver: Arc<dyn TitleResolver>) -> Self {
        Self {
            rules: default_rules(resolver),
        }
    }

    /// Append a rule; it loses ties against every rule already present
    pub fn with_rule(mut self, rule: Box<dyn ExtractionRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn parse(&self, text: &str) -> Constraint {
        let mut candidates: Vec<(usize, Extraction)> = self
            .rules
            .iter()
            .enumerate()
            .flat_map(|(order, rule)| {
                let found = rule.extract(text);
                if !found.is_empty() {
                    debug!("Rule {} matched {} time(s)", rule.name(), found.len());
                }
                found.into_iter().map(move |extraction| (order, extraction))
            })
            .collect();

        candidates.sort_by(|(order_a, a), (order_b, b)| {
            b.span
                .len()
                .cmp(&a.span.len())
                .then(a.span.start.cmp(&b.span.start))
                .then(order_a.cmp(order_b))
        });

        let mut kept: Vec<Extraction> = Vec::with_capacity(candidates.len());
        for (_, extraction) in candidates {
            if kept.iter().all(|other| !other.overlaps(&extraction)) {
                kept.push(extraction);
            }
        }
        kept.sort_by_key(|extraction| extraction.span.start);

        let mut constraint = Constraint::new();
        for extraction in kept {
            constraint.merge(extraction.partial);
        }
        constraint
    }

    /// Parse and classify the prompt's intent
    pub fn parse_detailed(&self, text: &str) -> ParsedRefinement {
        let raw_prompt = text.trim().to_string();
        let intent = if MORE.is_match(&raw_prompt) {
            RefinementIntent::More
        } else {
            RefinementIntent::Refine
        };
        ParsedRefinement {
            intent,
            constraint: self.parse(&raw_prompt),
            raw_prompt,
        }
    }
}

/// Parse a prompt without a catalogue; `similar_to` is the title's slug.
pub fn parse_refinement_prompt(text: &str) -> Constraint {
    DEFAULT_PARSER.parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_comedies_after_year() {
        let constraint = parse_refinement_prompt("top 3 comedies after 1990");
        assert_eq!(
            constraint,
            Constraint::new()
                .with_k(3)
                .with_genres(["Comedy"])
                .with_year_range(Some(1990), None)
        );
    }

    #[test]
    fn test_films_like_slug() {
        assert_eq!(
            parse_refinement_prompt("films like the-matrix"),
            Constraint::new().with_similar_to("the-matrix")
        );
    }

    #[test]
    fn test_empty_and_unrelated_prompts() {
        assert!(parse_refinement_prompt("").is_unconstrained());
        assert!(parse_refinement_prompt("   ").is_unconstrained());
        assert!(parse_refinement_prompt("surprise me!").is_unconstrained());
    }

    #[test]
    fn test_longest_span_wins() {
        // "from 1990 to 1999" beats the shorter "from 1990"
        let constraint = parse_refinement_prompt("dramas from 1990 to 1999");
        assert_eq!(constraint.year_min, Some(1990));
        assert_eq!(constraint.year_max, Some(1999));

        // The title phrase swallows the genre word inside it
        let constraint = parse_refinement_prompt("like Romance in Paris");
        assert!(constraint.genres.is_empty());
        assert_eq!(constraint.similar_to.as_deref(), Some("romance"));
    }

    #[test]
    fn test_first_scalar_wins() {
        let constraint = parse_refinement_prompt("top 4 films, actually give me 9");
        assert_eq!(constraint.k, Some(4));

        let constraint = parse_refinement_prompt("after 1980 and after 2000");
        assert_eq!(constraint.year_min, Some(1980));
    }

    #[test]
    fn test_sets_union() {
        let constraint = parse_refinement_prompt("a korean thriller or some japanese horror");
        assert_eq!(constraint.genres.len(), 2);
        assert!(constraint.countries.contains("South Korea"));
        assert!(constraint.countries.contains("Japan"));
    }

    #[test]
    fn test_parse_detailed_intent() {
        let parsed = RefinementParser::new().parse_detailed("  5 more like Parasite ");
        assert_eq!(parsed.intent, RefinementIntent::More);
        assert_eq!(parsed.raw_prompt, "5 more like Parasite");
        assert_eq!(parsed.constraint.k, Some(5));
        assert_eq!(parsed.constraint.similar_to.as_deref(), Some("parasite"));

        let parsed = RefinementParser::new().parse_detailed("only westerns");
        assert_eq!(parsed.intent, RefinementIntent::Refine);
    }

    #[test]
    fn test_title_phrase_leaves_later_constraints() {
        assert_eq!(
            parse_refinement_prompt("films like Heat since 2000"),
            Constraint::new().with_similar_to("heat").with_year_range(Some(2000), None)
        );
        assert_eq!(
            parse_refinement_prompt("something like Heat top 3"),
            Constraint::new().with_similar_to("heat").with_k(3)
        );

        let constraint = parse_refinement_prompt("like Heat 90s korean");
        assert_eq!(constraint.similar_to.as_deref(), Some("heat"));
        assert_eq!(constraint.year_min, Some(1990));
        assert!(constraint.countries.contains("South Korea"));
    }

    #[test]
    fn test_custom_rule() {
        struct ClassicsRule;
        impl ExtractionRule for ClassicsRule {
            fn name(&self) -> &'static str {
                "classics"
            }

            fn extract(&self, text: &str) -> Vec<Extraction> {
                text.find("classics")
                    .map(|at| Extraction::new(at..at + 8, Constraint::new().with_year_range(None, Some(1970))))
                    .into_iter()
                    .collect()
            }
        }

        let parser = RefinementParser::new().with_rule(Box::new(ClassicsRule));
        assert_eq!(parser.rule_names().last(), Some(&"classics"));
        assert_eq!(
            parser.parse("3 classics"),
            Constraint::new().with_k(3).with_year_range(None, Some(1970))
        );
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            RefinementParser::new().rule_names(),
            vec!["count", "genre", "year", "country", "similar_to"]
        );
    }
}
