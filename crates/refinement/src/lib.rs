//! # Refinement Crate
//!
//! Deterministic, rule-based parsing of free-text refinement prompts
//! ("top 3 comedies after 1990", "5 more like Parasite") into a
//! structured [`Constraint`].
//!
//! ## Components
//!
//! - **constraint**: The `Constraint` type and its merge semantics
//! - **rules**: Independent extractors (count, genre, year, country, similar_to)
//! - **lexicon**: Genre and country phrase tables
//! - **resolver**: Title phrase → film id (slug or catalogue lookup)
//! - **parser**: Overlap resolution and left-to-right merge
//!
//! ## Example Usage
//!
//! ```ignore
//! use refinement::{parse_refinement_prompt, CatalogueResolver, RefinementParser};
//! use std::sync::Arc;
//!
//! let constraint = parse_refinement_prompt("top 3 comedies after 1990");
//! assert_eq!(constraint.k, Some(3));
//!
//! let parser = RefinementParser::with_resolver(Arc::new(CatalogueResolver::new(catalogue)));
//! let constraint = parser.parse("something like The Matrx");
//! ```

pub mod constraint;
pub mod lexicon;
pub mod parser;
pub mod resolver;
pub mod rules;

pub use constraint::Constraint;
pub use parser::{parse_refinement_prompt, ParsedRefinement, RefinementIntent, RefinementParser};
pub use resolver::{slugify, CatalogueResolver, SlugResolver, TitleResolver, DEFAULT_FUZZY_TITLE_THRESHOLD};
pub use rules::{Extraction, ExtractionRule, MAX_COUNT};
