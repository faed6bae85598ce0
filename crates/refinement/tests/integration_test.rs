//! Parsing against a real catalogue

use data_loader::{Catalogue, CatalogueIndex, FilmRecord};
use refinement::{CatalogueResolver, Constraint, RefinementParser};
use std::sync::Arc;

fn create_test_catalogue() -> Arc<dyn Catalogue> {
    Arc::new(CatalogueIndex::from_films([
        FilmRecord::new("parasite-2019", "Parasite").with_year(2019),
        FilmRecord::new("the-matrix", "The Matrix").with_year(1999),
        FilmRecord::new("in-the-mood-for-love", "In the Mood for Love").with_year(2000),
        FilmRecord::new("heat", "Heat").with_year(1995),
        FilmRecord::new("fear-and-loathing", "Fear and Loathing in Las Vegas").with_year(1998),
    ]))
}

fn parser() -> RefinementParser {
    RefinementParser::with_resolver(Arc::new(CatalogueResolver::new(create_test_catalogue())))
}

#[test]
fn test_title_resolves_to_catalogue_id() {
    let constraint = parser().parse("5 more like Parasite");
    assert_eq!(constraint, Constraint::new().with_k(5).with_similar_to("parasite-2019"));
}

#[test]
fn test_fuzzy_title_with_other_constraints() {
    let constraint = parser().parse("korean thrillers like the matrx but after 2000");
    assert_eq!(constraint.similar_to.as_deref(), Some("the-matrix"));
    assert!(constraint.genres.contains("Thriller"));
    assert!(constraint.countries.contains("South Korea"));
    assert_eq!(constraint.year_min, Some(2000));
    assert_eq!(constraint.year_max, None);
}

#[test]
fn test_catalogue_title_keeps_year() {
    let constraint = parser().parse("films like Heat since 2000");
    assert_eq!(
        constraint,
        Constraint::new().with_similar_to("heat").with_year_range(Some(2000), None)
    );
}

#[test]
fn test_full_title_with_clause_words() {
    let constraint = parser().parse("something like Fear and Loathing in Las Vegas");
    assert_eq!(constraint.similar_to.as_deref(), Some("fear-and-loathing"));

    // Only the exact title reading may run past "in"
    let constraint = parser().parse("like Heat in 1999");
    assert_eq!(constraint.similar_to.as_deref(), Some("heat"));
    assert_eq!(constraint.year_min, Some(1999));
}

#[test]
fn test_unknown_title_sets_nothing() {
    let constraint = parser().parse("films like Paddington 2");
    assert!(constraint.similar_to.is_none());
    // "Paddington 2" is consumed by the title phrase, not read as a count
    assert!(constraint.k.is_none());
}

#[test]
fn test_same_prompt_same_result() {
    let parser = parser();
    let prompt = "top 10 french dramas from the 60s similar to heat";
    assert_eq!(parser.parse(prompt), parser.parse(prompt));
}
