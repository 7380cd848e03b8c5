//! Property-based tests for expression synthesis

use proptest::prelude::*;
use qty_qparser::detection::MATCH_ALL;
use qty_qparser::query::query_string::LexicalParser;
use qty_qparser::{Boost, Catalogue, Field, Gap, HostParser, QuantityDetector, QueryRequest, Unit};
use std::sync::Arc;

/// Variants of the test catalogue and whether their unit declares a boost
const VARIANTS: [(&str, bool); 8] = [
    ("gb", false),
    ("gigabyte", false),
    ("tb", false),
    ("inch", true),
    ("\"", true),
    ("kg", true),
    ("kilo", true),
    ("lb", false),
];

fn detector() -> QuantityDetector {
    let catalogue = Catalogue::builder()
        .field(
            Field::new("capacity")
                .with_gap(Gap::new(10.0).unwrap())
                .with_unit(Unit::new("gb").with_variants(["gb", "gigabyte"]))
                .with_unit(Unit::new("tb").with_variant("tb")),
        )
        .field(
            Field::new("size").with_gap(Gap::new(1.0).unwrap()).with_unit(
                Unit::new("inch")
                    .with_variants(["inch", "\""])
                    .with_boost(Boost::parse("2.0").unwrap()),
            ),
        )
        .field(
            Field::new("weight")
                .with_unit(
                    Unit::new("kg")
                        .with_variants(["kg", "kilo"])
                        .with_boost(Boost::parse("1.5").unwrap()),
                )
                .with_unit(Unit::new("lb").with_variant("lb")),
        )
        .build()
        .unwrap();

    QuantityDetector::boost("qty", Arc::new(catalogue), Arc::new(LexicalParser::default()))
}

/// A quantity phrase such as `42 inch`, with its variant index
fn quantity_strategy() -> impl Strategy<Value = (String, usize)> {
    (0u64..100_000, 0..VARIANTS.len(), any::<bool>()).prop_map(|(amount, variant, spaced)| {
        let sep = if spaced { " " } else { "" };
        (format!("{}{}{}", amount, sep, VARIANTS[variant].0), variant)
    })
}

fn join(phrases: &[(String, usize)]) -> String {
    phrases
        .iter()
        .map(|(phrase, _)| phrase.as_str())
        .collect::<Vec<_>>()
        .join(" with ")
}

#[test]
fn prop_synthesis_is_deterministic() {
    let detector = detector();
    proptest!(|(query in ".{0,64}")| {
        prop_assert_eq!(detector.synthesize(&query), detector.synthesize(&query));
    });
}

#[test]
fn prop_match_all_iff_nothing_detected() {
    let detector = detector();
    proptest!(|(query in "[a-z0-9 \"]{0,48}")| {
        let expression = detector.synthesize(&query);
        let detected = detector.detect(&query);
        prop_assert_eq!(expression == MATCH_ALL, detected.is_empty());
    });
}

#[test]
fn prop_every_phrase_is_detected_in_order() {
    let detector = detector();
    proptest!(|(phrases in prop::collection::vec(quantity_strategy(), 1..8))| {
        let query = join(&phrases);
        let detected = detector.detect(&query);
        prop_assert_eq!(detected.len(), phrases.len());

        // Each literal appears, in scan order
        let expression = detector.synthesize(&query);
        let mut from = 0;
        for occurrence in &detected {
            let literal = format!("{}:{}", occurrence.field_name(), occurrence.amount());
            let found = expression[from..].find(&literal);
            prop_assert!(found.is_some(), "{} missing from {}", literal, expression);
            from += found.unwrap_or(0) + literal.len();
        }
    });
}

#[test]
fn prop_range_iff_gap_and_never_negative() {
    let detector = detector();
    proptest!(|(phrases in prop::collection::vec(quantity_strategy(), 1..8))| {
        let query = join(&phrases);
        let expression = detector.synthesize(&query);

        let with_gap = detector
            .detect(&query)
            .iter()
            .filter(|o| detector.catalogue().gap(o.field_name()).is_some())
            .count();
        prop_assert_eq!(expression.matches(" TO ").count(), with_gap);
        prop_assert!(!expression.contains('-'));
    });
}

#[test]
fn prop_boost_iff_declared() {
    let detector = detector();
    proptest!(|(phrases in prop::collection::vec(quantity_strategy(), 1..8))| {
        let expression = detector.synthesize(&join(&phrases));
        let boosted = phrases.iter().filter(|(_, v)| VARIANTS[*v].1).count();
        prop_assert_eq!(expression.matches('^').count(), boosted);
    });
}

#[test]
fn prop_reordering_phrases_reorders_expression() {
    let detector = detector();
    proptest!(|(phrases in prop::collection::vec(quantity_strategy(), 1..8))| {
        let clauses: Vec<String> = phrases
            .iter()
            .map(|(phrase, _)| detector.synthesize(phrase))
            .collect();

        prop_assert_eq!(detector.synthesize(&join(&phrases)), clauses.concat());

        let mut reversed = phrases.clone();
        reversed.reverse();
        let mut reversed_clauses = clauses.clone();
        reversed_clauses.reverse();
        prop_assert_eq!(detector.synthesize(&join(&reversed)), reversed_clauses.concat());
    });
}

#[test]
fn prop_synthesized_expression_always_parses() {
    let detector = detector();
    let parser = LexicalParser::default();
    let request = QueryRequest::default();
    proptest!(|(query in ".{0,64}")| {
        let expression = detector.synthesize(&query);
        prop_assert!(parser.parse(&expression, &request).is_ok(), "unparseable: {}", expression);
    });
}
