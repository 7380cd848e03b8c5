//! Query builders
//!
//! A builder is a per-request sink: the detector feeds it occurrences in
//! scan order, then takes the synthesized expression with `product()`.

use super::occurrence::QuantityOccurrence;
use crate::plugin::HostParser;
use crate::units::{Boost, Catalogue, Unit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write;

/// Expression produced when no quantity was detected
pub const MATCH_ALL: &str = "*:*";

/// Which builder a detector uses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderKind {
    /// Boosted literal clause plus optional range clause
    #[default]
    Boost,
    /// Range clause when a gap is configured, literal clause otherwise
    Filter,
}

impl fmt::Display for BuilderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderKind::Boost => write!(f, "boost"),
            BuilderKind::Filter => write!(f, "filter"),
        }
    }
}

/// Sink receiving detected quantities for one request
pub trait QueryBuilder<'a> {
    /// Append the clauses for one occurrence
    fn new_quantity_detected(&mut self, unit: &'a Unit, occurrence: &QuantityOccurrence<'a>);

    /// The synthesized expression, or [`MATCH_ALL`] when nothing was detected
    fn product(self) -> String
    where
        Self: Sized;

    /// Parser the product is handed to
    fn host_parser(&self) -> &'a dyn HostParser;
}

/// Builds `field:amount[^boost] field:[low TO high] ` clauses
pub struct BoostQueryBuilder<'a> {
    catalogue: &'a Catalogue,
    parser: &'a dyn HostParser,
    buffer: String,
}

impl<'a> BoostQueryBuilder<'a> {
    pub fn new(catalogue: &'a Catalogue, parser: &'a dyn HostParser) -> Self {
        Self {
            catalogue,
            parser,
            buffer: String::new(),
        }
    }
}

impl<'a> QueryBuilder<'a> for BoostQueryBuilder<'a> {
    fn new_quantity_detected(&mut self, unit: &'a Unit, occurrence: &QuantityOccurrence<'a>) {
        let field = occurrence.field_name();
        push_literal(&mut self.buffer, field, occurrence.amount(), unit.boost());

        if let Some(gap) = self.catalogue.gap(field) {
            push_range(&mut self.buffer, field, occurrence.range(gap));
        }
    }

    fn product(self) -> String {
        finish(self.buffer)
    }

    fn host_parser(&self) -> &'a dyn HostParser {
        self.parser
    }
}

/// Builds unboosted clauses, one per occurrence: a range when the field
/// has a gap, the literal amount otherwise
pub struct FilterQueryBuilder<'a> {
    catalogue: &'a Catalogue,
    parser: &'a dyn HostParser,
    buffer: String,
}

impl<'a> FilterQueryBuilder<'a> {
    pub fn new(catalogue: &'a Catalogue, parser: &'a dyn HostParser) -> Self {
        Self {
            catalogue,
            parser,
            buffer: String::new(),
        }
    }
}

impl<'a> QueryBuilder<'a> for FilterQueryBuilder<'a> {
    fn new_quantity_detected(&mut self, _unit: &'a Unit, occurrence: &QuantityOccurrence<'a>) {
        let field = occurrence.field_name();
        match self.catalogue.gap(field) {
            Some(gap) => push_range(&mut self.buffer, field, occurrence.range(gap)),
            None => push_literal(&mut self.buffer, field, occurrence.amount(), None),
        }
    }

    fn product(self) -> String {
        finish(self.buffer)
    }

    fn host_parser(&self) -> &'a dyn HostParser {
        self.parser
    }
}

fn push_literal(buffer: &mut String, field: &str, amount: u64, boost: Option<&Boost>) {
    // Writing to a String cannot fail
    let _ = write!(buffer, "{}:{}", field, amount);
    if let Some(boost) = boost {
        let _ = write!(buffer, "^{}", boost);
    }
    buffer.push(' ');
}

fn push_range(buffer: &mut String, field: &str, (low, high): (u64, u64)) {
    let _ = write!(buffer, "{}:[{} TO {}] ", field, low, high);
}

fn finish(buffer: String) -> String {
    if buffer.is_empty() {
        MATCH_ALL.to_string()
    } else {
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::query_string::LexicalParser;
    use crate::units::{Field, Gap};

    fn catalogue() -> Catalogue {
        Catalogue::builder()
            .field(
                Field::new("capacity")
                    .with_gap(Gap::new(10.0).unwrap())
                    .with_unit(Unit::new("gb").with_variants(["gb", "gigabyte"])),
            )
            .field(
                Field::new("size").with_unit(
                    Unit::new("inch")
                        .with_variants(["inch", "\""])
                        .with_boost(Boost::parse("2.0").unwrap()),
                ),
            )
            .build()
            .unwrap()
    }

    fn feed<'a, B: QueryBuilder<'a>>(mut builder: B, catalogue: &'a Catalogue, items: &[(&str, u64)]) -> String {
        for &(field_name, amount) in items {
            let field = catalogue.field(field_name).unwrap();
            let unit = &field.units()[0];
            let occurrence = QuantityOccurrence::new(field.name(), amount, unit);
            builder.new_quantity_detected(unit, &occurrence);
        }
        builder.product()
    }

    #[test]
    fn test_boost_builder_literal_and_range() {
        let catalogue = catalogue();
        let parser = LexicalParser::default();

        let product = feed(
            BoostQueryBuilder::new(&catalogue, &parser),
            &catalogue,
            &[("capacity", 100)],
        );
        assert_eq!(product, "capacity:100 capacity:[90 TO 110] ");
    }

    #[test]
    fn test_boost_builder_clamps_lower_bound() {
        let catalogue = catalogue();
        let parser = LexicalParser::default();

        let product = feed(
            BoostQueryBuilder::new(&catalogue, &parser),
            &catalogue,
            &[("capacity", 5)],
        );
        assert_eq!(product, "capacity:5 capacity:[0 TO 15] ");
    }

    #[test]
    fn test_boost_builder_boost_suffix() {
        let catalogue = catalogue();
        let parser = LexicalParser::default();

        let product = feed(
            BoostQueryBuilder::new(&catalogue, &parser),
            &catalogue,
            &[("size", 42), ("capacity", 100)],
        );
        assert_eq!(product, "size:42^2.0 capacity:100 capacity:[90 TO 110] ");
    }

    #[test]
    fn test_empty_product_is_match_all() {
        let catalogue = catalogue();
        let parser = LexicalParser::default();

        assert_eq!(BoostQueryBuilder::new(&catalogue, &parser).product(), MATCH_ALL);
        assert_eq!(FilterQueryBuilder::new(&catalogue, &parser).product(), MATCH_ALL);
    }

    #[test]
    fn test_filter_builder() {
        let catalogue = catalogue();
        let parser = LexicalParser::default();

        let product = feed(
            FilterQueryBuilder::new(&catalogue, &parser),
            &catalogue,
            &[("size", 42), ("capacity", 5)],
        );
        assert_eq!(product, "size:42 capacity:[0 TO 15] ");
    }

    #[test]
    fn test_host_parser_handle() {
        let catalogue = catalogue();
        let parser = LexicalParser::default();
        let builder = BoostQueryBuilder::new(&catalogue, &parser);
        assert_eq!(builder.host_parser().name(), parser.name());
    }

    #[test]
    fn test_builder_kind_serde() {
        assert_eq!(serde_json::to_string(&BuilderKind::Filter).unwrap(), "\"filter\"");
        let kind: BuilderKind = serde_json::from_str("\"boost\"").unwrap();
        assert_eq!(kind, BuilderKind::Boost);
        assert_eq!(BuilderKind::default().to_string(), "boost");
    }
}
