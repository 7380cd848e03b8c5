use super::bridge::HostParserBridge;
use super::builder::{BoostQueryBuilder, BuilderKind, FilterQueryBuilder, QueryBuilder};
use super::occurrence::QuantityOccurrence;
use super::scanner::Scanner;
use crate::config::PluginConfig;
use crate::models::QueryRequest;
use crate::plugin::HostParser;
use crate::query::query_string::LexicalParser;
use crate::query::QueryNode;
use crate::units::Catalogue;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Quantity detection query parser
///
/// Holds the catalogue and the host parser for the life of the process;
/// both are read-only, so one detector serves concurrent requests. Every
/// request gets a fresh builder.
#[derive(Clone)]
pub struct QuantityDetector {
    name: String,
    kind: BuilderKind,
    catalogue: Arc<Catalogue>,
    parser: Arc<dyn HostParser>,
}

impl QuantityDetector {
    pub fn new(
        name: impl Into<String>,
        kind: BuilderKind,
        catalogue: Arc<Catalogue>,
        parser: Arc<dyn HostParser>,
    ) -> Self {
        let name = name.into();
        info!(
            "Quantity detector '{}' ready: {} builder, {} fields, host parser '{}'",
            name,
            kind,
            catalogue.fields().len(),
            parser.name()
        );

        Self {
            name,
            kind,
            catalogue,
            parser,
        }
    }

    /// Detector synthesizing boost queries
    pub fn boost(
        name: impl Into<String>,
        catalogue: Arc<Catalogue>,
        parser: Arc<dyn HostParser>,
    ) -> Self {
        Self::new(name, BuilderKind::Boost, catalogue, parser)
    }

    /// Detector synthesizing filter queries
    pub fn filter(
        name: impl Into<String>,
        catalogue: Arc<Catalogue>,
        parser: Arc<dyn HostParser>,
    ) -> Self {
        Self::new(name, BuilderKind::Filter, catalogue, parser)
    }

    /// Build a detector from its deployment configuration
    ///
    /// Fails when the catalogue cannot be loaded or is invalid.
    pub fn from_config(config: &PluginConfig) -> Result<Self> {
        let catalogue = config.load_catalogue()?;
        let parser = LexicalParser::new(config.parser.clone());
        Ok(Self::new(
            config.name.clone(),
            config.kind,
            Arc::new(catalogue),
            Arc::new(parser),
        ))
    }

    pub fn kind(&self) -> BuilderKind {
        self.kind
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Quantities found in `query`, in scan order
    pub fn detect(&self, query: &str) -> Vec<QuantityOccurrence<'_>> {
        Scanner::new(&self.catalogue).scan(query)
    }

    /// The expression this detector hands to the host parser for `query`
    pub fn synthesize(&self, query: &str) -> String {
        let occurrences = self.detect(query);
        match self.kind {
            BuilderKind::Boost => dispatch(self.boost_builder(), &occurrences).product(),
            BuilderKind::Filter => dispatch(self.filter_builder(), &occurrences).product(),
        }
    }

    fn boost_builder(&self) -> BoostQueryBuilder<'_> {
        BoostQueryBuilder::new(&self.catalogue, self.parser.as_ref())
    }

    fn filter_builder(&self) -> FilterQueryBuilder<'_> {
        FilterQueryBuilder::new(&self.catalogue, self.parser.as_ref())
    }
}

/// Feed occurrences to the builder in scan order
fn dispatch<'a, B: QueryBuilder<'a>>(mut builder: B, occurrences: &[QuantityOccurrence<'a>]) -> B {
    for occurrence in occurrences {
        builder.new_quantity_detected(occurrence.unit(), occurrence);
    }
    builder
}

/// Finish the builder and parse its product
fn parse_product<'a, B: QueryBuilder<'a>>(
    builder: B,
    request: &QueryRequest,
    occurrences: usize,
) -> Result<Box<dyn QueryNode>> {
    let parser = builder.host_parser();
    let expression = builder.product();
    debug!(
        "Detected {} quantities in '{}', synthesized '{}'",
        occurrences,
        request.query(),
        expression
    );
    HostParserBridge::new(parser).parse(&expression, request)
}

impl HostParser for QuantityDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, input: &str, request: &QueryRequest) -> Result<Box<dyn QueryNode>> {
        let occurrences = self.detect(input);
        let count = occurrences.len();
        match self.kind {
            BuilderKind::Boost => {
                parse_product(dispatch(self.boost_builder(), &occurrences), request, count)
            }
            BuilderKind::Filter => {
                parse_product(dispatch(self.filter_builder(), &occurrences), request, count)
            }
        }
    }
}

impl std::fmt::Debug for QuantityDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantityDetector")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("fields", &self.catalogue.fields().len())
            .field("parser", &self.parser.name())
            .finish()
    }
}
