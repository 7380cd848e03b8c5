//! Named query parsers
//!
//! The host engine looks parsers up by name. The lexical parser is always
//! available as `lucene`; quantity detectors are registered under the name
//! from their configuration.

use crate::config::PluginConfig;
use crate::detection::QuantityDetector;
use crate::error::QtyError;
use crate::models::QueryRequest;
use crate::query::query_string::{LexicalParser, LEXICAL_PARSER_NAME};
use crate::query::QueryNode;
use crate::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// A query parser the host engine can invoke
pub trait HostParser: Send + Sync {
    /// Name the parser is registered under
    fn name(&self) -> &str;

    /// Parse `input` in the context of `request`
    fn parse(&self, input: &str, request: &QueryRequest) -> Result<Box<dyn QueryNode>>;

    /// Parse the request's own query string
    fn parse_request(&self, request: &QueryRequest) -> Result<Box<dyn QueryNode>> {
        self.parse(request.query(), request)
    }
}

/// Registry of query parsers by name
#[derive(Default)]
pub struct ParserRegistry {
    parsers: RwLock<HashMap<String, Arc<dyn HostParser>>>,
}

impl ParserRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the default lexical parser
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.parsers.write().insert(
            LEXICAL_PARSER_NAME.to_string(),
            Arc::new(LexicalParser::default()),
        );
        registry
    }

    /// Register a parser; names are unique
    pub fn register(&self, parser: Arc<dyn HostParser>) -> Result<()> {
        let mut parsers = self.parsers.write();
        let name = parser.name().to_string();
        if parsers.contains_key(&name) {
            return Err(QtyError::config(format!(
                "Query parser '{}' is already registered",
                name
            )));
        }
        info!("Registered query parser '{}'", name);
        parsers.insert(name, parser);
        Ok(())
    }

    /// Build a quantity detector from `config` and register it
    ///
    /// A configuration error leaves the registry unchanged.
    pub fn register_detector(&self, config: &PluginConfig) -> Result<Arc<QuantityDetector>> {
        let detector = Arc::new(QuantityDetector::from_config(config)?);
        self.register(detector.clone())?;
        Ok(detector)
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn HostParser>> {
        self.parsers
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| QtyError::UnknownParser(name.to_string()))
    }

    /// Parse a request with the named parser
    pub fn parse(&self, name: &str, request: &QueryRequest) -> Result<Box<dyn QueryNode>> {
        self.get(name)?.parse_request(request)
    }

    /// Registered parser names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.parsers.read().keys().cloned().collect();
        names.sort();
        names
    }
}
