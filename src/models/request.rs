use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::query::MatchOperator;

/// Request parameter overriding the default field for unqualified terms
pub const DEFAULT_FIELD_PARAM: &str = "df";
/// Request parameter overriding the default operator (`AND` / `OR`)
pub const DEFAULT_OPERATOR_PARAM: &str = "q.op";

/// Request context a query parser is invoked with
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Raw query string
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Default field override, if the request carries one
    pub fn default_field(&self) -> Option<&str> {
        self.param(DEFAULT_FIELD_PARAM).filter(|f| !f.trim().is_empty())
    }

    /// Default operator override; unrecognised values are ignored
    pub fn default_operator(&self) -> Option<MatchOperator> {
        match self.param(DEFAULT_OPERATOR_PARAM)?.trim().to_uppercase().as_str() {
            "AND" => Some(MatchOperator::And),
            "OR" => Some(MatchOperator::Or),
            _ => None,
        }
    }
}
