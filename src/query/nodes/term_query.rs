//! Term query - exact match on a field

use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::Result;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

/// Query that matches documents whose field holds exactly the given value
///
/// Fields are numeric doc values, so the term is read as a number. A term
/// that is not a number matches nothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TermQuery {
    /// Field to search in
    pub field: String,
    /// Exact term to match
    pub term: String,
    /// Boost factor for scoring
    #[serde(default = "default_boost")]
    pub boost: f32,
}

fn default_boost() -> f32 {
    1.0
}

impl TermQuery {
    /// Create a new term query
    pub fn new(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
            boost: 1.0,
        }
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Get the cache key for this term
    pub fn cache_key(&self) -> String {
        format!("term:{}:{}", self.field, self.term)
    }

    /// The term as a number, if it is one
    pub fn numeric_value(&self) -> Option<f64> {
        self.term.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl QueryNode for TermQuery {
    fn execute(&self, ctx: &QueryContext) -> Result<RoaringBitmap> {
        let Some(target) = self.numeric_value() else {
            return Ok(RoaringBitmap::new());
        };
        ctx.get_or_cache_filter(&self.cache_key(), || {
            Ok(ctx.matching_docs(&self.field, |v| v == target))
        })
    }

    fn query_type(&self) -> &'static str {
        "term"
    }

    fn is_scoring(&self) -> bool {
        true
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn score(&self, ctx: &QueryContext, docno: u32) -> Option<f32> {
        let target = self.numeric_value()?;
        match ctx.value(&self.field, docno) {
            Some(v) if v == target && !ctx.is_tombstoned(docno) => Some(self.boost),
            _ => None,
        }
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_context() -> QueryContext {
        QueryContext::builder()
            .document(1, [("capacity", 100.0)])
            .document(2, [("capacity", 128.0)])
            .document(3, [("size", 100.0)])
            .build()
    }

    #[test]
    fn test_term_query_creation() {
        let query = TermQuery::new("capacity", "100");
        assert_eq!(query.field, "capacity");
        assert_eq!(query.term, "100");
        assert_eq!(query.boost, 1.0);
    }

    #[test]
    fn test_term_query_with_boost() {
        let query = TermQuery::new("size", "42").with_boost(2.0);
        assert_eq!(query.boost(), 2.0);
    }

    #[test]
    fn test_term_query_cache_key() {
        let query = TermQuery::new("capacity", "100");
        assert_eq!(query.cache_key(), "term:capacity:100");
    }

    #[test]
    fn test_term_query_execute() {
        let ctx = create_test_context();
        let result = TermQuery::new("capacity", "100").execute(&ctx).unwrap();
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_non_numeric_term_matches_nothing() {
        let ctx = create_test_context();
        let result = TermQuery::new("capacity", "ssd").execute(&ctx).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_term_query_score() {
        let ctx = create_test_context();
        let query = TermQuery::new("capacity", "100").with_boost(1.5);
        assert_eq!(query.score(&ctx, 0), Some(1.5));
        assert_eq!(query.score(&ctx, 1), None);
        assert_eq!(query.query_type(), "term");
        assert!(query.is_scoring());
    }
}
