//! All documents query - the `*:*` match-all

use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::Result;
use roaring::RoaringBitmap;

/// Query that matches all documents (excluding tombstones)
#[derive(Clone, Debug)]
pub struct AllDocsQuery {
    /// Boost factor for scoring
    pub boost: f32,
}

impl Default for AllDocsQuery {
    fn default() -> Self {
        Self { boost: 1.0 }
    }
}

impl AllDocsQuery {
    /// Create a new all docs query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }
}

impl QueryNode for AllDocsQuery {
    fn execute(&self, ctx: &QueryContext) -> Result<RoaringBitmap> {
        Ok(ctx.live_docs())
    }

    fn query_type(&self) -> &'static str {
        "all_docs"
    }

    fn is_scoring(&self) -> bool {
        false
    }

    fn boost(&self) -> f32 {
        self.boost
    }

    fn score(&self, ctx: &QueryContext, docno: u32) -> Option<f32> {
        (!ctx.is_tombstoned(docno)).then_some(self.boost)
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_docs_query() {
        let ctx = QueryContext::builder()
            .document(1, [("size", 42.0)])
            .document(2, [("size", 50.0)])
            .document(3, [("capacity", 64.0)])
            .delete(2)
            .build();

        let query = AllDocsQuery::new();
        let result = query.execute(&ctx).unwrap();

        assert_eq!(result.iter().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(query.query_type(), "all_docs");
        assert!(!query.is_scoring());
        assert_eq!(query.score(&ctx, 1), None);
    }

    #[test]
    fn test_all_docs_with_boost() {
        let query = AllDocsQuery::new().with_boost(2.0);
        assert_eq!(query.boost(), 2.0);
    }
}
