//! Boolean query - combines multiple clauses with AND, OR, NOT semantics

use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::Result;
use roaring::RoaringBitmap;

/// Boolean query combining multiple clauses
///
/// - `must`: All clauses must match (AND). Contributes to score.
/// - `should`: At least one clause should match (OR). Contributes to score.
///   When `must` clauses are present, `should` only adds score.
/// - `must_not`: No clause must match (NOT). Does not contribute to score.
#[derive(Clone, Debug, Default)]
pub struct BoolQuery {
    /// Clauses that must match (AND, scoring)
    pub must: Vec<Box<dyn QueryNode>>,
    /// Clauses where at least one should match (OR, scoring)
    pub should: Vec<Box<dyn QueryNode>>,
    /// Clauses that must not match (NOT, no scoring)
    pub must_not: Vec<Box<dyn QueryNode>>,
}

impl BoolQuery {
    /// Create a new empty boolean query
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this is an empty query
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    fn should_matches(&self, ctx: &QueryContext) -> Result<RoaringBitmap> {
        let mut union = RoaringBitmap::new();
        for query in &self.should {
            union |= query.execute(ctx)?;
        }
        Ok(union)
    }
}

impl QueryNode for BoolQuery {
    fn execute(&self, ctx: &QueryContext) -> Result<RoaringBitmap> {
        // Empty bool query matches all documents
        if self.is_empty() {
            return Ok(ctx.live_docs());
        }

        let mut result: Option<RoaringBitmap> = None;

        for query in &self.must {
            let matches = query.execute(ctx)?;
            let narrowed = match result {
                Some(r) => r & matches,
                None => matches,
            };
            if narrowed.is_empty() {
                return Ok(RoaringBitmap::new());
            }
            result = Some(narrowed);
        }

        if !self.should.is_empty() && result.is_none() {
            result = Some(self.should_matches(ctx)?);
        }

        // Pure negation matches everything not excluded
        let mut result = result.unwrap_or_else(|| ctx.live_docs());
        for query in &self.must_not {
            result -= query.execute(ctx)?;
        }

        result -= ctx.tombstones();
        Ok(result)
    }

    fn query_type(&self) -> &'static str {
        "bool"
    }

    fn is_scoring(&self) -> bool {
        self.must.iter().any(|q| q.is_scoring()) || self.should.iter().any(|q| q.is_scoring())
    }

    fn score(&self, ctx: &QueryContext, docno: u32) -> Option<f32> {
        let total: f32 = self
            .must
            .iter()
            .chain(self.should.iter())
            .filter_map(|q| q.score(ctx, docno))
            .sum();

        (total > 0.0).then_some(total)
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}
