//! Range query - matches documents with field values in a range

use crate::query::ast::QueryNode;
use crate::query::context::QueryContext;
use crate::query::types::RangeBounds;
use crate::Result;
use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

/// Query that matches documents with numeric field values within a range
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RangeQuery {
    /// Field to search in
    pub field: String,
    /// Range bounds (gte, gt, lte, lt)
    #[serde(flatten)]
    pub bounds: RangeBounds,
}

impl RangeQuery {
    /// Create a new, unbounded range query
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            bounds: RangeBounds {
                boost: 1.0,
                ..Default::default()
            },
        }
    }

    /// Set the bounds from a RangeBounds struct
    pub fn with_bounds(mut self, bounds: RangeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set the boost factor
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.bounds.boost = boost;
        self
    }

    /// Get the cache key for this query
    pub fn cache_key(&self) -> String {
        format!(
            "range:{}:gte={:?}:gt={:?}:lte={:?}:lt={:?}",
            self.field, self.bounds.gte, self.bounds.gt, self.bounds.lte, self.bounds.lt
        )
    }
}

impl QueryNode for RangeQuery {
    fn execute(&self, ctx: &QueryContext) -> Result<RoaringBitmap> {
        ctx.get_or_cache_filter(&self.cache_key(), || {
            Ok(ctx.matching_docs(&self.field, |v| self.bounds.contains(v)))
        })
    }

    fn query_type(&self) -> &'static str {
        "range"
    }

    fn is_scoring(&self) -> bool {
        // Range queries only determine which documents match
        false
    }

    fn boost(&self) -> f32 {
        self.bounds.boost
    }

    fn score(&self, ctx: &QueryContext, docno: u32) -> Option<f32> {
        match ctx.value(&self.field, docno) {
            Some(v) if self.bounds.contains(v) && !ctx.is_tombstoned(docno) => {
                Some(self.bounds.boost)
            }
            _ => None,
        }
    }

    fn clone_box(&self) -> Box<dyn QueryNode> {
        Box::new(self.clone())
    }
}
