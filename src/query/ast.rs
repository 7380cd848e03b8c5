//! Abstract Syntax Tree for query representation
//!
//! This module defines the core `QueryNode` trait that every executable
//! query implements. The query string parser produces a tree of these
//! nodes; the executor runs the tree against a `QueryContext`.

use crate::Result;
use roaring::RoaringBitmap;
use std::fmt::Debug;

use super::context::QueryContext;

/// Core trait for all query nodes in the AST
pub trait QueryNode: Send + Sync + Debug {
    /// Execute the query and return matching document numbers as a bitmap
    ///
    /// Document numbers are dense positions in the context; the caller
    /// maps them back to external document IDs.
    fn execute(&self, ctx: &QueryContext) -> Result<RoaringBitmap>;

    /// Get the query type name for debugging and logging
    fn query_type(&self) -> &'static str;

    /// Whether this query produces scores (vs just filtering)
    fn is_scoring(&self) -> bool {
        true
    }

    /// Get the boost factor for this query
    fn boost(&self) -> f32 {
        1.0
    }

    /// Score contribution for a document
    ///
    /// Returns None if the document doesn't match this node.
    fn score(&self, _ctx: &QueryContext, _docno: u32) -> Option<f32> {
        None
    }

    /// Clone this query node into a boxed trait object
    fn clone_box(&self) -> Box<dyn QueryNode>;
}

impl Clone for Box<dyn QueryNode> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
