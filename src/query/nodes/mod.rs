//! Concrete query node implementations
//!
//! This module provides implementations of the `QueryNode` trait for
//! the query types the query string parser produces.

mod all_docs;
mod bool_query;
mod range_query;
mod term_query;

pub use all_docs::AllDocsQuery;
pub use bool_query::BoolQuery;
pub use range_query::RangeQuery;
pub use term_query::TermQuery;
