//! Host query engine
//!
//! A small numeric search engine that quantity detection plugs into:
//! - `query_string`: the default lexical parser
//! - `nodes`: term, range, boolean and match-all queries
//! - `context`: in-memory numeric doc values the queries run against
//! - `executor`: top-k scoring

pub mod ast;
pub mod context;
pub mod executor;
pub mod nodes;
pub mod query_string;
pub mod types;

pub use ast::QueryNode;
pub use context::{QueryContext, QueryContextBuilder};
pub use executor::{QueryExecutor, QueryResult};
pub use nodes::{AllDocsQuery, BoolQuery, RangeQuery, TermQuery};
pub use types::*;
