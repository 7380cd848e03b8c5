//! Lucene-style query string parser
//!
//! This is the host engine's default lexical parser. It understands the
//! syntax quantity detection emits and the usual extras:
//! - `size:42^2.0` (boosted term)
//! - `capacity:[90 TO 110]`, `capacity:{90 TO *}` (ranges)
//! - `*:*` (match all)
//! - `size:42 AND NOT capacity:5`, `+size:42 -capacity:5`, grouping
//!
//! # Example
//!
//! ```rust
//! use qty_qparser::query::query_string::QueryStringParser;
//!
//! let mut parser = QueryStringParser::new("size:42^2.0 size:[41 TO 43] ").unwrap();
//! let query = parser.parse().unwrap();
//! assert_eq!(query.query_type(), "bool");
//! ```

mod lexical;
pub mod lexer;
pub mod parser;

pub use lexer::{Lexer, Token};
pub use lexical::{LexicalParser, LEXICAL_PARSER_NAME};
pub use parser::QueryStringParser;
