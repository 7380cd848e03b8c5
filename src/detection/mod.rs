//! Quantity detection
//!
//! Turns a free-text query such as `42 inch tv` into a structured
//! expression over numeric fields:
//!
//! ```text
//! "42 inch tv"  --scan-->  [size = 42 inch]  --build-->  "size:42^2.0 size:[41 TO 43] "
//! ```
//!
//! The expression is then parsed by the host lexical parser. A query with
//! no recognised quantity becomes `*:*`.

pub mod bridge;
pub mod builder;
pub mod detector;
pub mod occurrence;
pub mod scanner;

pub use bridge::HostParserBridge;
pub use builder::{BoostQueryBuilder, BuilderKind, FilterQueryBuilder, QueryBuilder, MATCH_ALL};
pub use detector::QuantityDetector;
pub use occurrence::QuantityOccurrence;
pub use scanner::Scanner;
