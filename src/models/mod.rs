pub mod request;
pub mod search;

pub use request::{QueryRequest, DEFAULT_FIELD_PARAM, DEFAULT_OPERATOR_PARAM};
pub use search::{DocumentId, SearchResult};
