pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod plugin;
pub mod query;
pub mod units;

pub use config::{CatalogueSource, ParserSettings, PluginConfig};
pub use detection::{BuilderKind, QuantityDetector, QuantityOccurrence, Scanner};
pub use error::{QtyError, Result};
pub use models::*;
pub use plugin::{HostParser, ParserRegistry};
pub use units::{Boost, Catalogue, Field, Gap, Unit};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
