//! Unit catalogue
//!
//! The catalogue lists the numeric fields a query can be boosted on and,
//! for each field, the units whose quantities map onto it:
//!
//! ```json
//! {
//!   "fields": [
//!     { "name": "capacity", "gap": 10,
//!       "units": [ { "name": "gb", "variants": ["gb", "gigabyte"] } ] },
//!     { "name": "size",
//!       "units": [ { "name": "inch", "variants": ["inch", "\""], "boost": 2.0 } ] }
//!   ]
//! }
//! ```

mod catalogue;
mod unit;

pub(crate) use catalogue::VariantEntry;
pub use catalogue::{Catalogue, CatalogueBuilder, Field};
pub use unit::{Boost, Gap, Unit};
