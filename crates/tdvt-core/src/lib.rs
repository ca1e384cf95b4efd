//! Field catalogs and literal formatting rules for datasource test generation.
//!
//! Two pieces of vocabulary shared by expression generators:
//! - [`catalog`]: named, ordered lists of `[field]` identifiers for the
//!   `calcs` and `staples` test datasources.
//! - [`literal`]: how a literal of each logical type is marked when embedded
//!   in expression text.
//!
//! Everything is immutable once built; the built-in tables are process-wide
//! statics safe to share across threads.

pub mod catalog;
pub mod enums;
pub mod error;
pub mod field;
pub mod literal;

pub use catalog::{CatalogRegistry, FieldCatalog, builtin_registry, get_catalog};
pub use enums::DataType;
pub use error::CatalogError;
pub use field::FieldRef;
pub use literal::{Literal, LiteralFormatter, LiteralRule, Placement, format_literal};
