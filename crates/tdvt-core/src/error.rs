//! Catalog error types.

use crate::field::suggest_ident;

/// Errors that can occur while looking up or registering field catalogs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The requested catalog is not registered.
    #[error("unknown catalog '{name}' (known: {})", .known.join(", "))]
    UnknownCatalog {
        /// The catalog name that was looked up.
        name: String,
        /// Names of the catalogs that are registered.
        known: Vec<String>,
    },

    /// A field identifier is empty or not wrapped in `[`...`]`.
    #[error(
        "catalog '{catalog}': invalid field identifier '{field}'{}",
        did_you_mean(.suggestion)
    )]
    InvalidField {
        /// The catalog being registered.
        catalog: String,
        /// The offending identifier.
        field: String,
        /// The bracketed form of the identifier, when it has a usable name.
        suggestion: Option<String>,
    },

    /// A field identifier appears more than once in one catalog.
    #[error("catalog '{catalog}': duplicate field identifier '{field}'")]
    DuplicateField {
        /// The catalog being registered.
        catalog: String,
        /// The repeated identifier.
        field: String,
    },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Convenience alias used throughout the core crate.
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Creates a [`CatalogError::UnknownCatalog`] for `name`.
    pub fn unknown_catalog<I, S>(name: impl Into<String>, known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UnknownCatalog {
            name: name.into(),
            known: known.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a [`CatalogError::InvalidField`], suggesting the bracketed
    /// form of `field` when it has a non-empty name.
    pub fn invalid_field(catalog: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self::InvalidField {
            catalog: catalog.into(),
            suggestion: suggest_ident(&field),
            field,
        }
    }

    /// Returns `true` if this is a [`CatalogError::UnknownCatalog`].
    pub fn is_unknown_catalog(&self) -> bool {
        matches!(self, Self::UnknownCatalog { .. })
    }
}
