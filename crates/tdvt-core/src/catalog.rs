//! Field catalogs: named, ordered lists of field identifiers.
//!
//! The built-in registry holds the `calcs` and `staples` test datasources.
//! Lookups go through [`CatalogRegistry`] so a new catalog is a data change
//! ([`CatalogRegistry::insert`] or the `catalogs` config section), never a new
//! branch at the call site.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use tracing::{debug, warn};

use crate::error::{CatalogError, Result};
use crate::field::FieldRef;

/// Name of the `calcs` test datasource catalog.
pub const CALCS: &str = "calcs";

/// Name of the `staples` test datasource catalog.
pub const STAPLES: &str = "staples";

/// Fields of the `calcs` test datasource, in generation order.
pub const CALCS_FIELDS: &[&str] = &[
    "[key]",
    "[num0]",
    "[num1]",
    "[num2]",
    "[num3]",
    "[num4]",
    "[str0]",
    "[str1]",
    "[str2]",
    "[str3]",
    "[int0]",
    "[int1]",
    "[int2]",
    "[int3]",
    "[bool0]",
    "[bool1]",
    "[bool2]",
    "[bool3]",
    "[bool0_]",
    "[bool1_]",
    "[bool2_]",
    "[bool3_]",
    "[date0]",
    "[date1]",
    "[date2]",
    "[date3]",
    "[time0]",
    "[time1]",
    "[datetime0]",
    "[datetime1]",
    "[zzz]",
];

/// Fields of the `staples` test datasource, in generation order.
pub const STAPLES_FIELDS: &[&str] = &[
    "[Item Count]",
    "[Ship Priority]",
    "[Order Priority]",
    "[Order Status]",
    "[Order Quantity]",
    "[Sales Total]",
    "[Discount]",
    "[Tax Rate]",
    "[Ship Mode]",
    "[Fill Time]",
    "[Gross Profit]",
    "[Price]",
    "[Ship Handle Cost]",
    "[Employee Name]",
    "[Employee Dept]",
    "[Manager Name]",
    "[Employee Yrs Exp]",
    "[Employee Salary]",
    "[Customer Name]",
    "[Customer State]",
    "[Call Center Region]",
    "[Customer Balance]",
    "[Customer Segment]",
    "[Prod Type1]",
    "[Prod Type2]",
    "[Prod Type3]",
    "[Prod Type4]",
    "[Product Name]",
    "[Product Container]",
    "[Ship Promo]",
    "[Supplier Name]",
    "[Supplier Balance]",
    "[Supplier Region]",
    "[Supplier State]",
    "[Order ID]",
    "[Order Year]",
    "[Order Month]",
    "[Order Day]",
    "[Order Date]",
    "[Order Quarter]",
    "[Product Base Margin]",
    "[Product ID]",
    "[Receive Time]",
    "[Received Date]",
    "[Ship Date]",
    "[Ship Charge]",
    "[Total Cycle Time]",
    "[Product In Stock]",
    "[PID]",
    "[Market Segment]",
];

static BUILTIN_REGISTRY: LazyLock<CatalogRegistry> = LazyLock::new(CatalogRegistry::builtin);

// ---------------------------------------------------------------------------
// FieldCatalog
// ---------------------------------------------------------------------------

/// A named, ordered, duplicate-free sequence of field identifiers.
///
/// Order is significant: generators enumerate fields in this order, e.g.
/// when naming generated test files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    name: String,
    fields: Vec<String>,
}

impl FieldCatalog {
    /// Builds a catalog, checking that every identifier is `[name]` shaped
    /// and appears only once.
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();

        let mut seen = HashSet::with_capacity(fields.len());
        for field in &fields {
            if FieldRef::parse(field).is_none() {
                return Err(CatalogError::invalid_field(name, field.as_str()));
            }
            if !seen.insert(field.as_str()) {
                return Err(CatalogError::DuplicateField {
                    catalog: name,
                    field: field.clone(),
                });
            }
        }

        Ok(Self { name, fields })
    }

    /// The catalog name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field identifiers, brackets included.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Bare field names in catalog order: `[Order ID]` -> `Order ID`.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields
            .iter()
            .filter_map(|f| FieldRef::parse(f))
            .map(|f| f.name())
    }

    /// Returns `true` if `ident` (brackets included) is in this catalog.
    pub fn contains(&self, ident: &str) -> bool {
        self.fields.iter().any(|f| f == ident)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the catalog has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CatalogRegistry
// ---------------------------------------------------------------------------

/// Lookup table from catalog name to [`FieldCatalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: BTreeMap<String, FieldCatalog>,
}

impl CatalogRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the `calcs` and `staples` catalogs.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, fields) in [(CALCS, CALCS_FIELDS), (STAPLES, STAPLES_FIELDS)] {
            let catalog = FieldCatalog {
                name: name.to_string(),
                fields: fields.iter().map(|f| f.to_string()).collect(),
            };
            registry.catalogs.insert(name.to_string(), catalog);
        }
        registry
    }

    /// Validates and registers a catalog, replacing any catalog of the same
    /// name.
    pub fn insert<I, S>(&mut self, name: impl Into<String>, fields: I) -> Result<&FieldCatalog>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let catalog = FieldCatalog::new(name, fields)?;
        let name = catalog.name.clone();
        debug!(catalog = %name, fields = catalog.len(), "registering field catalog");
        self.catalogs.insert(name.clone(), catalog);
        Ok(&self.catalogs[&name])
    }

    /// Looks up a catalog by name.
    pub fn get(&self, name: &str) -> Result<&FieldCatalog> {
        self.catalogs.get(name).ok_or_else(|| {
            warn!(catalog = name, "unknown field catalog requested");
            CatalogError::unknown_catalog(name, self.names())
        })
    }

    /// Registered catalog names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.catalogs.keys().map(String::as_str)
    }

    /// Registered catalogs, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &FieldCatalog> + '_ {
        self.catalogs.values()
    }

    /// Number of registered catalogs.
    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    /// Returns `true` if no catalog is registered.
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }
}

/// The process-wide built-in registry.
pub fn builtin_registry() -> &'static CatalogRegistry {
    &BUILTIN_REGISTRY
}

/// Returns the ordered field identifiers of a built-in catalog.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownCatalog`] if `name` is not a built-in
/// catalog.
pub fn get_catalog(name: &str) -> Result<&'static [String]> {
    builtin_registry().get(name).map(FieldCatalog::fields)
}
