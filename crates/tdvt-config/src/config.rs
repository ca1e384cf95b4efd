//! Configuration types and loading for tdvt.
//!
//! The main entry point is [`TdvtConfig`], which extends the built-in field
//! catalogs and literal rules. Configuration is loaded with [`load_config`]
//! and saved with [`save_config`].
//!
//! Layers, lowest priority first:
//! 1. built-in defaults (no extra catalogs, no rule overrides)
//! 2. the config file (`.yaml`/`.yml` or `.toml`), if it exists
//! 3. `TDVT_`-prefixed environment variables, `__` separating nested keys
//!    (e.g. `TDVT_LITERALS__STRING__MARKER="'"`)

use std::collections::BTreeMap;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use tdvt_core::{CatalogError, CatalogRegistry, DataType, LiteralFormatter, LiteralRule};
use thiserror::Error;
use tracing::{debug, info};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "TDVT_";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The layered configuration could not be read or extracted.
    #[error("failed to load configuration: {0}")]
    Figment(#[from] figment::Error),

    /// The configuration file could not be written.
    #[error("failed to write config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// A configured catalog broke a catalog invariant.
    #[error("invalid catalog configuration: {0}")]
    Catalog(#[from] CatalogError),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full tdvt configuration.
///
/// All fields use `serde` defaults so that a partially-specified file
/// deserializes with sensible default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TdvtConfig {
    /// Extra catalogs keyed by name; a built-in name replaces that catalog.
    #[serde(default)]
    pub catalogs: BTreeMap<String, Vec<String>>,

    /// Literal rule overrides keyed by type tag.
    #[serde(default)]
    pub literals: BTreeMap<String, LiteralRule>,
}

impl TdvtConfig {
    /// The built-in catalogs extended with the configured ones.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Catalog`] if a configured catalog has an
    /// unbracketed or repeated field identifier.
    pub fn registry(&self) -> Result<CatalogRegistry> {
        let mut registry = CatalogRegistry::builtin();
        for (name, fields) in &self.catalogs {
            registry.insert(name.as_str(), fields.iter().map(String::as_str))?;
        }
        Ok(registry)
    }

    /// The built-in literal rules with the configured overrides applied.
    pub fn formatter(&self) -> LiteralFormatter {
        let mut formatter = LiteralFormatter::builtin();
        for (tag, rule) in &self.literals {
            formatter.set_rule(DataType::from(tag.as_str()), rule.clone());
        }
        formatter
    }

    /// Returns `true` if nothing differs from the built-in vocabulary.
    pub fn is_default(&self) -> bool {
        self.catalogs.is_empty() && self.literals.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Builds the layered [`Figment`] for `path` without extracting it.
///
/// A missing file contributes nothing. Files ending in `.toml` are read as
/// TOML, anything else as YAML.
pub fn figment(path: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(TdvtConfig::default()));

    if let Some(path) = path {
        debug!(path = %path.display(), "adding config file layer");
        figment = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => figment.merge(Toml::file(path)),
            _ => figment.merge(Yaml::file(path)),
        };
    }

    figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Loads configuration from the optional file at `path` plus environment
/// overrides.
///
/// If no file is given, or the file does not exist, only defaults and
/// environment variables apply.
///
/// # Errors
///
/// Returns [`ConfigError::Figment`] if the file cannot be parsed or a value
/// has the wrong shape.
pub fn load_config(path: Option<&Path>) -> Result<TdvtConfig> {
    let config: TdvtConfig = figment(path).extract()?;
    info!(
        catalogs = config.catalogs.len(),
        literals = config.literals.len(),
        "loaded tdvt configuration"
    );
    Ok(config)
}

/// Saves configuration as YAML to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] on I/O failure or [`ConfigError::Serialize`]
/// if serialization fails.
pub fn save_config(path: &Path, config: &TdvtConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tdvt_core::{Placement, format_literal};

    // Tests that call `load_config` run inside a `Jail`, which starts from an
    // empty environment and restores it afterwards.

    #[test]
    fn test_default_config() {
        let cfg = TdvtConfig::default();
        assert!(cfg.is_default());
        assert_eq!(cfg.registry().unwrap().len(), 2);
        assert_eq!(cfg.formatter(), LiteralFormatter::builtin());
    }

    #[test]
    fn test_load_missing_config_returns_default() {
        Jail::expect_with(|_jail| {
            let path = PathBuf::from("/nonexistent/path/tdvt.yaml");
            let cfg = load_config(Some(&path)).unwrap();
            assert!(cfg.is_default());
            Ok(())
        });
    }

    #[test]
    fn test_load_yaml_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "tdvt.yaml",
                r##"
catalogs:
  orders: ["[Order ID]", "[Order Date]"]
literals:
  string:
    marker: "'"
  timestamp:
    marker: "#"
    placement: prefix
"##,
            )?;

            let cfg = load_config(Some(Path::new("tdvt.yaml"))).unwrap();
            let registry = cfg.registry().unwrap();
            let names: Vec<&str> = registry.names().collect();
            assert_eq!(names, vec!["calcs", "orders", "staples"]);
            assert_eq!(registry.get("orders").unwrap().len(), 2);

            let formatter = cfg.formatter();
            assert_eq!(formatter.format(&DataType::String, "abc"), "'abc'");
            assert_eq!(
                formatter.format(&DataType::from("timestamp"), "2020-01-01"),
                "#2020-01-01"
            );
            assert_eq!(formatter.format(&DataType::Date, "2020-01-01"), "#2020-01-01");
            // Built-in tables are untouched by configuration.
            assert_eq!(format_literal("string", "abc"), "&quot;abc&quot;");
            Ok(())
        });
    }

    #[test]
    fn test_load_toml_config() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "tdvt.toml",
                r#"
[catalogs]
tiny = ["[a]"]

[literals.date]
marker = "@"
placement = "prefix"
"#,
            )?;

            let cfg = load_config(Some(Path::new("tdvt.toml"))).unwrap();
            assert_eq!(cfg.catalogs["tiny"], vec!["[a]".to_string()]);
            assert_eq!(cfg.literals["date"].placement, Placement::Prefix);
            assert_eq!(cfg.formatter().format(&DataType::Date, "d"), "@d");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "tdvt.yaml",
                r#"
literals:
  string:
    marker: "@"
"#,
            )?;
            jail.set_env("TDVT_LITERALS__STRING__MARKER", "'");
            jail.set_env("TDVT_CATALOGS__ORDERS", r#"["[Order ID]"]"#);

            let cfg = load_config(Some(Path::new("tdvt.yaml"))).unwrap();
            assert_eq!(cfg.literals["string"], LiteralRule::wrap("'"));
            assert_eq!(cfg.formatter().format(&DataType::String, "a"), "'a'");

            let registry = cfg.registry().unwrap();
            let names: Vec<&str> = registry.names().collect();
            assert_eq!(names, vec!["calcs", "orders", "staples"]);
            assert_eq!(
                registry.get("orders").unwrap().fields(),
                &["[Order ID]".to_string()]
            );
            Ok(())
        });
    }

    #[test]
    fn test_env_without_file() {
        Jail::expect_with(|jail| {
            jail.set_env("TDVT_LITERALS__DATE__MARKER", "@");
            jail.set_env("TDVT_LITERALS__DATE__PLACEMENT", "prefix");

            let cfg = load_config(None).unwrap();
            assert!(cfg.catalogs.is_empty());
            assert_eq!(cfg.formatter().format(&DataType::Date, "d"), "@d");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let mut cfg = TdvtConfig::default();
        cfg.catalogs
            .insert("broken".into(), vec!["[a]".into(), "b".into()]);
        let err = cfg.registry().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Catalog(CatalogError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("tdvt.yaml", "catalogs: 42\n")?;
            let err = load_config(Some(Path::new("tdvt.yaml"))).unwrap_err();
            assert!(matches!(err, ConfigError::Figment(_)));
            Ok(())
        });
    }

    #[test]
    fn test_roundtrip_config() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested").join("tdvt.yaml");

            let mut cfg = TdvtConfig::default();
            cfg.catalogs
                .insert("orders".into(), vec!["[Order ID]".into()]);
            cfg.literals
                .insert("string".into(), LiteralRule::wrap("'"));

            save_config(&path, &cfg).unwrap();
            let loaded = load_config(Some(&path)).unwrap();
            assert_eq!(loaded, cfg);
            Ok(())
        });
    }
}
