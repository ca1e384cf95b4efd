//! Configuration management for tdvt.
//!
//! This crate layers a config file and `TDVT_` environment variables over
//! the built-in field catalogs and literal rules of `tdvt-core`.

pub mod config;

pub use config::{ConfigError, TdvtConfig, load_config, save_config};
