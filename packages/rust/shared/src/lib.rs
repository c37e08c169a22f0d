//! Shared types, error model, and configuration for Juniper.
//!
//! This crate is the foundation depended on by the markup converters.
//! It provides:
//! - [`JuniperError`]: the unified error type
//! - Domain types ([`SourceType`], [`StrongsFormat`], [`SenseNumbering`])
//! - Configuration ([`MarkupConfig`] and its per-dialect sections, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    GbfConfig, MarkupConfig, OsisConfig, TeiConfig, ThmlConfig, config_dir, config_file_path,
    load_config, load_config_from, parse_config,
};
pub use error::{JuniperError, Result};
pub use types::{SenseNumbering, SourceType, StrongsFormat};
