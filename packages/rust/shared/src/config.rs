//! Converter configuration for Juniper.
//!
//! User config lives at `~/.juniper/markup.toml`. Every table and field is
//! optional; anything missing falls back to the converter defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JuniperError, Result};
use crate::types::{SenseNumbering, StrongsFormat};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "markup.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".juniper";

// ---------------------------------------------------------------------------
// Config structs (matching markup.toml schema)
// ---------------------------------------------------------------------------

/// Top-level markup config, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkupConfig {
    /// OSIS converter settings.
    #[serde(default)]
    pub osis: OsisConfig,

    /// ThML converter settings.
    #[serde(default)]
    pub thml: ThmlConfig,

    /// GBF converter settings.
    #[serde(default)]
    pub gbf: GbfConfig,

    /// TEI converter settings.
    #[serde(default)]
    pub tei: TeiConfig,
}

/// `[osis]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsisConfig {
    /// Extract and render Strong's numbers.
    #[serde(default = "default_true")]
    pub preserve_strongs: bool,

    /// Extract morphology codes.
    #[serde(default)]
    pub preserve_morphology: bool,

    /// CSS class for words of Jesus.
    #[serde(default = "default_red_letter_class")]
    pub red_letter_class: String,

    #[serde(default)]
    pub strongs_format: StrongsFormat,
}

impl Default for OsisConfig {
    fn default() -> Self {
        Self {
            preserve_strongs: true,
            preserve_morphology: false,
            red_letter_class: default_red_letter_class(),
            strongs_format: StrongsFormat::default(),
        }
    }
}

fn default_red_letter_class() -> String {
    "red-letter".into()
}

/// `[thml]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThmlConfig {
    /// Collect `<scripRef passage>` values.
    #[serde(default = "default_true")]
    pub preserve_scrip_refs: bool,
}

impl Default for ThmlConfig {
    fn default() -> Self {
        Self {
            preserve_scrip_refs: true,
        }
    }
}

/// `[gbf]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GbfConfig {
    #[serde(default = "default_true")]
    pub preserve_strongs: bool,

    #[serde(default)]
    pub preserve_morphology: bool,
}

impl Default for GbfConfig {
    fn default() -> Self {
        Self {
            preserve_strongs: true,
            preserve_morphology: false,
        }
    }
}

/// `[tei]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeiConfig {
    /// Extract and render `<etym>`.
    #[serde(default = "default_true")]
    pub include_etymology: bool,

    /// Render part of speech, gender and number.
    #[serde(default = "default_true")]
    pub include_grammar: bool,

    #[serde(default)]
    pub sense_numbering: SenseNumbering,
}

impl Default for TeiConfig {
    fn default() -> Self {
        Self {
            include_etymology: true,
            include_grammar: true,
            sense_numbering: SenseNumbering::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.juniper/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| JuniperError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.juniper/markup.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the markup config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<MarkupConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(MarkupConfig::default());
    }

    load_config_from(&path)
}

/// Load the markup config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<MarkupConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| JuniperError::io(path, e))?;

    let config: MarkupConfig = toml::from_str(&content).map_err(|e| {
        JuniperError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    tracing::info!(?path, "loaded markup config");

    Ok(config)
}

/// Parse a markup config from TOML text.
pub fn parse_config(content: &str) -> Result<MarkupConfig> {
    toml::from_str(content).map_err(|e| JuniperError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = MarkupConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("red_letter_class"));
        assert!(toml_str.contains("strongs_format = \"superscript\""));
        assert!(toml_str.contains("sense_numbering = \"legacy-digit\""));
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").expect("empty config");
        assert_eq!(config, MarkupConfig::default());
        assert!(config.osis.preserve_strongs);
        assert!(!config.gbf.preserve_morphology);
        assert!(config.tei.include_etymology);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = parse_config(
            r#"
[osis]
strongs_format = "inline"
preserve_morphology = true

[tei]
include_etymology = false
sense_numbering = "decimal"
"#,
        )
        .expect("parse");

        assert_eq!(config.osis.strongs_format, StrongsFormat::Inline);
        assert!(config.osis.preserve_morphology);
        assert!(config.osis.preserve_strongs);
        assert_eq!(config.osis.red_letter_class, "red-letter");
        assert!(!config.tei.include_etymology);
        assert!(config.tei.include_grammar);
        assert_eq!(config.tei.sense_numbering, SenseNumbering::Decimal);
        assert!(config.thml.preserve_scrip_refs);
    }

    #[test]
    fn unknown_strongs_format_is_config_error() {
        let err = parse_config("[osis]\nstrongs_format = \"footnote\"\n").unwrap_err();
        assert!(matches!(err, JuniperError::Config { .. }));
    }

    #[test]
    fn load_config_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[gbf]\npreserve_strongs = false\n").expect("write");

        let config = load_config_from(&path).expect("load");
        assert!(!config.gbf.preserve_strongs);
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, JuniperError::Io { .. }));
    }

    #[test]
    fn load_config_from_malformed_file_names_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[osis\n").expect("write");

        let msg = load_config_from(&path).unwrap_err().to_string();
        assert!(msg.starts_with("config error: failed to parse"));
        assert!(msg.contains(CONFIG_FILE_NAME));
        assert_eq!(msg.matches("config error").count(), 1);
    }

    #[test]
    fn config_roundtrip() {
        let config = MarkupConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: MarkupConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed, config);
    }
}
