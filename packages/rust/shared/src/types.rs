//! Core domain types shared by the converters and their configuration.

use serde::{Deserialize, Serialize};

use crate::error::JuniperError;

// ---------------------------------------------------------------------------
// SourceType
// ---------------------------------------------------------------------------

/// The markup dialect a module declares through its `SourceType=` conf entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "OSIS")]
    Osis,
    #[serde(rename = "ThML")]
    Thml,
    #[serde(rename = "GBF")]
    Gbf,
    #[serde(rename = "TEI")]
    Tei,
    /// No markup at all. SWORD assumes this when the entry is missing.
    #[default]
    Plaintext,
}

impl SourceType {
    /// The spelling used in SWORD module `.conf` files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Osis => "OSIS",
            Self::Thml => "ThML",
            Self::Gbf => "GBF",
            Self::Tei => "TEI",
            Self::Plaintext => "Plaintext",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceType {
    type Err = JuniperError;

    /// Parse a conf value. Matching is case-insensitive and an empty value
    /// means plain text.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Ok(Self::Plaintext);
        }

        match value.to_ascii_lowercase().as_str() {
            "osis" => Ok(Self::Osis),
            "thml" => Ok(Self::Thml),
            "gbf" => Ok(Self::Gbf),
            "tei" => Ok(Self::Tei),
            "plaintext" | "plain" => Ok(Self::Plaintext),
            _ => Err(JuniperError::UnknownSourceType(value.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering options
// ---------------------------------------------------------------------------

/// How OSIS Strong's numbers are rendered next to the word they annotate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrongsFormat {
    Inline,
    /// `God^H430^`
    #[default]
    Superscript,
    Tooltip,
}

/// How TEI senses without an `n` attribute are numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SenseNumbering {
    /// One character offset from `'0'` per sense. Correct up to nine senses;
    /// the tenth renders as `:`, the eleventh as `;`, and so on.
    #[default]
    LegacyDigit,
    /// Plain decimal numbers of any width.
    Decimal,
}
