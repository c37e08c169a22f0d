//! Legacy Bible markup to Markdown.
//!
//! One converter per SWORD source dialect: [`OsisConverter`], [`ThmlConverter`],
//! [`GbfConverter`] and [`TeiConverter`]. Each turns a verse or entry into
//! Markdown and extracts the annotations it carries (Strong's numbers,
//! morphology codes, notes, references, dictionary metadata).
//!
//! Conversion never fails: malformed or unexpected markup degrades to
//! stripped text. Pick a converter directly, or dispatch on a module's
//! [`SourceType`] with [`Converter::for_source_type`].

mod gbf;
mod normalize;
mod osis;
mod shield;
mod tei;
mod thml;

use serde::Serialize;
use tracing::{debug, instrument};

pub use gbf::{GbfConverter, GbfResult};
pub use juniper_shared::{MarkupConfig, SenseNumbering, SourceType, StrongsFormat};
pub use osis::{OsisConverter, OsisResult};
pub use tei::{TeiConverter, TeiResult};
pub use thml::{ThmlConverter, ThmlResult};

use normalize::Whitespace;

// ---------------------------------------------------------------------------
// Converter trait
// ---------------------------------------------------------------------------

/// Shared surface of the dialect converters.
pub trait MarkupConverter {
    /// Dialect-specific result record.
    type Output;

    /// The dialect this converter reads.
    fn source_type(&self) -> SourceType;

    /// Convert markup to Markdown and collect its annotations.
    fn convert(&self, input: &str) -> Self::Output;

    /// Convert markup and keep only the Markdown text.
    fn convert_text(&self, input: &str) -> String;

    /// Convert raw module bytes, replacing invalid UTF-8 with U+FFFD.
    fn convert_bytes(&self, input: &[u8]) -> Self::Output {
        self.convert(&String::from_utf8_lossy(input))
    }
}

macro_rules! impl_markup_converter {
    ($converter:ty, $output:ty, $source:expr) => {
        impl MarkupConverter for $converter {
            type Output = $output;

            fn source_type(&self) -> SourceType {
                $source
            }

            fn convert(&self, input: &str) -> $output {
                <$converter>::convert(self, input)
            }

            fn convert_text(&self, input: &str) -> String {
                <$converter>::convert_text(self, input)
            }
        }
    };
}

impl_markup_converter!(OsisConverter, OsisResult, SourceType::Osis);
impl_markup_converter!(ThmlConverter, ThmlResult, SourceType::Thml);
impl_markup_converter!(GbfConverter, GbfResult, SourceType::Gbf);
impl_markup_converter!(TeiConverter, TeiResult, SourceType::Tei);

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// A converter chosen by source type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Converter {
    Osis(OsisConverter),
    Thml(ThmlConverter),
    Gbf(GbfConverter),
    Tei(TeiConverter),
    /// Unmarked text: whitespace normalization only.
    #[default]
    Plaintext,
}

/// Output of [`Converter::convert`], tagged with the dialect it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source_type")]
pub enum Converted {
    #[serde(rename = "OSIS")]
    Osis(OsisResult),
    #[serde(rename = "ThML")]
    Thml(ThmlResult),
    #[serde(rename = "GBF")]
    Gbf(GbfResult),
    #[serde(rename = "TEI")]
    Tei(TeiResult),
    Plaintext { text: String },
}

impl Converted {
    /// The Markdown text, whatever the dialect.
    pub fn text(&self) -> &str {
        match self {
            Self::Osis(r) => &r.text,
            Self::Thml(r) => &r.text,
            Self::Gbf(r) => &r.text,
            Self::Tei(r) => &r.text,
            Self::Plaintext { text } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Osis(r) => r.text,
            Self::Thml(r) => r.text,
            Self::Gbf(r) => r.text,
            Self::Tei(r) => r.text,
            Self::Plaintext { text } => text,
        }
    }
}

impl Converter {
    /// Build the converter for `source_type` from the matching config section.
    pub fn for_source_type(source_type: SourceType, config: &MarkupConfig) -> Self {
        match source_type {
            SourceType::Osis => Self::Osis(OsisConverter::from(&config.osis)),
            SourceType::Thml => Self::Thml(ThmlConverter::from(&config.thml)),
            SourceType::Gbf => Self::Gbf(GbfConverter::from(&config.gbf)),
            SourceType::Tei => Self::Tei(TeiConverter::from(&config.tei)),
            SourceType::Plaintext => Self::Plaintext,
        }
    }

    pub fn source_type(&self) -> SourceType {
        match self {
            Self::Osis(_) => SourceType::Osis,
            Self::Thml(_) => SourceType::Thml,
            Self::Gbf(_) => SourceType::Gbf,
            Self::Tei(_) => SourceType::Tei,
            Self::Plaintext => SourceType::Plaintext,
        }
    }

    #[instrument(level = "trace", skip_all, fields(source_type = %self.source_type()))]
    pub fn convert(&self, input: &str) -> Converted {
        match self {
            Self::Osis(c) => Converted::Osis(c.convert(input)),
            Self::Thml(c) => Converted::Thml(c.convert(input)),
            Self::Gbf(c) => Converted::Gbf(c.convert(input)),
            Self::Tei(c) => Converted::Tei(c.convert(input)),
            Self::Plaintext => {
                let text = normalize::finish(input, Whitespace::Inline);
                debug!(text_len = text.len(), "plaintext normalized");
                Converted::Plaintext { text }
            }
        }
    }

    pub fn convert_text(&self, input: &str) -> String {
        self.convert(input).into_text()
    }

    /// Convert raw module bytes, replacing invalid UTF-8 with U+FFFD.
    pub fn convert_bytes(&self, input: &[u8]) -> Converted {
        self.convert(&String::from_utf8_lossy(input))
    }
}
