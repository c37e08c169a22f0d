//! OSIS (Open Scripture Information Standard) to Markdown.
//!
//! OSIS is the XML format most modern SWORD Bibles use. It carries:
//! - Strong's numbers (`<w lemma="strong:H430">`)
//! - Morphology (`<w morph="robinson:V-AAI-3S">`)
//! - Notes (`<note>`)
//! - Cross-references (`<reference osisRef="…">`)
//! - Divine names (`<divineName>`)
//! - Poetry (`<lg>`, `<l level="N">`)
//! - Titles (`<title>`)
//! - Red letters (`<q who="Jesus">`)

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, instrument};

use juniper_shared::{OsisConfig, StrongsFormat};

use crate::normalize::{self, Whitespace};
use crate::shield::Shield;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Converts OSIS XML fragments to Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsisConverter {
    /// Extract Strong's numbers and render them next to their word.
    pub preserve_strongs: bool,
    /// Extract morphology codes.
    pub preserve_morphology: bool,
    /// CSS class of the span wrapping words of Jesus.
    pub red_letter_class: String,
    /// Only [`StrongsFormat::Superscript`] annotates the text; the other
    /// formats leave rendering to whoever consumes [`OsisResult::strongs`].
    pub strongs_format: StrongsFormat,
}

impl Default for OsisConverter {
    fn default() -> Self {
        Self::from(&OsisConfig::default())
    }
}

impl From<&OsisConfig> for OsisConverter {
    fn from(config: &OsisConfig) -> Self {
        Self {
            preserve_strongs: config.preserve_strongs,
            preserve_morphology: config.preserve_morphology,
            red_letter_class: config.red_letter_class.clone(),
            strongs_format: config.strongs_format,
        }
    }
}

/// Converted OSIS text and the annotations pulled out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OsisResult {
    pub text: String,
    pub strongs: Vec<String>,
    pub morphology: Vec<String>,
    pub notes: Vec<String>,
    pub has_red_text: bool,
}

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

static LEMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"lemma="strong:([HG][0-9]+)""#).expect("valid regex"));

static MORPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"morph="(?:robinson:|strongMorph:)?([^"]+)""#).expect("valid regex")
});

static NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<note[^>]*>([^<]*)</note>").expect("valid regex"));

static STRONGS_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<w[^>]*lemma="strong:([HG][0-9]+)"[^>]*>([^<]*)</w>"#).expect("valid regex")
});

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w[^>]*>([^<]*)</w>").expect("valid regex"));

static DIVINE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<divineName>([^<]*)</divineName>").expect("valid regex"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<title[^>]*>([^<]*)</title>").expect("valid regex"));

static LINE_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?lg(?:\s[^>]*)?>").expect("valid regex"));

static LEVELED_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<l level="([0-9]+)"[^>]*>([^<]*)</l>"#).expect("valid regex")
});

static LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<l[^>]*>([^<]*)</l>").expect("valid regex"));

static RED_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<q[^>]*who="Jesus"[^>]*>([^<]*)</q>"#).expect("valid regex"));

static QUOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<q[^>]*>([^<]*)</q>").expect("valid regex"));

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<reference[^>]*osisRef="([^"]*)"[^>]*>([^<]*)</reference>"#)
        .expect("valid regex")
});

static TRANS_CHANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<transChange[^>]*>([^<]*)</transChange>").expect("valid regex")
});

/// Milestones, verse and chapter markers carry no renderable text.
static STRUCTURAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<milestone[^>]*/>|<verse[^>]*>|</verse>|<chapter[^>]*>|</chapter>")
        .expect("valid regex")
});

static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

impl OsisConverter {
    /// Convert OSIS markup to Markdown and collect its annotations.
    #[instrument(level = "trace", skip_all, fields(input_len = osis.len()))]
    pub fn convert(&self, osis: &str) -> OsisResult {
        let strongs = if self.preserve_strongs {
            normalize::unique_codes(&LEMMA_RE, osis)
        } else {
            Vec::new()
        };

        let morphology = if self.preserve_morphology {
            normalize::unique_codes(&MORPH_RE, osis)
        } else {
            Vec::new()
        };

        let notes = normalize::unique_bodies(&NOTE_RE, osis);
        let has_red_text = osis.contains(r#"who="Jesus""#) || osis.contains(r#"marker="Jesus""#);

        let text = self.to_markdown(osis);

        debug!(
            strongs = strongs.len(),
            morphology = morphology.len(),
            notes = notes.len(),
            has_red_text,
            "osis conversion complete"
        );

        OsisResult {
            text,
            strongs,
            morphology,
            notes,
            has_red_text,
        }
    }

    /// Convert OSIS markup and keep only the Markdown text.
    pub fn convert_text(&self, osis: &str) -> String {
        self.convert(osis).text
    }

    /// Convert a single verse to Markdown.
    pub fn convert_verse(&self, osis: &str) -> String {
        self.convert_text(osis)
    }

    /// Same as [`convert`](Self::convert); kept for callers that want the
    /// annotations spelled out at the call site.
    pub fn convert_with_annotations(&self, osis: &str) -> OsisResult {
        self.convert(osis)
    }

    /// Run the ordered substitution passes.
    fn to_markdown(&self, osis: &str) -> String {
        let mut shield = Shield::for_input(osis);

        // Word elements first, before anything can strip their attributes.
        let text = if self.preserve_strongs && self.strongs_format == StrongsFormat::Superscript {
            STRONGS_WORD_RE.replace_all(osis, "$2^$1^")
        } else {
            WORD_RE.replace_all(osis, "$1")
        };

        let text = DIVINE_NAME_RE.replace_all(&text, |caps: &Captures| {
            shield.protect(format!(r#"<span class="divine-name">{}</span>"#, &caps[1]))
        });

        let text = TITLE_RE.replace_all(&text, "\n### $1\n");

        // Poetry
        let text = LINE_GROUP_RE.replace_all(&text, "\n");
        let text = LEVELED_LINE_RE.replace_all(&text, |caps: &Captures| {
            format!("{}{}\n", poetry_indent(&caps[1]), &caps[2])
        });
        let text = LINE_RE.replace_all(&text, "$1\n");

        let text = REFERENCE_RE.replace_all(&text, "[$2]($1)");
        let text = NOTE_RE.replace_all(&text, "");
        let text = TRANS_CHANGE_RE.replace_all(&text, "*$1*");
        let text = STRUCTURAL_RE.replace_all(&text, "");

        // Inline markup inside the words of Jesus is already rendered here.
        let text = RED_LETTER_RE.replace_all(&text, |caps: &Captures| {
            shield.protect(format!(
                r#"<span class="{}">{}</span>"#,
                self.red_letter_class, &caps[1]
            ))
        });
        let text = QUOTE_RE.replace_all(&text, "\"$1\"");

        let text = ANY_TAG_RE.replace_all(&text, "");
        let text = shield.restore(&text);

        normalize::finish(&text, Whitespace::All)
    }
}

/// Leading indent for a poetry line of the given `level` attribute.
fn poetry_indent(level: &str) -> &'static str {
    match level {
        "2" => "    ",
        "3" => "        ",
        _ => "",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
