//! ThML (Theological Markup Language) to Markdown.
//!
//! ThML is an older XML-ish format found mostly in SWORD commentaries. It
//! carries scripture references (`<scripRef passage="…">`), notes, foreign
//! language spans, HTML-style emphasis, headings, paragraphs and blockquotes,
//! and `<sync>` markers for Strong's alignment.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, instrument};

use juniper_shared::ThmlConfig;

use crate::normalize::{self, Whitespace};
use crate::shield::Shield;

/// Converts ThML fragments to Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThmlConverter {
    /// Collect `<scripRef passage>` values into [`ThmlResult::scrip_refs`].
    pub preserve_scrip_refs: bool,
}

impl Default for ThmlConverter {
    fn default() -> Self {
        Self::from(&ThmlConfig::default())
    }
}

impl From<&ThmlConfig> for ThmlConverter {
    fn from(config: &ThmlConfig) -> Self {
        Self {
            preserve_scrip_refs: config.preserve_scrip_refs,
        }
    }
}

/// Converted ThML text and the metadata pulled out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThmlResult {
    pub text: String,
    pub scrip_refs: Vec<String>,
    pub notes: Vec<String>,
    pub has_foreign: bool,
}

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

static PASSAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<scripRef[^>]*passage="([^"]*)"[^>]*>"#).expect("valid regex"));

static NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<note[^>]*>([^<]*)</note>").expect("valid regex"));

static SCRIP_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<scripRef[^>]*passage="([^"]*)"[^>]*>([^<]*)</scripRef>"#).expect("valid regex")
});

static FOREIGN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<foreign[^>]*>([^<]*)</foreign>").expect("valid regex"));

/// One pattern per heading level, `<h1>` first.
static HEADING_RES: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    (1..=6)
        .map(|level| {
            let re = Regex::new(&format!(r"<h{level}[^>]*>([^<]*)</h{level}>"))
                .expect("valid regex");
            (re, format!("\n{} $1\n", "#".repeat(level)))
        })
        .collect()
});

/// Emphasis, applied in this order: `<em>`, `<i>`, `<b>`, `<strong>`.
static EMPHASIS_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [("em", "*$1*"), ("i", "*$1*"), ("b", "**$1**"), ("strong", "**$1**")]
        .into_iter()
        .map(|(tag, rep)| {
            let re = Regex::new(&format!(r"<{tag}>([^<]*)</{tag}>")).expect("valid regex");
            (re, rep)
        })
        .collect()
});

static PARAGRAPH_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p[^>]*>").expect("valid regex"));

static PARAGRAPH_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</p>").expect("valid regex"));

static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<br[^>]*>").expect("valid regex"));

static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<blockquote[^>]*>([^<]*)</blockquote>").expect("valid regex")
});

/// `<sync>` markers and `<div>` wrappers; their content is kept.
static WRAPPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<sync[^>]*>|<div[^>]*>|</div>").expect("valid regex"));

static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

impl ThmlConverter {
    /// Convert ThML markup to Markdown and collect its metadata.
    #[instrument(level = "trace", skip_all, fields(input_len = thml.len()))]
    pub fn convert(&self, thml: &str) -> ThmlResult {
        let scrip_refs = if self.preserve_scrip_refs {
            normalize::unique_codes(&PASSAGE_RE, thml)
        } else {
            Vec::new()
        };

        let notes = normalize::unique_bodies(&NOTE_RE, thml);
        let has_foreign = thml.contains("<foreign");

        let text = to_markdown(thml);

        debug!(
            scrip_refs = scrip_refs.len(),
            notes = notes.len(),
            has_foreign,
            "thml conversion complete"
        );

        ThmlResult {
            text,
            scrip_refs,
            notes,
            has_foreign,
        }
    }

    /// Convert ThML markup and keep only the Markdown text.
    pub fn convert_text(&self, thml: &str) -> String {
        self.convert(thml).text
    }
}

fn to_markdown(thml: &str) -> String {
    let mut shield = Shield::for_input(thml);

    let text = SCRIP_REF_RE.replace_all(thml, |caps: &Captures| {
        shield.protect(format!("[{}]({})", &caps[2], &caps[1]))
    });
    let text = FOREIGN_RE.replace_all(&text, |caps: &Captures| {
        shield.protect(format!("*{}*", &caps[1]))
    });

    let mut text = text.into_owned();
    for (re, heading) in HEADING_RES.iter() {
        text = re.replace_all(&text, heading.as_str()).into_owned();
    }

    for (re, rep) in EMPHASIS_RES.iter() {
        text = re.replace_all(&text, *rep).into_owned();
    }

    let text = PARAGRAPH_OPEN_RE.replace_all(&text, "\n\n");
    let text = PARAGRAPH_CLOSE_RE.replace_all(&text, "");
    let text = BREAK_RE.replace_all(&text, "\n");

    let text = BLOCKQUOTE_RE.replace_all(&text, |caps: &Captures| quote_lines(&caps[1]));

    let text = NOTE_RE.replace_all(&text, "");
    let text = WRAPPER_RE.replace_all(&text, "");

    let text = ANY_TAG_RE.replace_all(&text, "");
    let text = shield.restore(&text);

    normalize::finish(&text, Whitespace::Inline)
}

/// Prefix every line of `body` with `> `.
fn quote_lines(body: &str) -> String {
    body.split('\n')
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
