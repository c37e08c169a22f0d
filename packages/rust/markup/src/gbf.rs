//! GBF (General Bible Format) to Markdown.
//!
//! GBF predates OSIS in SWORD and uses attribute-less bracket codes. Paired
//! codes open in upper case and close with the second letter lowered:
//!
//! | code | meaning |
//! |---|---|
//! | `<FR>…<Fr>` | red letter (words of Jesus) |
//! | `<FI>…<Fi>` / `<FB>…<Fb>` / `<FU>…<Fu>` | italic / bold / underline |
//! | `<FO>…<Fo>` | Old Testament quotation |
//! | `<FS>…<Fs>` | superscript |
//! | `<WH####>…<Wh>` / `<WG####>…<Wg>` | Hebrew / Greek Strong's number |
//! | `<WT…>…<Wt>` | morphology |
//! | `<RF>…<Rf>` / `<RX>…<Rx>` | footnote / cross-reference |
//! | `<TS>…<Ts>` | section title |
//! | `<CM>` `<CL>` `<CI>` | paragraph, line break, indent |
//!
//! `<WH####>` and `<WG####>` are markers in their own right: a number is
//! extracted even when no closing `<Wh>`/`<Wg>` follows.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, instrument};

use juniper_shared::GbfConfig;

use crate::normalize::{self, UniqueList, Whitespace};
use crate::shield::Shield;

/// Converts GBF text to Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GbfConverter {
    /// Extract Strong's numbers and render them as `word^H####^`.
    pub preserve_strongs: bool,
    /// Extract morphology codes. Morphology is never rendered.
    pub preserve_morphology: bool,
}

impl Default for GbfConverter {
    fn default() -> Self {
        Self::from(&GbfConfig::default())
    }
}

impl From<&GbfConfig> for GbfConverter {
    fn from(config: &GbfConfig) -> Self {
        Self {
            preserve_strongs: config.preserve_strongs,
            preserve_morphology: config.preserve_morphology,
        }
    }
}

/// Converted GBF text and the metadata pulled out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GbfResult {
    pub text: String,
    pub strongs: Vec<String>,
    pub morphology: Vec<String>,
    pub footnotes: Vec<String>,
    pub cross_refs: Vec<String>,
    pub has_red_text: bool,
}

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

static STRONGS_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<W([HG])([0-9]+)>").expect("valid regex"));

static MORPH_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<WT([^>]+)>").expect("valid regex"));

static FOOTNOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<RF>([^<]*)<Rf>").expect("valid regex"));

static CROSS_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<RX>([^<]*)<Rx>").expect("valid regex"));

static RED_LETTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<FR>([^<]*)<Fr>").expect("valid regex"));

/// Font codes, applied in this order.
static FONT_RES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        ("I", "*${1}*"),
        ("B", "**${1}**"),
        ("O", "> ${1}"),
        ("S", "^${1}^"),
        ("U", "_${1}_"),
    ]
    .into_iter()
    .map(|(code, rep)| {
        let close = code.to_ascii_lowercase();
        let re = Regex::new(&format!("<F{code}>([^<]*)<F{close}>")).expect("valid regex");
        (re, rep)
    })
    .collect()
});

static HEBREW_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<WH([0-9]+)>([^<]*)<Wh>").expect("valid regex"));

static GREEK_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<WG([0-9]+)>([^<]*)<Wg>").expect("valid regex"));

static MORPH_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<WT[^>]*>|<Wt>").expect("valid regex"));

static NOTE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<RF>[^<]*<Rf>|<RX>[^<]*<Rx>").expect("valid regex"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<TS>([^<]*)<Ts>").expect("valid regex"));

/// Upper-case codes that no earlier pass consumed.
static LEFTOVER_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Z][A-Za-z0-9]*>").expect("valid regex"));

/// Two-letter closers; runs after [`LEFTOVER_CODE_RE`], whose removals can
/// join the pieces of a new closer.
static LEFTOVER_CLOSER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z][a-z]>").expect("valid regex"));

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

impl GbfConverter {
    /// Convert GBF markup to Markdown and collect its metadata.
    #[instrument(level = "trace", skip_all, fields(input_len = gbf.len()))]
    pub fn convert(&self, gbf: &str) -> GbfResult {
        let strongs = if self.preserve_strongs {
            extract_strongs(gbf)
        } else {
            Vec::new()
        };

        let morphology = if self.preserve_morphology {
            normalize::unique_codes(&MORPH_MARKER_RE, gbf)
        } else {
            Vec::new()
        };

        let footnotes = normalize::unique_bodies(&FOOTNOTE_RE, gbf);
        let cross_refs = normalize::unique_bodies(&CROSS_REF_RE, gbf);
        let has_red_text = gbf.contains("<FR>");

        let text = self.to_markdown(gbf);

        debug!(
            strongs = strongs.len(),
            morphology = morphology.len(),
            footnotes = footnotes.len(),
            cross_refs = cross_refs.len(),
            has_red_text,
            "gbf conversion complete"
        );

        GbfResult {
            text,
            strongs,
            morphology,
            footnotes,
            cross_refs,
            has_red_text,
        }
    }

    /// Convert GBF markup and keep only the Markdown text.
    pub fn convert_text(&self, gbf: &str) -> String {
        self.convert(gbf).text
    }

    fn to_markdown(&self, gbf: &str) -> String {
        let mut shield = Shield::for_input(gbf);

        let text = RED_LETTER_RE.replace_all(gbf, |caps: &Captures| {
            shield.protect(format!(r#"<span class="red-letter">{}</span>"#, &caps[1]))
        });

        let mut text = text.into_owned();
        for (re, rep) in FONT_RES.iter() {
            text = re.replace_all(&text, *rep).into_owned();
        }

        let (hebrew, greek) = if self.preserve_strongs {
            ("${2}^H${1}^", "${2}^G${1}^")
        } else {
            ("${2}", "${2}")
        };
        let text = HEBREW_WORD_RE.replace_all(&text, hebrew);
        let text = GREEK_WORD_RE.replace_all(&text, greek);

        let text = MORPH_TAG_RE.replace_all(&text, "");
        let text = NOTE_BLOCK_RE.replace_all(&text, "");

        let text = text
            .replace("<CM>", "\n\n")
            .replace("<CL>", "\n")
            .replace("<CI>", "    ");

        let text = TITLE_RE.replace_all(&text, "\n### ${1}\n");

        let text = LEFTOVER_CODE_RE.replace_all(&text, "");
        let text = LEFTOVER_CLOSER_RE.replace_all(&text, "");
        let text = shield.restore(&text);

        normalize::finish(&text, Whitespace::Inline)
    }
}

/// Hebrew and Greek Strong's markers in document order, prefixed `H`/`G`.
fn extract_strongs(gbf: &str) -> Vec<String> {
    let mut list = UniqueList::default();
    for caps in STRONGS_MARKER_RE.captures_iter(gbf) {
        list.push(format!("{}{}", &caps[1], &caps[2]));
    }
    list.into_vec()
}
