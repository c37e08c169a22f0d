//! TEI (Text Encoding Initiative) dictionary entries to Markdown.
//!
//! SWORD lexicons and dictionaries sometimes ship TEI entries:
//!
//! ```text
//! <entry>
//!   <orth>θεός</orth> <pron>theos</pron>
//!   <gramGrp><pos>noun</pos><gen>masculine</gen></gramGrp>
//!   <etym>…</etym>
//!   <sense n="1"><def>God, deity</def></sense>
//!   <ref target="bible:John.1.1">John 1:1</ref> <bibl>…</bibl> <quote>…</quote>
//! </entry>
//! ```

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, instrument};

use juniper_shared::{SenseNumbering, TeiConfig};

use crate::normalize::{self, Whitespace};

/// Converts TEI dictionary entries to Markdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeiConverter {
    /// Extract and render `<etym>`; when off, etymology is dropped entirely.
    pub include_etymology: bool,
    /// Render part of speech, gender and number; when off, they are dropped.
    pub include_grammar: bool,
    /// Numbering of senses that carry no `n` attribute.
    pub sense_numbering: SenseNumbering,
}

impl Default for TeiConverter {
    fn default() -> Self {
        Self::from(&TeiConfig::default())
    }
}

impl From<&TeiConfig> for TeiConverter {
    fn from(config: &TeiConfig) -> Self {
        Self {
            include_etymology: config.include_etymology,
            include_grammar: config.include_grammar,
            sense_numbering: config.sense_numbering,
        }
    }
}

/// Converted entry text and the dictionary metadata pulled out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeiResult {
    pub text: String,
    pub headword: String,
    pub part_of_speech: String,
    pub etymology: String,
    pub senses: Vec<String>,
    pub references: Vec<String>,
}

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// Pattern for a tag-free `<name …>body</name>` element.
fn element(name: &str) -> Regex {
    Regex::new(&format!(r"<{name}[^>]*>([^<]*)</{name}>")).expect("valid regex")
}

/// Pattern for a whole `<name …>…</name>` element, nested markup included.
fn whole_element(name: &str) -> Regex {
    Regex::new(&format!(r"(?s)<{name}(?:\s[^>]*)?>.*?</{name}>")).expect("valid regex")
}

static ORTH_RE: LazyLock<Regex> = LazyLock::new(|| element("orth"));
static PRON_RE: LazyLock<Regex> = LazyLock::new(|| element("pron"));
static POS_RE: LazyLock<Regex> = LazyLock::new(|| element("pos"));
static GEN_RE: LazyLock<Regex> = LazyLock::new(|| element("gen"));
static NUM_RE: LazyLock<Regex> = LazyLock::new(|| element("num"));
static GRAM_GRP_RE: LazyLock<Regex> = LazyLock::new(|| element("gramGrp"));
static ETYM_RE: LazyLock<Regex> = LazyLock::new(|| element("etym"));
static DEF_RE: LazyLock<Regex> = LazyLock::new(|| element("def"));
static SENSE_RE: LazyLock<Regex> = LazyLock::new(|| element("sense"));
static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| element("quote"));
static REF_RE: LazyLock<Regex> = LazyLock::new(|| element("ref"));
static BIBL_RE: LazyLock<Regex> = LazyLock::new(|| element("bibl"));

static GRAMMAR_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| whole_element("gramGrp"));
static POS_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| whole_element("pos"));
static GEN_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| whole_element("gen"));
static NUM_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| whole_element("num"));
static ETYM_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| whole_element("etym"));

static NUMBERED_SENSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<sense[^>]*n="([0-9]+)"[^>]*>"#).expect("valid regex"));

static SENSE_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<sense[^>]*>").expect("valid regex"));

static TARGET_REF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<ref[^>]*target="([^"]*)"[^>]*>([^<]*)</ref>"#).expect("valid regex")
});

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<entry[^>]*>|</entry>").expect("valid regex"));

static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

// ---------------------------------------------------------------------------
// Converter
// ---------------------------------------------------------------------------

impl TeiConverter {
    /// Convert a TEI entry to Markdown and collect its metadata.
    #[instrument(level = "trace", skip_all, fields(input_len = tei.len()))]
    pub fn convert(&self, tei: &str) -> TeiResult {
        let headword = normalize::first_body(&ORTH_RE, tei);
        let part_of_speech = normalize::first_body(&POS_RE, tei);
        let etymology = if self.include_etymology {
            normalize::first_body(&ETYM_RE, tei)
        } else {
            String::new()
        };
        let senses = extract_senses(tei);
        let references = normalize::unique_bodies(&REF_RE, tei);

        let text = self.to_markdown(tei);

        debug!(
            headword = %headword,
            senses = senses.len(),
            references = references.len(),
            "tei conversion complete"
        );

        TeiResult {
            text,
            headword,
            part_of_speech,
            etymology,
            senses,
            references,
        }
    }

    /// Convert a TEI entry and keep only the Markdown text.
    pub fn convert_text(&self, tei: &str) -> String {
        self.convert(tei).text
    }

    fn to_markdown(&self, tei: &str) -> String {
        let text = ORTH_RE.replace_all(tei, "## $1\n");
        let text = PRON_RE.replace_all(&text, "/*$1*/");

        let text = if self.include_grammar {
            let text = POS_RE.replace_all(&text, "**$1**");
            let text = GEN_RE.replace_all(&text, "($1)");
            let text = NUM_RE.replace_all(&text, "($1)");
            GRAM_GRP_RE.replace_all(&text, " [$1]").into_owned()
        } else {
            let text = GRAMMAR_BLOCK_RE.replace_all(&text, "");
            let text = POS_BLOCK_RE.replace_all(&text, "");
            let text = GEN_BLOCK_RE.replace_all(&text, "");
            NUM_BLOCK_RE.replace_all(&text, "").into_owned()
        };

        let text = if self.include_etymology {
            ETYM_RE.replace_all(&text, "\n**Etymology:** $1\n")
        } else {
            ETYM_BLOCK_RE.replace_all(&text, "")
        };

        let text = NUMBERED_SENSE_RE.replace_all(&text, "\n$1. ");
        let mut counter: u32 = 0;
        let text = SENSE_OPEN_RE.replace_all(&text, |_: &Captures| {
            counter = counter.saturating_add(1);
            format!("\n{}. ", self.sense_label(counter))
        });
        let text = text.replace("</sense>", "");

        let text = DEF_RE.replace_all(&text, "$1");
        let text = QUOTE_RE.replace_all(&text, "\"$1\"");
        let text = TARGET_REF_RE.replace_all(&text, "[$2]($1)");
        let text = REF_RE.replace_all(&text, "*$1*");
        let text = BIBL_RE.replace_all(&text, "($1)");

        let text = ENTRY_RE.replace_all(&text, "");
        let text = ANY_TAG_RE.replace_all(&text, "");

        normalize::finish(&text, Whitespace::Inline)
    }

    /// Label of the `counter`-th sense that has no `n` attribute.
    fn sense_label(&self, counter: u32) -> String {
        match self.sense_numbering {
            SenseNumbering::Decimal => counter.to_string(),
            SenseNumbering::LegacyDigit => ('0' as u32)
                .checked_add(counter)
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER)
                .to_string(),
        }
    }
}

/// `<def>` bodies, or `<sense>` bodies when the entry has no usable `<def>`.
fn extract_senses(tei: &str) -> Vec<String> {
    let senses = normalize::unique_bodies(&DEF_RE, tei);
    if senses.is_empty() {
        normalize::unique_bodies(&SENSE_RE, tei)
    } else {
        senses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv() -> TeiConverter {
        TeiConverter::default()
    }

    #[test]
    fn defaults_include_everything() {
        let c = conv();
        assert!(c.include_etymology);
        assert!(c.include_grammar);
        assert_eq!(c.sense_numbering, SenseNumbering::LegacyDigit);
    }

    #[test]
    fn extract_headword() {
        let cases = [
            ("<entry><orth>λόγος</orth></entry>", "λόγος"),
            (r#"<entry><orth type="main" xml:lang="grc">θεός</orth></entry>"#, "θεός"),
            ("<entry><def>A definition</def></entry>", ""),
            ("<entry><orth></orth></entry>", ""),
            ("<entry><orth>  word  </orth></entry>", "word"),
            ("<entry><orth>אֱלֹהִים</orth></entry>", "אֱלֹהִים"),
        ];
        for (input, expected) in cases {
            assert_eq!(conv().convert(input).headword, expected, "input: {input}");
        }
    }

    #[test]
    fn extract_part_of_speech() {
        let cases = [
            ("<entry><gramGrp><pos>noun</pos></gramGrp></entry>", "noun"),
            ("<entry><gramGrp><pos>verb</pos></gramGrp></entry>", "verb"),
            ("<entry><orth>word</orth></entry>", ""),
            (r#"<entry><gramGrp><pos type="main">adjective</pos></gramGrp></entry>"#, "adjective"),
        ];
        for (input, expected) in cases {
            assert_eq!(conv().convert(input).part_of_speech, expected, "input: {input}");
        }
    }

    #[test]
    fn part_of_speech_extracted_even_without_grammar_rendering() {
        let c = TeiConverter {
            include_grammar: false,
            ..conv()
        };
        let result =
            c.convert("<entry><gramGrp><pos>noun</pos><gen>masculine</gen></gramGrp></entry>");
        assert_eq!(result.part_of_speech, "noun");
        assert!(!result.text.contains("noun"));
        assert!(!result.text.contains("masculine"));
    }

    #[test]
    fn extract_etymology() {
        assert_eq!(
            conv().convert("<entry><etym>from Greek logos</etym></entry>").etymology,
            "from Greek logos"
        );
        assert_eq!(conv().convert("<entry><orth>word</orth></entry>").etymology, "");
        let result =
            conv().convert(r#"<entry><etym type="compound">from aleph + bet</etym></entry>"#);
        assert_eq!(result.etymology, "from aleph + bet");
    }

    #[test]
    fn etymology_disabled_scenario() {
        let c = TeiConverter {
            include_etymology: false,
            ..conv()
        };
        let result = c.convert("<entry><orth>word</orth><etym>from Latin</etym></entry>");
        assert_eq!(result.etymology, "");
        assert!(!result.text.contains("Etymology:"));
        assert!(!result.text.contains("from Latin"));
    }

    #[test]
    fn disabled_etymology_drops_nested_markup() {
        let c = TeiConverter {
            include_etymology: false,
            ..conv()
        };
        let result = c.convert(
            "<entry><orth>w</orth>\
             <etym>from <lang>Latin</lang> <mentioned>verbum</mentioned></etym></entry>",
        );
        assert_eq!(result.etymology, "");
        assert_eq!(result.text, "## w");
    }

    #[test]
    fn disabled_grammar_drops_nested_markup() {
        let c = TeiConverter {
            include_grammar: false,
            ..conv()
        };
        let text = c.convert_text(
            "<entry><orth>w</orth><gramGrp><pos>noun</pos><gen><hi>masc</hi></gen></gramGrp>\
             <num type=\"x\"><hi>pl</hi></num><def>word</def></entry>",
        );
        assert_eq!(text, "## w\nword");
    }

    #[test]
    fn senses_from_defs_or_bodies() {
        let cases: [(&str, &[&str]); 5] = [
            ("<entry><def>a spoken word</def></entry>", &["a spoken word"]),
            (
                "<entry><def>meaning one</def><def>meaning two</def></entry>",
                &["meaning one", "meaning two"],
            ),
            (
                "<entry><sense>first sense</sense><sense>second sense</sense></entry>",
                &["first sense", "second sense"],
            ),
            ("<entry><orth>word</orth></entry>", &[]),
            ("<entry><def>valid</def><def></def><def>  </def></entry>", &["valid"]),
        ];
        for (input, expected) in cases {
            assert_eq!(conv().convert(input).senses, expected, "input: {input}");
        }
    }

    #[test]
    fn senses_prefer_def_over_sense_bodies() {
        let result =
            conv().convert("<entry><sense>loose</sense><sense><def>defined</def></sense></entry>");
        assert_eq!(result.senses, vec!["defined"]);
    }

    #[test]
    fn extract_references() {
        let result = conv().convert("<entry><ref>Gen 1:1</ref><ref>John 3:16</ref></entry>");
        assert_eq!(result.references, vec!["Gen 1:1", "John 3:16"]);

        let result =
            conv().convert(r#"<entry><ref target="bible:John.1.1">John 1:1</ref></entry>"#);
        assert_eq!(result.references, vec!["John 1:1"]);

        assert!(conv().convert("<entry><orth>word</orth></entry>").references.is_empty());
    }

    #[test]
    fn basic_entry_scenario() {
        let result = conv().convert(
            "<entry><orth>λόγος</orth><gramGrp><pos>noun</pos></gramGrp>\
             <def>word, speech</def></entry>",
        );
        assert_eq!(result.headword, "λόγος");
        assert_eq!(result.part_of_speech, "noun");
        assert_eq!(result.senses, vec!["word, speech"]);
        assert_eq!(result.text, "## λόγος\n[**noun**]word, speech");
    }

    #[test]
    fn complex_entry() {
        let input = r#"<entry>
<orth>θεός</orth>
<pron>theos</pron>
<gramGrp><pos>noun</pos><gen>masculine</gen></gramGrp>
<etym>from Proto-Greek *thesos</etym>
<sense n="1"><def>God, deity</def></sense>
<sense n="2"><def>divine being</def></sense>
<ref target="bible:John.1.1">John 1:1</ref>
</entry>"#;
        let result = conv().convert(input);

        assert_eq!(result.headword, "θεός");
        assert_eq!(result.etymology, "from Proto-Greek *thesos");
        assert_eq!(result.senses, vec!["God, deity", "divine being"]);
        assert_eq!(result.references, vec!["John 1:1"]);
        assert_eq!(
            result.text,
            "## θεός\n\n/*theos*/\n[**noun**(masculine)]\n\n\
             **Etymology:** from Proto-Greek *thesos\n\n\
             1. God, deity\n\n2. divine being\n[John 1:1](bible:John.1.1)"
        );
    }

    #[test]
    fn markdown_rendering() {
        let cases = [
            ("<entry><orth>logos</orth></entry>", "## logos"),
            ("<entry><pron>theos</pron></entry>", "/*theos*/"),
            ("<entry><gramGrp><pos>noun</pos></gramGrp></entry>", "**noun**"),
            ("<entry><gramGrp><gen>masculine</gen></gramGrp></entry>", "(masculine)"),
            ("<entry><etym>from Greek</etym></entry>", "**Etymology:** from Greek"),
            ("<entry><quote>example text</quote></entry>", "\"example text\""),
            (
                r#"<entry><ref target="bible:John.1.1">John 1:1</ref></entry>"#,
                "[John 1:1](bible:John.1.1)",
            ),
            ("<entry><ref>John 1:1</ref></entry>", "*John 1:1*"),
            ("<entry><bibl>Strong's 2316</bibl></entry>", "(Strong's 2316)"),
        ];
        for (input, needle) in cases {
            let text = conv().convert_text(input);
            assert!(text.contains(needle), "{needle:?} not in {text:?}");
        }
    }

    #[test]
    fn unnumbered_senses_use_counter() {
        let text = conv().convert_text("<entry><sense>one</sense><sense>two</sense></entry>");
        assert_eq!(text, "1. one\n2. two");
    }

    #[test]
    fn legacy_numbering_past_nine() {
        let input = "<sense>s</sense>".repeat(10);
        let text = conv().convert_text(&input);
        assert!(text.starts_with("1. s"));
        assert!(text.contains("\n9. s\n"));
        assert!(text.ends_with(":. s"));
    }

    #[test]
    fn decimal_numbering_past_nine() {
        let c = TeiConverter {
            sense_numbering: SenseNumbering::Decimal,
            ..conv()
        };
        let text = c.convert_text(&"<sense>s</sense>".repeat(12));
        assert!(text.contains("\n10. s\n"));
        assert!(text.ends_with("12. s"));
    }

    #[test]
    fn sense_label_never_panics() {
        let c = conv();
        assert_eq!(c.sense_label(1), "1");
        assert_eq!(c.sense_label(u32::MAX), "\u{FFFD}");
        // Lands in the surrogate range.
        assert_eq!(c.sense_label(0xD800 - '0' as u32), "\u{FFFD}");
    }

    #[test]
    fn edge_cases() {
        let result = conv().convert("");
        assert_eq!(result, TeiResult::default());

        let plain = "Just plain text without tags";
        assert_eq!(conv().convert_text(plain), plain);

        let text = conv().convert_text("<entry><orth>word");
        assert!(!text.contains("<orth>"));
        assert_eq!(text, "word");
    }
}
