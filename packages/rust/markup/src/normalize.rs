//! Result assembly helpers shared by every converter.
//!
//! Extraction helpers collect regex captures into ordered, de-duplicated
//! lists. [`finish`] performs the final whitespace and line normalization.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Insertion-ordered list that silently drops repeated values.
#[derive(Debug, Default)]
pub(crate) struct UniqueList {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl UniqueList {
    pub(crate) fn push(&mut self, value: String) {
        if self.seen.insert(value.clone()) {
            self.items.push(value);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Every distinct capture of group 1, in order of first appearance.
pub(crate) fn unique_codes(re: &Regex, text: &str) -> Vec<String> {
    let mut list = UniqueList::default();
    for caps in re.captures_iter(text) {
        if let Some(code) = caps.get(1) {
            list.push(code.as_str().to_string());
        }
    }
    list.into_vec()
}

/// Every distinct non-blank element body (group 1), trimmed, in order.
pub(crate) fn unique_bodies(re: &Regex, text: &str) -> Vec<String> {
    let mut list = UniqueList::default();
    for caps in re.captures_iter(text) {
        let Some(body) = caps.get(1) else { continue };
        let body = body.as_str().trim();
        if !body.is_empty() {
            list.push(body.to_string());
        }
    }
    list.into_vec()
}

/// The trimmed body (group 1) of the first match, or an empty string.
pub(crate) fn first_body(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|body| body.as_str().trim().to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Final normalization
// ---------------------------------------------------------------------------

/// Which whitespace runs collapse to a single space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Whitespace {
    /// Every ASCII whitespace run, line breaks included.
    All,
    /// Spaces and tabs only, so explicit line breaks survive.
    Inline,
}

static ALL_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t\n\x0C\r ]+").expect("valid regex"));

static INLINE_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid regex"));

static EXCESS_NEWLINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Collapse whitespace, trim every line, keep at most one blank line in a
/// row, and trim the whole text.
pub(crate) fn finish(text: &str, mode: Whitespace) -> String {
    let collapsed = match mode {
        Whitespace::All => ALL_WS_RE.replace_all(text, " "),
        Whitespace::Inline => INLINE_WS_RE.replace_all(text, " "),
    };

    let trimmed = collapsed
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    EXCESS_NEWLINES_RE
        .replace_all(&trimmed, "\n\n")
        .trim()
        .to_string()
}
