//! Protection of rendered spans from the indiscriminate tag-stripping pass.
//!
//! Converters render some spans (red letters, divine names, scripture links)
//! to their final form early, but the final form may itself contain markup
//! that the catch-all `<[^>]+>` stripper would destroy. The [`Shield`] moves
//! each such span into a side table and leaves a short token in the text.
//! Tokens are built from two characters chosen so that neither occurs in
//! the input, which makes a collision with real text impossible.

use std::collections::HashSet;

/// Candidate delimiter characters: the BMP Private Use Area, then both
/// supplementary private use planes.
fn candidate_delimiters() -> impl Iterator<Item = char> {
    ('\u{E000}'..='\u{F8FF}')
        .chain('\u{F0000}'..='\u{FFFFD}')
        .chain('\u{100000}'..='\u{10FFFD}')
}

/// Side table of protected spans plus the token delimiters for one conversion.
#[derive(Debug)]
pub(crate) struct Shield {
    /// `None` when every candidate delimiter already occurs in the input.
    delimiters: Option<(char, char)>,
    spans: Vec<String>,
}

impl Shield {
    /// Build a shield whose tokens cannot collide with anything in `text`.
    pub(crate) fn for_input(text: &str) -> Self {
        let used: HashSet<char> = text.chars().filter(|c| is_private_use(*c)).collect();
        let mut free = candidate_delimiters().filter(|c| !used.contains(c));

        let delimiters = match (free.next(), free.next()) {
            (Some(open), Some(close)) => Some((open, close)),
            _ => None,
        };

        Self {
            delimiters,
            spans: Vec::new(),
        }
    }

    /// Store a fully rendered span and return the token that stands in for it.
    ///
    /// Without usable delimiters the span is returned as-is, so it is exposed
    /// to stripping but its text still survives.
    pub(crate) fn protect(&mut self, rendered: String) -> String {
        let Some((open, close)) = self.delimiters else {
            return rendered;
        };

        let index = self.spans.len();
        self.spans.push(rendered);
        format!("{open}{index}{close}")
    }

    /// Replace every token in `text` with the span it stands for.
    pub(crate) fn restore(&self, text: &str) -> String {
        let Some((open, close)) = self.delimiters else {
            return text.to_string();
        };
        if self.spans.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(open) {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + open.len_utf8()..];

            let span = after_open.find(close).and_then(|end| {
                let index = after_open[..end].parse::<usize>().ok()?;
                let span = self.spans.get(index)?;
                Some((span, end))
            });

            match span {
                Some((span, end)) => {
                    // Spans may wrap tokens of spans protected before them.
                    out.push_str(&self.restore(span));
                    rest = &after_open[end + close.len_utf8()..];
                }
                None => {
                    // A stray delimiter cannot come from the input, but keep
                    // the text intact rather than guess.
                    out.push(open);
                    rest = after_open;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

fn is_private_use(c: char) -> bool {
    matches!(c, '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}')
}
