//! Search and replace over a [`Document`].
//!
//! All columns are char offsets into the line and match ranges are half-open
//! (`[start, end)`). Every call compiles its own matcher; callers keep the
//! last [`SearchParams`] themselves for find-next / find-previous.

use core_text::{Document, DocumentError, byte_to_char, char_len, char_to_byte};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Options for one search or replace request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub text: String,
    pub case_sensitive: bool,
    pub use_regex: bool,
    pub whole_word: bool,
}

impl SearchParams {
    /// Case-sensitive literal search for `text`.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            case_sensitive: true,
            use_regex: false,
            whole_word: false,
        }
    }

    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    pub fn regex(mut self, yes: bool) -> Self {
        self.use_regex = yes;
        self
    }

    pub fn whole_word(mut self, yes: bool) -> Self {
        self.whole_word = yes;
        self
    }
}

/// One match, located by line and char columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchMatch {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl SearchMatch {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid regex pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Lower-case per char, keeping chars whose lowercase form is not a single
/// char, so the folded string has exactly as many chars as the input.
fn fold(s: &str) -> String {
    s.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        })
        .collect()
}

enum Matcher {
    /// Plain substring search; `folded` means both sides are lower-cased.
    Literal { needle: String, folded: bool },
    /// Regex search. `expand` enables `$1`-style references in replacements.
    Pattern { re: Regex, expand: bool },
}

impl Matcher {
    /// Compile `params`; `None` means the pattern is empty and matches nothing.
    fn compile(params: &SearchParams) -> Result<Option<Self>, SearchError> {
        if params.text.is_empty() {
            return Ok(None);
        }
        if !params.use_regex && !params.whole_word {
            let needle = if params.case_sensitive {
                params.text.clone()
            } else {
                fold(&params.text)
            };
            return Ok(Some(Matcher::Literal {
                needle,
                folded: !params.case_sensitive,
            }));
        }
        let body = if params.use_regex {
            params.text.clone()
        } else {
            regex::escape(&params.text)
        };
        let source = if params.whole_word {
            format!(r"\b(?:{body})\b")
        } else {
            body
        };
        let re = RegexBuilder::new(&source)
            .case_insensitive(!params.case_sensitive)
            .build()?;
        Ok(Some(Matcher::Pattern {
            re,
            expand: params.use_regex,
        }))
    }

    /// First non-empty match in `line` starting at or after char column `from`.
    fn find_at(&self, line: &str, from: usize) -> Option<(usize, usize)> {
        match self {
            Matcher::Literal { needle, folded } => {
                let hay = if *folded { fold(line) } else { line.to_string() };
                let at = char_to_byte(&hay, from);
                let pos = hay[at..].find(needle.as_str())? + at;
                let start = byte_to_char(&hay, pos);
                Some((start, start + char_len(needle)))
            }
            Matcher::Pattern { re, .. } => {
                let mut at = char_to_byte(line, from);
                loop {
                    let m = re.find_at(line, at)?;
                    if !m.is_empty() {
                        return Some((byte_to_char(line, m.start()), byte_to_char(line, m.end())));
                    }
                    // Step past a zero-width hit to the next char boundary.
                    at = m.end() + line[m.end()..].chars().next()?.len_utf8();
                }
            }
        }
    }

    /// Non-overlapping, non-empty matches in `line`, as byte ranges.
    fn byte_spans(&self, line: &str) -> Vec<(usize, usize)> {
        match self {
            Matcher::Literal { needle, folded } => {
                let hay = if *folded { fold(line) } else { line.to_string() };
                let n = char_len(needle);
                hay.match_indices(needle.as_str())
                    .map(|(b, _)| {
                        // Folding preserves char counts, so translate through char columns.
                        let c = byte_to_char(&hay, b);
                        (char_to_byte(line, c), char_to_byte(line, c + n))
                    })
                    .collect()
            }
            Matcher::Pattern { re, .. } => re
                .find_iter(line)
                .filter(|m| !m.is_empty())
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }

    /// Rewrite `line` with every match replaced; returns the new line and the count.
    fn replace_line(&self, line: &str, replacement: &str) -> (String, usize) {
        let mut out = String::with_capacity(line.len());
        let mut last = 0usize;
        let mut count = 0usize;
        match self {
            Matcher::Pattern { re, expand: true } => {
                for caps in re.captures_iter(line) {
                    let Some(m) = caps.get(0) else { continue };
                    if m.is_empty() {
                        continue;
                    }
                    out.push_str(&line[last..m.start()]);
                    caps.expand(replacement, &mut out);
                    last = m.end();
                    count += 1;
                }
            }
            _ => {
                for (s, e) in self.byte_spans(line) {
                    out.push_str(&line[last..s]);
                    out.push_str(replacement);
                    last = e;
                    count += 1;
                }
            }
        }
        out.push_str(&line[last..]);
        (out, count)
    }
}

fn scan(
    doc: &Document,
    m: &Matcher,
    lines: std::ops::Range<usize>,
    from_line: usize,
    from_col: usize,
) -> Option<SearchMatch> {
    lines.into_iter().find_map(|line| {
        let text = doc.line(line)?;
        let col = if line == from_line { from_col } else { 0 };
        m.find_at(text, col)
            .map(|(start, end)| SearchMatch { line, start, end })
    })
}

/// First match at or after `(from_line, from_col)`.
///
/// With `wrap` set and a start other than the origin, a failed forward scan
/// retries from the top and accepts only a match strictly before the start.
pub fn find(
    doc: &Document,
    params: &SearchParams,
    from_line: usize,
    from_col: usize,
    wrap: bool,
) -> Result<Option<SearchMatch>, SearchError> {
    let Some(m) = Matcher::compile(params)? else {
        return Ok(None);
    };
    let count = doc.line_count();
    if let Some(hit) = scan(doc, &m, from_line..count, from_line, from_col) {
        debug!(target: "search", pattern = %params.text, line = hit.line, col = hit.start, "found");
        return Ok(Some(hit));
    }
    if !wrap || (from_line == 0 && from_col == 0) {
        return Ok(None);
    }
    let upto = from_line.saturating_add(1).min(count);
    let hit = scan(doc, &m, 0..upto, usize::MAX, 0)
        .filter(|h| (h.line, h.start) < (from_line, from_col));
    debug!(target: "search", pattern = %params.text, wrapped = hit.is_some(), "wrap_scan");
    Ok(hit)
}

/// Every non-overlapping match in line-then-column order.
pub fn find_all(doc: &Document, params: &SearchParams) -> Result<Vec<SearchMatch>, SearchError> {
    let Some(m) = Matcher::compile(params)? else {
        return Ok(Vec::new());
    };
    let mut out = Vec::new();
    for (line, text) in doc.lines().iter().enumerate() {
        for (s, e) in m.byte_spans(text) {
            out.push(SearchMatch {
                line,
                start: byte_to_char(text, s),
                end: byte_to_char(text, e),
            });
        }
    }
    Ok(out)
}

/// Last match that starts strictly before `(line, col)`.
pub fn find_previous(
    doc: &Document,
    params: &SearchParams,
    line: usize,
    col: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    Ok(find_all(doc, params)?
        .into_iter()
        .rev()
        .find(|m| (m.line, m.start) < (line, col)))
}

/// Replace every match of `params` with `replacement`. Returns the number of
/// replacements; the document is only touched when that number is non-zero.
///
/// A replacement holding line terminators splits the rewritten line; the
/// lines it produces are not searched again.
pub fn replace_all(
    doc: &mut Document,
    params: &SearchParams,
    replacement: &str,
) -> Result<usize, SearchError> {
    let Some(m) = Matcher::compile(params)? else {
        return Ok(0);
    };
    let mut total = 0usize;
    let mut idx = 0usize;
    while let Some(text) = doc.line(idx) {
        let (rewritten, count) = m.replace_line(text, replacement);
        if count == 0 {
            idx += 1;
            continue;
        }
        total += count;
        idx += doc.set_line(idx, rewritten)?;
    }
    debug!(target: "search", pattern = %params.text, count = total, "replace_all");
    Ok(total)
}

/// Replace the char span `[start, end)` on `line`. Columns are clamped to the
/// line (and `end` to at least `start`). Returns `false` for a missing line.
/// Terminators in `replacement` split the line.
pub fn replace_range(
    doc: &mut Document,
    line: usize,
    start: usize,
    end: usize,
    replacement: &str,
) -> bool {
    let Some(text) = doc.line(line) else {
        return false;
    };
    let len = char_len(text);
    let start = start.min(len);
    let end = end.min(len).max(start);
    let (s, e) = (char_to_byte(text, start), char_to_byte(text, end));
    let rewritten = format!("{}{}{}", &text[..s], replacement, &text[e..]);
    doc.set_line(line, rewritten).is_ok()
}
