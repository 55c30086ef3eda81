//! Rule-table syntax highlighting.
//!
//! [`Highlighter::highlight`] maps one line of text to an ordered list of
//! [`Segment`]s whose texts concatenate back to the input line. Language
//! rules run first; trailing whitespace, overlong lines and the bracket
//! under the cursor are then recolored on top of the result.

use std::path::Path;
use tracing::debug;

mod language;
mod rules;

pub use language::Language;
pub use rules::{Rule, rules_for};

/// Display class of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorClass {
    #[default]
    Normal,
    Keyword,
    String,
    Comment,
    Error,
    Number,
    Operator,
    Function,
    Type,
    Preprocessor,
    Bracket,
}

impl ColorClass {
    pub fn name(self) -> &'static str {
        match self {
            ColorClass::Normal => "normal",
            ColorClass::Keyword => "keyword",
            ColorClass::String => "string",
            ColorClass::Comment => "comment",
            ColorClass::Error => "error",
            ColorClass::Number => "number",
            ColorClass::Operator => "operator",
            ColorClass::Function => "function",
            ColorClass::Type => "type",
            ColorClass::Preprocessor => "preprocessor",
            ColorClass::Bracket => "bracket",
        }
    }
}

/// A run of text sharing one color class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub class: ColorClass,
}

impl Segment {
    pub fn new(text: impl Into<String>, class: ColorClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
    #[error("unknown syntax type: {0}")]
    UnknownLanguage(String),
}

/// Feature toggles for the highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSettings {
    pub enabled: bool,
    pub trailing_whitespace: bool,
    pub long_lines: bool,
    /// Char column past which an overlong line is flagged.
    pub max_line_length: usize,
    pub matching_brackets: bool,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            trailing_whitespace: true,
            long_lines: true,
            max_line_length: 120,
            matching_brackets: true,
        }
    }
}

const BRACKET_PAIRS: [(char, char); 4] = [('(', ')'), ('[', ']'), ('{', '}'), ('<', '>')];

/// Byte range of the line plus its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
    class: ColorClass,
}

#[derive(Debug, Clone, Copy)]
struct Tag {
    start: usize,
    end: usize,
    class: ColorClass,
    priority: u8,
}

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    settings: HighlightSettings,
    forced: Option<Language>,
}

impl Highlighter {
    pub fn new(settings: HighlightSettings) -> Self {
        Self {
            settings,
            forced: None,
        }
    }

    pub fn settings(&self) -> &HighlightSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut HighlightSettings {
        &mut self.settings
    }

    /// `"auto"` or `"none"` clear the override; any other name must be a known language.
    pub fn set_syntax(&mut self, name: &str) -> Result<Option<Language>, SyntaxError> {
        let name = name.trim();
        self.forced = match name.to_ascii_lowercase().as_str() {
            "auto" | "none" => None,
            _ => Some(
                Language::from_name(name)
                    .ok_or_else(|| SyntaxError::UnknownLanguage(name.to_string()))?,
            ),
        };
        debug!(target: "syntax", forced = ?self.forced, "set_syntax");
        Ok(self.forced)
    }

    /// The explicit override, if any.
    pub fn current_syntax(&self) -> Option<Language> {
        self.forced
    }

    /// Language used for a file at `path`: the override first, then the extension table.
    pub fn language_for(&self, path: Option<&Path>) -> Option<Language> {
        self.forced.or_else(|| path.and_then(Language::from_path))
    }

    /// Highlight one line. `cursor_col` (a char column) enables bracket matching.
    pub fn highlight(
        &self,
        line: &str,
        path: Option<&Path>,
        cursor_col: Option<usize>,
    ) -> Vec<Segment> {
        if line.is_empty() || !self.settings.enabled {
            return vec![Segment::new(line, ColorClass::Normal)];
        }
        let mut spans = match self.language_for(path) {
            Some(lang) => tokenize(line, rules_for(lang)),
            None => vec![Span {
                start: 0,
                end: line.len(),
                class: ColorClass::Normal,
            }],
        };

        let s = &self.settings;
        if s.trailing_whitespace {
            let body = line.trim_end().len();
            if body < line.len() {
                spans = recolor(&spans, body, line.len(), ColorClass::Error, |c| {
                    c == ColorClass::Normal
                });
            }
        }
        if s.long_lines
            && let Some((cut, _)) = line.char_indices().nth(s.max_line_length)
        {
            spans = recolor(&spans, cut, line.len(), ColorClass::Error, |_| true);
        }
        if s.matching_brackets
            && let Some(col) = cursor_col
            && let Some(other) = matching_bracket(line, col)
        {
            for at in [col, other] {
                if let Some((b, ch)) = line.char_indices().nth(at) {
                    spans = recolor(&spans, b, b + ch.len_utf8(), ColorClass::Bracket, |_| true);
                }
            }
        }

        spans
            .into_iter()
            .map(|sp| Segment::new(&line[sp.start..sp.end], sp.class))
            .collect()
    }
}

/// Run every rule over `line` and resolve overlaps: tags are ordered by start
/// then descending priority and a tag starting inside an accepted one is dropped.
fn tokenize(line: &str, rules: &[Rule]) -> Vec<Span> {
    let mut tags = Vec::new();
    for rule in rules {
        for caps in rule.regex.captures_iter(line) {
            let Some(m) = caps.get(rule.group) else {
                continue;
            };
            if m.is_empty() {
                continue;
            }
            tags.push(Tag {
                start: m.start(),
                end: m.end(),
                class: rule.class,
                priority: rule.priority,
            });
        }
    }
    tags.sort_by_key(|t| (t.start, std::cmp::Reverse(t.priority)));

    let mut spans = Vec::new();
    let mut pos = 0usize;
    for tag in tags {
        if tag.start < pos {
            continue;
        }
        if tag.start > pos {
            spans.push(Span {
                start: pos,
                end: tag.start,
                class: ColorClass::Normal,
            });
        }
        spans.push(Span {
            start: tag.start,
            end: tag.end,
            class: tag.class,
        });
        pos = tag.end;
    }
    if pos < line.len() {
        spans.push(Span {
            start: pos,
            end: line.len(),
            class: ColorClass::Normal,
        });
    }
    spans
}

/// Recolor the byte range `[start, end)` of every span accepted by `only`,
/// splitting spans at the range edges.
fn recolor<F>(spans: &[Span], start: usize, end: usize, class: ColorClass, only: F) -> Vec<Span>
where
    F: Fn(ColorClass) -> bool,
{
    let mut out = Vec::with_capacity(spans.len() + 2);
    for &sp in spans {
        if sp.end <= start || sp.start >= end || !only(sp.class) {
            out.push(sp);
            continue;
        }
        let lo = sp.start.max(start);
        let hi = sp.end.min(end);
        let parts = [
            (sp.start, lo, sp.class),
            (lo, hi, class),
            (hi, sp.end, sp.class),
        ];
        out.extend(
            parts
                .into_iter()
                .filter(|(a, b, _)| a < b)
                .map(|(start, end, class)| Span { start, end, class }),
        );
    }
    out
}

/// Char column of the bracket balancing the one at `col`, searching within the line.
pub fn matching_bracket(line: &str, col: usize) -> Option<usize> {
    let chars: Vec<char> = line.chars().collect();
    let ch = *chars.get(col)?;
    if let Some(&(open, close)) = BRACKET_PAIRS.iter().find(|(o, _)| *o == ch) {
        let mut depth = 1usize;
        for (i, &c) in chars.iter().enumerate().skip(col + 1) {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        return None;
    }
    let &(open, close) = BRACKET_PAIRS.iter().find(|(_, c)| *c == ch)?;
    let mut depth = 1usize;
    for i in (0..col).rev() {
        let c = chars[i];
        if c == close {
            depth += 1;
        } else if c == open {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seg(text: &str, class: ColorClass) -> Segment {
        Segment::new(text, class)
    }

    fn plain() -> Highlighter {
        Highlighter::new(HighlightSettings::default())
    }

    #[test]
    fn bracket_match_backward_and_forward() {
        assert_eq!(matching_bracket("f(x)", 3), Some(1));
        assert_eq!(matching_bracket("f(x)", 1), Some(3));
        assert_eq!(matching_bracket("((a)", 0), None);
        assert_eq!(matching_bracket("[(])", 3), Some(1));
        assert_eq!(matching_bracket("abc", 1), None);
        assert_eq!(matching_bracket("abc", 9), None);
    }

    #[test]
    fn bracket_recolors_exactly_two_chars() {
        let out = plain().highlight("f(x)", None, Some(3));
        assert_eq!(
            out,
            vec![
                seg("f", ColorClass::Normal),
                seg("(", ColorClass::Bracket),
                seg("x", ColorClass::Normal),
                seg(")", ColorClass::Bracket),
            ]
        );
    }

    #[test]
    fn empty_line_is_single_normal_segment() {
        assert_eq!(
            plain().highlight("", Some(Path::new("a.rs")), Some(0)),
            vec![seg("", ColorClass::Normal)]
        );
    }

    #[test]
    fn trailing_whitespace_flagged_without_language() {
        let out = plain().highlight("text  ", None, None);
        assert_eq!(
            out,
            vec![seg("text", ColorClass::Normal), seg("  ", ColorClass::Error)]
        );
    }

    #[test]
    fn trailing_whitespace_inside_comment_is_left_alone() {
        let out = plain().highlight("x # note  ", Some(Path::new("a.py")), None);
        assert_eq!(out.last(), Some(&seg("# note  ", ColorClass::Comment)));
    }

    #[test]
    fn long_line_split_across_spans() {
        let mut hl = plain();
        hl.settings_mut().max_line_length = 5;
        let out = hl.highlight("let abcdef", Some(Path::new("m.rs")), None);
        assert_eq!(
            out,
            vec![
                seg("let", ColorClass::Keyword),
                seg(" a", ColorClass::Normal),
                seg("bcdef", ColorClass::Error),
            ]
        );
    }

    #[test]
    fn rust_line_tokens() {
        let out = plain().highlight("let x: u32 = 7; // hi", Some(Path::new("m.rs")), None);
        assert_eq!(
            out,
            vec![
                seg("let", ColorClass::Keyword),
                seg(" x: ", ColorClass::Normal),
                seg("u32", ColorClass::Type),
                seg(" ", ColorClass::Normal),
                seg("=", ColorClass::Operator),
                seg(" ", ColorClass::Normal),
                seg("7", ColorClass::Number),
                seg("; ", ColorClass::Normal),
                seg("// hi", ColorClass::Comment),
            ]
        );
    }

    #[test]
    fn earlier_tag_claims_overlapping_region() {
        // The comment marker starts inside the string, which was accepted first.
        let out = plain().highlight(r#"s = "a # b""#, Some(Path::new("a.py")), None);
        assert_eq!(out.last(), Some(&seg(r#""a # b""#, ColorClass::String)));
    }

    #[test]
    fn python_definitions_color_keyword_and_name() {
        let hl = plain();
        let def = hl.highlight("def go():", Some(Path::new("a.py")), None);
        assert_eq!(def[0], seg("def go", ColorClass::Function));
        assert_eq!(def[1], seg("(", ColorClass::Bracket));
        let class = hl.highlight("class Foo:", Some(Path::new("a.py")), None);
        assert_eq!(
            class,
            vec![seg("class Foo", ColorClass::Type), seg(":", ColorClass::Bracket)]
        );
    }

    #[test]
    fn python_compound_operators_tag_single_chars() {
        // Single-char alternatives come first, so `**=` is three tags.
        let out = plain().highlight("x **= 2", Some(Path::new("a.py")), None);
        assert_eq!(
            out,
            vec![
                seg("x ", ColorClass::Normal),
                seg("*", ColorClass::Operator),
                seg("*", ColorClass::Operator),
                seg("=", ColorClass::Operator),
                seg(" ", ColorClass::Normal),
                seg("2", ColorClass::Number),
            ]
        );
    }

    #[test]
    fn css_selector_and_property_via_groups() {
        let hl = plain();
        let sel = hl.highlight("h1 {", Some(Path::new("s.css")), None);
        assert_eq!(sel[0], seg("h1", ColorClass::Keyword));
        let prop = hl.highlight("color: red;", Some(Path::new("s.css")), None);
        assert_eq!(prop[0], seg("color", ColorClass::Operator));
    }

    #[test]
    fn override_beats_extension_and_none_clears() {
        let mut hl = plain();
        assert_eq!(hl.set_syntax("json").unwrap(), Some(Language::Json));
        assert_eq!(hl.language_for(Some(Path::new("a.py"))), Some(Language::Json));
        assert_eq!(hl.set_syntax("none").unwrap(), None);
        assert_eq!(hl.language_for(Some(Path::new("a.py"))), Some(Language::Python));
        assert!(matches!(
            hl.set_syntax("klingon"),
            Err(SyntaxError::UnknownLanguage(_))
        ));
        assert_eq!(hl.current_syntax(), None);
    }

    #[test]
    fn disabled_returns_whole_line() {
        let mut hl = plain();
        hl.settings_mut().enabled = false;
        assert_eq!(
            hl.highlight("fn x()  ", Some(Path::new("a.rs")), Some(4)),
            vec![seg("fn x()  ", ColorClass::Normal)]
        );
    }

    #[test]
    fn multibyte_columns_are_chars() {
        let out = plain().highlight("é(ü)", None, Some(3));
        assert_eq!(
            out,
            vec![
                seg("é", ColorClass::Normal),
                seg("(", ColorClass::Bracket),
                seg("ü", ColorClass::Normal),
                seg(")", ColorClass::Bracket),
            ]
        );
    }
}
