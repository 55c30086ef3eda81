//! Find / replace commands.
//!
//! `:f` is always a case-sensitive literal search. `:fs` and `:ra` start from
//! the `[search]` config defaults and let `-i`/`-c`/`-r`/`-w` override them.
//! Forward searches begin one column right of the cursor so repeating a
//! search advances past the current hit.

use super::{DispatchResult, capitalize};
use super::command_parser::{ParsedCommand, SearchFlags};
use crate::Session;
use core_config::SearchConfig;
use core_search::{SearchError, SearchParams, find, find_previous, replace_all, replace_range};
use core_text::{Position, char_len, split_lines};

pub(crate) fn handle_search(cmd: ParsedCommand, s: &mut Session) -> DispatchResult {
    use ParsedCommand as C;
    match cmd {
        C::Find(text) => {
            let params = SearchParams::literal(text);
            s.last_search = Some(params.clone());
            search_forward(s, &params, "Found")
        }
        C::FindAdvanced { text, flags } => {
            let params = with_flags(&s.config.file.search, text, flags);
            s.last_search = Some(params.clone());
            search_forward(s, &params, "Found")
        }
        C::FindNext => match s.last_search.clone() {
            Some(params) => search_forward(s, &params, "Found next"),
            None => no_previous_search(s),
        },
        C::FindPrevious => match s.last_search.clone() {
            Some(params) => search_backward(s, &params),
            None => no_previous_search(s),
        },
        C::Replace { old, new } => replace_next(s, old, &new),
        C::ReplaceAll { old, new, flags } => {
            let params = with_flags(&s.config.file.search, old, flags);
            replace_every(s, &params, &new)
        }
        other => {
            tracing::error!(target: "runtime.command", cmd = ?other, "misrouted_command");
            DispatchResult::clean()
        }
    }
}

fn with_flags(defaults: &SearchConfig, text: String, flags: SearchFlags) -> SearchParams {
    SearchParams {
        text,
        case_sensitive: flags.case_sensitive.unwrap_or(defaults.case_sensitive),
        use_regex: flags.regex || defaults.regex,
        whole_word: flags.whole_word,
    }
}

/// ` (case-insensitive, regex)` style suffix, empty for a plain search.
fn describe(params: &SearchParams) -> String {
    let mut opts = Vec::new();
    if !params.case_sensitive {
        opts.push("case-insensitive");
    }
    if params.use_regex {
        opts.push("regex");
    }
    if params.whole_word {
        opts.push("whole word");
    }
    if opts.is_empty() {
        String::new()
    } else {
        format!(" ({})", opts.join(", "))
    }
}

fn no_previous_search(s: &mut Session) -> DispatchResult {
    s.warning("No previous search. Use :f or :fs first");
    DispatchResult::clean()
}

fn search_failed(s: &mut Session, e: SearchError) -> DispatchResult {
    tracing::warn!(target: "search", error = %e, "search_failed");
    s.error(capitalize(&e.to_string()));
    DispatchResult::dirty()
}

fn search_forward(s: &mut Session, params: &SearchParams, verb: &str) -> DispatchResult {
    let start = Position::new(s.view.cursor.line, s.view.cursor.col + 1);
    let wrap = s.config.file.search.wrap_around;
    match find(&s.document, params, start.line, start.col, wrap) {
        Ok(Some(m)) => {
            let geom = s.geometry();
            s.view.move_to(&s.document, Position::new(m.line, m.start), geom);
            let wrapped = if Position::new(m.line, m.start) < start {
                " (wrapped)"
            } else {
                ""
            };
            s.info(format!(
                "{verb} '{}' at line {}{}{wrapped}",
                params.text,
                m.line + 1,
                describe(params)
            ));
            DispatchResult::dirty()
        }
        Ok(None) if verb == "Found next" => {
            s.warning(format!("No more occurrences of '{}'", params.text));
            DispatchResult::clean()
        }
        Ok(None) => {
            s.warning(format!("Text '{}' not found", params.text));
            DispatchResult::clean()
        }
        Err(e) => search_failed(s, e),
    }
}

fn search_backward(s: &mut Session, params: &SearchParams) -> DispatchResult {
    let Position { line, col } = s.view.cursor;
    match find_previous(&s.document, params, line, col) {
        Ok(Some(m)) => {
            let geom = s.geometry();
            s.view.move_to(&s.document, Position::new(m.line, m.start), geom);
            s.info(format!(
                "Found previous '{}' at line {}",
                params.text,
                m.line + 1
            ));
            DispatchResult::dirty()
        }
        Ok(None) => {
            s.warning(format!("No previous occurrences of '{}'", params.text));
            DispatchResult::clean()
        }
        Err(e) => search_failed(s, e),
    }
}

/// Replace the first literal match at or after the cursor and park the
/// cursor just past the inserted text.
fn replace_next(s: &mut Session, old: String, new: &str) -> DispatchResult {
    let params = SearchParams::literal(old);
    let Position { line, col } = s.view.cursor;
    match find(&s.document, &params, line, col, false) {
        Ok(Some(m)) => {
            replace_range(&mut s.document, m.line, m.start, m.end, new);
            let geom = s.geometry();
            let pieces = split_lines(new);
            let pos = match pieces.as_slice() {
                [only] => Position::new(m.line, m.start + char_len(only)),
                [.., last] => Position::new(m.line + pieces.len() - 1, char_len(last)),
                [] => Position::new(m.line, m.start),
            };
            s.view.move_to(&s.document, pos, geom);
            s.info(format!("Replaced '{}' with '{new}'", params.text));
            DispatchResult::dirty()
        }
        Ok(None) => {
            s.warning(format!("Text '{}' not found", params.text));
            DispatchResult::clean()
        }
        Err(e) => search_failed(s, e),
    }
}

fn replace_every(s: &mut Session, params: &SearchParams, new: &str) -> DispatchResult {
    match replace_all(&mut s.document, params, new) {
        Ok(0) => {
            s.warning(format!("No occurrences of '{}' found", params.text));
            DispatchResult::clean()
        }
        Ok(count) => {
            let geom = s.geometry();
            s.view.clamp_to(&s.document);
            s.view.ensure_cursor_visible(geom);
            s.info(format!("Replaced {count} occurrences{}", describe(params)));
            DispatchResult::dirty()
        }
        Err(e) => {
            tracing::warn!(target: "search", error = %e, "replace_failed");
            s.error(format!("Replace failed: {e}"));
            DispatchResult::dirty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MessageKind, dispatch};
    use core_config::Config;
    use core_text::Document;

    fn session(text: &str) -> Session {
        let mut s = Session::new(Config::default());
        s.document = Document::from_text(text);
        s
    }

    #[test]
    fn find_moves_cursor_and_remembers() {
        let mut s = session("abc\ndef");
        dispatch(&mut s, ":f de");
        assert_eq!(s.view.cursor, Position::new(1, 0));
        assert_eq!(s.take_message().unwrap().text, "Found 'de' at line 2");
        assert_eq!(s.last_search, Some(SearchParams::literal("de")));
    }

    #[test]
    fn find_wraps_back_to_the_top() {
        let mut s = session("foo\nbar\nfoo");
        s.view.cursor = Position::new(2, 0);
        dispatch(&mut s, ":f foo");
        assert_eq!(s.view.cursor, Position::new(0, 0));
        assert_eq!(
            s.take_message().unwrap().text,
            "Found 'foo' at line 1 (wrapped)"
        );
    }

    #[test]
    fn find_without_wrap_reports_missing() {
        let mut s = session("foo\nbar");
        s.config.file.search.wrap_around = false;
        s.view.cursor = Position::new(1, 0);
        dispatch(&mut s, ":f foo");
        let m = s.take_message().unwrap();
        assert_eq!(m.kind, MessageKind::Warning);
        assert_eq!(m.text, "Text 'foo' not found");
        assert_eq!(s.view.cursor, Position::new(1, 0));
    }

    #[test]
    fn advanced_find_uses_config_defaults() {
        let mut s = session("x FOO foo");
        dispatch(&mut s, ":fs foo");
        assert_eq!(s.view.cursor, Position::new(0, 2));
        assert_eq!(
            s.take_message().unwrap().text,
            "Found 'foo' at line 1 (case-insensitive)"
        );
        s.view.cursor = Position::new(0, 0);
        dispatch(&mut s, ":fs foo -c");
        assert_eq!(s.view.cursor, Position::new(0, 6));
    }

    #[test]
    fn find_next_and_previous() {
        let mut s = session("ab ab ab");
        dispatch(&mut s, ":fn");
        assert_eq!(
            s.take_message().unwrap().text,
            "No previous search. Use :f or :fs first"
        );
        dispatch(&mut s, ":f ab");
        assert_eq!(s.view.cursor.col, 3);
        dispatch(&mut s, ":fn");
        assert_eq!(s.view.cursor.col, 6);
        assert_eq!(s.take_message().unwrap().text, "Found next 'ab' at line 1");
        dispatch(&mut s, ":fp");
        assert_eq!(s.view.cursor.col, 3);
        dispatch(&mut s, ":fp");
        dispatch(&mut s, ":fp");
        assert_eq!(s.view.cursor.col, 0);
        assert_eq!(
            s.take_message().unwrap().text,
            "No previous occurrences of 'ab'"
        );
    }

    #[test]
    fn invalid_regex_is_an_error_message() {
        let mut s = session("abc");
        dispatch(&mut s, ":fs ( -r");
        let m = s.take_message().unwrap();
        assert_eq!(m.kind, MessageKind::Error);
        assert!(m.text.starts_with("Invalid regex pattern"));
    }

    #[test]
    fn replace_next_moves_past_insert() {
        let mut s = session("one two two");
        dispatch(&mut s, ":r two 2");
        assert_eq!(s.document.line(0), Some("one 2 two"));
        assert_eq!(s.view.cursor, Position::new(0, 5));
        assert!(s.document.is_modified());
        dispatch(&mut s, ":r nine 9");
        assert_eq!(s.take_message().unwrap().text, "Text 'nine' not found");
    }

    #[test]
    fn replacements_with_newlines_split_lines() {
        let mut s = session("a,b c");
        dispatch(&mut s, ":r , \"\n\"");
        assert_eq!(s.document.lines(), ["a", "b c"]);
        assert_eq!(s.view.cursor, Position::new(1, 0));
        dispatch(&mut s, ":ra \" \" \"\n-\"");
        assert_eq!(s.document.lines(), ["a", "b", "-c"]);
        assert_eq!(
            s.take_message().unwrap().text,
            "Replaced 1 occurrences (case-insensitive)"
        );
        assert!(s.document.lines().iter().all(|l| !l.contains('\n')));
    }

    #[test]
    fn replace_all_counts_and_clamps() {
        let mut s = session("foo bar foo\nfoo");
        s.view.cursor = Position::new(0, 10);
        dispatch(&mut s, ":ra foo z -c");
        assert_eq!(s.document.lines(), ["z bar z", "z"]);
        assert_eq!(s.take_message().unwrap().text, "Replaced 3 occurrences");
        assert_eq!(s.view.cursor, Position::new(0, 7));
        dispatch(&mut s, ":ra qq z");
        assert_eq!(
            s.take_message().unwrap().text,
            "No occurrences of 'qq' found"
        );
    }

    #[test]
    fn replace_all_regex_expands_groups() {
        let mut s = session("key=value");
        dispatch(&mut s, r#":ra "(\\w+)=(\\w+)" "$2=$1" -r -c"#);
        assert_eq!(s.document.line(0), Some("value=key"));
        assert_eq!(
            s.take_message().unwrap().text,
            "Replaced 1 occurrences (regex)"
        );
    }
}
