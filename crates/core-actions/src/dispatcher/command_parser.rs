//! Command line tokenizing and classification.
//!
//! Converts a raw command line (with or without the leading ':') into a
//! `ParsedCommand`. Parsing is pure: no document, view or config access
//! happens here. Missing or malformed arguments become
//! `ParsedCommand::Invalid` carrying the usage text the dispatcher shows.
//!
//! Tokenizing rules:
//! * tokens are separated by whitespace outside double quotes;
//! * `"..."` groups a token (quotes are dropped, `""` is an empty token);
//! * `\` takes the next char literally, including quotes and spaces.

use std::path::PathBuf;

/// Short aliases resolved before command lookup.
const ALIASES: &[(&str, &str)] = &[
    ("w", "s"),
    ("write", "s"),
    ("e", "o"),
    ("edit", "o"),
    ("exit", "sq"),
    ("x", "sq"),
    ("numbers", "ln"),
    ("encoding", "enc"),
];

/// Split a command line into tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut has_token = false;
    let mut in_quotes = false;
    let mut escape_next = false;
    for ch in line.chars() {
        if escape_next {
            current.push(ch);
            has_token = true;
            escape_next = false;
        } else if ch == '\\' {
            escape_next = true;
        } else if ch == '"' {
            in_quotes = !in_quotes;
            has_token = true;
        } else if ch.is_whitespace() && !in_quotes {
            if has_token {
                parts.push(std::mem::take(&mut current));
                has_token = false;
            }
        } else {
            current.push(ch);
            has_token = true;
        }
    }
    if has_token {
        parts.push(current);
    }
    parts
}

/// Option switches accepted by `:fs` and `:ra`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchFlags {
    /// `-i` forces case-insensitive, `-c` case-sensitive; `None` keeps the configured default.
    pub case_sensitive: Option<bool>,
    pub regex: bool,
    pub whole_word: bool,
}

impl SearchFlags {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut flags = Self::default();
        for arg in args {
            match arg.as_str() {
                "-i" => flags.case_sensitive = Some(false),
                "-c" => flags.case_sensitive = Some(true),
                "-r" => flags.regex = true,
                "-w" => flags.whole_word = true,
                other => return Err(format!("Unknown search option: {other}")),
            }
        }
        Ok(flags)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Open(PathBuf),
    Save(Option<PathBuf>),
    SaveAs(PathBuf),
    /// 1-based line number.
    Goto(usize),
    Find(String),
    FindAdvanced { text: String, flags: SearchFlags },
    FindNext,
    FindPrevious,
    Replace { old: String, new: String },
    ReplaceAll { old: String, new: String, flags: SearchFlags },
    Quit { force: bool },
    SaveQuit,
    Set { option: String, value: String },
    Show(Option<String>),
    ToggleLineNumbers,
    Syntax(Option<String>),
    Encoding(Option<String>),
    LineEnding(Option<String>),
    Info,
    Stats,
    Help,
    /// Blank line; nothing to do.
    Empty,
    /// Known command with bad arguments; the payload is the message to show.
    Invalid(String),
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let s = raw.trim();
        let body = s.strip_prefix(':').unwrap_or(s);
        let mut tokens = tokenize(body).into_iter();
        let Some(first) = tokens.next() else {
            return ParsedCommand::Empty;
        };
        let args: Vec<String> = tokens.collect();
        let name = first.to_lowercase();
        let name = ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name.as_str(), |(_, target)| *target);
        Self::classify(name, args)
    }

    fn classify(name: &str, mut args: Vec<String>) -> ParsedCommand {
        use ParsedCommand as C;
        let usage = |text: &str| C::Invalid(format!("Usage: {text}"));
        match name {
            "o" | "open" => match args.first() {
                Some(p) => C::Open(PathBuf::from(p)),
                None => usage(":o <filename>"),
            },
            "s" | "save" => C::Save(args.first().map(PathBuf::from)),
            "sa" | "saveas" => match args.first() {
                Some(p) => C::SaveAs(PathBuf::from(p)),
                None => usage(":sa <filename>"),
            },
            "g" | "goto" => match args.first().map(|a| a.parse::<usize>()) {
                None => usage(":g <line_number>"),
                Some(Ok(n)) if n >= 1 => C::Goto(n),
                Some(_) => C::Invalid("Invalid line number".into()),
            },
            "f" | "find" => {
                if args.is_empty() {
                    usage(":f <search_text>")
                } else {
                    C::Find(args.join(" "))
                }
            }
            "fs" => {
                if args.is_empty() {
                    return usage(":fs <text> [-i -c -r -w]");
                }
                let text = args.remove(0);
                match SearchFlags::parse(&args) {
                    Ok(flags) => C::FindAdvanced { text, flags },
                    Err(msg) => C::Invalid(msg),
                }
            }
            "fn" => C::FindNext,
            "fp" => C::FindPrevious,
            "r" | "replace" => {
                if args.len() < 2 {
                    return usage(":r <old_text> <new_text>");
                }
                let new = args.remove(1);
                let old = args.remove(0);
                C::Replace { old, new }
            }
            "ra" => {
                if args.len() < 2 {
                    return usage(":ra <old_text> <new_text> [-i -c -r -w]");
                }
                let rest = args.split_off(2);
                let new = args.remove(1);
                let old = args.remove(0);
                match SearchFlags::parse(&rest) {
                    Ok(flags) => C::ReplaceAll { old, new, flags },
                    Err(msg) => C::Invalid(msg),
                }
            }
            "q" | "quit" => C::Quit { force: false },
            "q!" => C::Quit { force: true },
            "sq" | "wq" => C::SaveQuit,
            "set" => {
                if args.len() < 2 {
                    return usage(":set <option> <value>");
                }
                let value = args.remove(1);
                let option = args.remove(0).to_lowercase();
                C::Set { option, value }
            }
            "show" => C::Show(args.first().map(|a| a.to_lowercase())),
            "ln" => C::ToggleLineNumbers,
            "syntax" => C::Syntax(args.first().map(|a| a.to_lowercase())),
            "enc" => C::Encoding(args.into_iter().next()),
            "eol" => C::LineEnding(args.first().map(|a| a.to_lowercase())),
            "info" => C::Info,
            "stats" => C::Stats,
            "help" | "h" => C::Help,
            other => C::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_quotes_and_escapes() {
        assert_eq!(tokenize("  a   b "), vec!["a", "b"]);
        assert_eq!(tokenize(r#"r "foo bar" baz"#), vec!["r", "foo bar", "baz"]);
        assert_eq!(tokenize(r#"r a\ b \"q\""#), vec!["r", "a b", "\"q\""]);
        assert_eq!(tokenize(r#"ra x """#), vec!["ra", "x", ""]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn tokenize_unclosed_quote_runs_to_end() {
        assert_eq!(tokenize(r#"f "a b"#), vec!["f", "a b"]);
    }

    #[test]
    fn parse_quit() {
        assert_eq!(CommandParser::parse(":q"), ParsedCommand::Quit { force: false });
        assert_eq!(CommandParser::parse("q!"), ParsedCommand::Quit { force: true });
        assert_eq!(CommandParser::parse(":wq"), ParsedCommand::SaveQuit);
        assert_eq!(CommandParser::parse(":x"), ParsedCommand::SaveQuit);
    }

    #[test]
    fn parse_write_aliases() {
        assert_eq!(CommandParser::parse(":w"), ParsedCommand::Save(None));
        assert_eq!(
            CommandParser::parse(":write out.txt"),
            ParsedCommand::Save(Some(PathBuf::from("out.txt")))
        );
    }

    #[test]
    fn parse_edit() {
        match CommandParser::parse(":e  foo.txt") {
            ParsedCommand::Open(p) => assert_eq!(p, PathBuf::from("foo.txt")),
            other => panic!("expected Open, got {:?}", other),
        }
        assert_eq!(
            CommandParser::parse(":o"),
            ParsedCommand::Invalid("Usage: :o <filename>".into())
        );
    }

    #[test]
    fn parse_goto() {
        assert_eq!(CommandParser::parse(":g 12"), ParsedCommand::Goto(12));
        assert_eq!(
            CommandParser::parse(":g 0"),
            ParsedCommand::Invalid("Invalid line number".into())
        );
        assert_eq!(
            CommandParser::parse(":goto x"),
            ParsedCommand::Invalid("Invalid line number".into())
        );
    }

    #[test]
    fn find_joins_words() {
        assert_eq!(
            CommandParser::parse(":f hello  world"),
            ParsedCommand::Find("hello world".into())
        );
    }

    #[test]
    fn search_flags() {
        assert_eq!(
            CommandParser::parse(":fs foo -i -w"),
            ParsedCommand::FindAdvanced {
                text: "foo".into(),
                flags: SearchFlags {
                    case_sensitive: Some(false),
                    regex: false,
                    whole_word: true,
                },
            }
        );
        assert_eq!(
            CommandParser::parse(r#":ra "a+" b -r -c"#),
            ParsedCommand::ReplaceAll {
                old: "a+".into(),
                new: "b".into(),
                flags: SearchFlags {
                    case_sensitive: Some(true),
                    regex: true,
                    whole_word: false,
                },
            }
        );
        assert_eq!(
            CommandParser::parse(":fs foo -z"),
            ParsedCommand::Invalid("Unknown search option: -z".into())
        );
    }

    #[test]
    fn replace_needs_two_args() {
        assert!(matches!(CommandParser::parse(":r a"), ParsedCommand::Invalid(_)));
        assert_eq!(
            CommandParser::parse(":r a b"),
            ParsedCommand::Replace {
                old: "a".into(),
                new: "b".into()
            }
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(CommandParser::parse(":HELP"), ParsedCommand::Help);
        assert_eq!(CommandParser::parse(":Numbers"), ParsedCommand::ToggleLineNumbers);
        assert_eq!(
            CommandParser::parse(":encoding Latin-1"),
            ParsedCommand::Encoding(Some("Latin-1".into()))
        );
    }

    #[test]
    fn parse_unknown_and_empty() {
        assert_eq!(
            CommandParser::parse(":doesnotexist"),
            ParsedCommand::Unknown("doesnotexist".into())
        );
        assert_eq!(CommandParser::parse(":"), ParsedCommand::Empty);
        assert_eq!(CommandParser::parse("   "), ParsedCommand::Empty);
    }
}
