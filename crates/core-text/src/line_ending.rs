//! Line terminator detection and splitting.

/// Line ending style used when joining lines back together on save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
    Cr,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }

    /// Short label used in status output.
    pub fn label(self) -> &'static str {
        match self {
            LineEnding::Lf => "LF",
            LineEnding::Cr => "CR",
            LineEnding::Crlf => "CRLF",
        }
    }

    /// Parse a user-facing name (`lf`/`unix`, `crlf`/`windows`, `cr`/`mac`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lf" | "unix" => Some(LineEnding::Lf),
            "crlf" | "windows" => Some(LineEnding::Crlf),
            "cr" | "mac" => Some(LineEnding::Cr),
            _ => None,
        }
    }

    /// Detect the style of decoded `text`: any CRLF wins, then any lone CR,
    /// otherwise LF.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::Crlf
        } else if text.contains('\r') {
            LineEnding::Cr
        } else {
            LineEnding::Lf
        }
    }
}

impl std::fmt::Display for LineEnding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Split `text` on `\r\n`, `\r` or `\n`. Every terminator opens a new line,
/// so a trailing terminator yields a trailing empty line and joining the
/// result with the detected ending reproduces the input. The result always
/// holds at least one line.
pub fn split_lines(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut seg_start = 0usize;
    let mut i = 0usize;
    // Only slice at ASCII terminator bytes so UTF-8 sequences stay intact.
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                lines.push(text[seg_start..i].to_string());
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                seg_start = i;
            }
            b'\n' => {
                lines.push(text[seg_start..i].to_string());
                i += 1;
                seg_start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(text[seg_start..].to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_takes_precedence() {
        assert_eq!(LineEnding::detect("a\nb\r\nc\r"), LineEnding::Crlf);
        assert_eq!(LineEnding::detect("a\rb\n"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("plain"), LineEnding::Lf);
    }

    #[test]
    fn splits_on_all_terminators() {
        assert_eq!(split_lines("a\r\nb\rc\nd"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn trailing_terminator_opens_empty_line() {
        assert_eq!(split_lines("a\nb\n"), vec!["a", "b", ""]);
        assert_eq!(split_lines("a\r\n"), vec!["a", ""]);
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("\n"), vec!["", ""]);
    }

    #[test]
    fn empty_text_yields_one_line() {
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn multibyte_content_survives() {
        assert_eq!(split_lines("é\r\nü"), vec!["é", "ü"]);
    }

    #[test]
    fn names_parse() {
        assert_eq!(LineEnding::from_name("Windows"), Some(LineEnding::Crlf));
        assert_eq!(LineEnding::from_name("mac"), Some(LineEnding::Cr));
        assert_eq!(LineEnding::from_name("unix"), Some(LineEnding::Lf));
        assert_eq!(LineEnding::from_name("vms"), None);
    }
}
