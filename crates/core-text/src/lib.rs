//! Line-oriented document store.
//!
//! A [`Document`] is an ordered, never-empty sequence of lines plus the file
//! metadata needed to write it back (bound path, encoding, line ending) and a
//! `modified` flag. Columns are counted in chars throughout; helpers in this
//! crate translate them to byte offsets when slicing.
//!
//! Error policy:
//! * Structural edits on a line that does not exist (`insert_char`,
//!   `insert_newline`) fail with [`DocumentError::InvalidLine`]; a caller
//!   passing a bad line there has lost track of the cursor.
//! * Navigation-driven edits (`delete_char`, `join_lines`) treat out-of-range
//!   input as a no-op and report whether anything changed.
//! * File errors leave the in-memory document untouched.

use std::path::{Path, PathBuf};
use tracing::trace;

mod encoding;
mod error;
mod io;
mod line_ending;

pub use encoding::{CANDIDATES as ENCODING_CANDIDATES, DETECT_CHUNK, Encoding, Unencodable};
pub use error::DocumentError;
pub use io::DEFAULT_MAX_FILE_SIZE;
pub use line_ending::{LineEnding, split_lines};

/// A position inside a document expressed as (line index, char column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }
    /// Clamp into a document of `line_count` lines whose lengths are given by `line_len_fn`.
    pub fn clamp_to<F>(&mut self, line_count: usize, mut line_len_fn: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            self.line = 0;
            self.col = 0;
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max_len = line_len_fn(self.line);
        if self.col > max_len {
            self.col = max_len;
        }
    }
}

/// Byte offset of char column `col` in `s`; columns past the end map to `s.len()`.
pub fn char_to_byte(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(b, _)| b)
}

/// Char column of byte offset `byte` in `s` (clamped to the string length).
pub fn byte_to_char(s: &str, byte: usize) -> usize {
    let byte = byte.min(s.len());
    s.char_indices().take_while(|(b, _)| *b < byte).count()
}

/// Number of chars in `s`.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Snapshot of document statistics and metadata for status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStats {
    pub lines: usize,
    pub chars: usize,
    pub filename: Option<PathBuf>,
    pub encoding: Encoding,
    pub line_ending: LineEnding,
    pub modified: bool,
}

/// The in-memory text of one file.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    filename: Option<PathBuf>,
    encoding: Encoding,
    line_ending: LineEnding,
    modified: bool,
    total_chars: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty, unbound document holding a single empty line.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            filename: None,
            encoding: Encoding::Utf8,
            line_ending: LineEnding::Lf,
            modified: false,
            total_chars: 0,
        }
    }

    /// Build an unbound document from in-memory text, detecting its line ending.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.line_ending = LineEnding::detect(text);
        doc.lines = split_lines(text);
        doc.recompute_stats();
        doc
    }

    /// Build an unbound document from pre-split lines (an empty input yields one empty line).
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut doc = Self::new();
        doc.lines = lines.into_iter().map(Into::into).collect();
        if doc.lines.is_empty() {
            doc.lines.push(String::new());
        }
        doc.recompute_stats();
        doc
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line content, or `None` when `idx` is out of range.
    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// Char length of a line (0 when out of range).
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map_or(0, |l| char_len(l))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn last_line(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn total_lines(&self) -> usize {
        self.lines.len()
    }

    /// Sum of line lengths plus one separator per line boundary.
    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Change the separator used by the next save. Metadata only; content is untouched.
    pub fn set_line_ending(&mut self, ending: LineEnding) {
        self.line_ending = ending;
    }

    /// Change the encoding used by the next save.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// Resolve `name` and change the save encoding.
    pub fn set_encoding_name(&mut self, name: &str) -> Result<Encoding, DocumentError> {
        let enc =
            Encoding::from_name(name).ok_or_else(|| DocumentError::UnknownEncoding(name.into()))?;
        self.encoding = enc;
        Ok(enc)
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats {
            lines: self.total_lines(),
            chars: self.total_chars,
            filename: self.filename.clone(),
            encoding: self.encoding,
            line_ending: self.line_ending,
            modified: self.modified,
        }
    }

    /// Whole content joined with the current line ending.
    pub fn text(&self) -> String {
        self.lines.join(self.line_ending.as_str())
    }

    /// Insert `ch` at `(line, col)`. `col` past the end appends. A line
    /// terminator (`\n` or `\r`) splits the line like [`Self::insert_newline`].
    pub fn insert_char(&mut self, line: usize, col: usize, ch: char) -> Result<(), DocumentError> {
        if matches!(ch, '\n' | '\r') {
            return self.insert_newline(line, col);
        }
        let text = self
            .lines
            .get_mut(line)
            .ok_or(DocumentError::InvalidLine(line))?;
        let at = char_to_byte(text, col);
        text.insert(at, ch);
        self.total_chars += 1;
        self.touch();
        trace!(target: "text.edit", line, col, "insert_char");
        Ok(())
    }

    /// Remove the char at `(line, col)`. Returns whether anything was removed.
    pub fn delete_char(&mut self, line: usize, col: usize) -> bool {
        let Some(text) = self.lines.get_mut(line) else {
            return false;
        };
        let Some((at, _)) = text.char_indices().nth(col) else {
            return false;
        };
        text.remove(at);
        self.total_chars -= 1;
        self.touch();
        trace!(target: "text.edit", line, col, "delete_char");
        true
    }

    /// Split `line` at `col`: the left part stays, the right part becomes a new line below.
    pub fn insert_newline(&mut self, line: usize, col: usize) -> Result<(), DocumentError> {
        let text = self
            .lines
            .get_mut(line)
            .ok_or(DocumentError::InvalidLine(line))?;
        let at = char_to_byte(text, col);
        let right = text.split_off(at);
        self.lines.insert(line + 1, right);
        self.total_chars += 1;
        self.touch();
        trace!(target: "text.edit", line, col, "insert_newline");
        Ok(())
    }

    /// Append the following line onto `line` and remove it. No-op on the last
    /// line or out of range; returns whether a join happened.
    pub fn join_lines(&mut self, line: usize) -> bool {
        if line + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(line + 1);
        self.lines[line].push_str(&next);
        self.total_chars -= 1;
        self.touch();
        trace!(target: "text.edit", line, "join_lines");
        true
    }

    /// Replace the content of `line` wholesale (used by replace operations).
    ///
    /// Terminators inside `content` are honoured: the text is split with
    /// [`split_lines`] and the pieces take the place of `line`. Returns how
    /// many lines now stand where `line` was (1 for terminator-free content).
    pub fn set_line(&mut self, line: usize, content: String) -> Result<usize, DocumentError> {
        let slot = self
            .lines
            .get_mut(line)
            .ok_or(DocumentError::InvalidLine(line))?;
        let old = char_len(slot);
        if !content.contains(['\n', '\r']) {
            let new = char_len(&content);
            *slot = content;
            self.total_chars = self.total_chars + new - old;
            self.touch();
            return Ok(1);
        }
        let pieces = split_lines(&content);
        let count = pieces.len();
        let new = pieces.iter().map(|p| char_len(p)).sum::<usize>() + (count - 1);
        self.lines.splice(line..=line, pieces);
        self.total_chars = self.total_chars + new - old;
        self.touch();
        trace!(target: "text.edit", line, count, "set_line_split");
        Ok(count)
    }

    fn touch(&mut self) {
        self.modified = true;
        debug_assert!(!self.lines.is_empty(), "document always holds a line");
    }

    fn recompute_stats(&mut self) {
        self.total_chars =
            self.lines.iter().map(|l| char_len(l)).sum::<usize>() + (self.lines.len() - 1);
    }
}
