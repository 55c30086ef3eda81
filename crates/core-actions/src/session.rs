//! Editor session state shared by command dispatch and key handling.

use core_config::{Config, SyntaxConfig};
use core_model::{View, ViewGeometry};
use core_search::SearchParams;
use core_syntax::{HighlightSettings, Highlighter, Segment};
use core_text::{Document, Encoding};
use tracing::{info, warn};

pub const DEFAULT_TEXT_ROWS: usize = 22;
pub const DEFAULT_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

impl MessageKind {
    pub fn label(self) -> &'static str {
        match self {
            MessageKind::Info => "info",
            MessageKind::Warning => "warning",
            MessageKind::Error => "error",
        }
    }
}

/// One-line status feedback produced by a command or key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
}

/// Edit-mode keys after terminal decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Backspace,
    Delete,
    Tab,
    Char(char),
}

pub(crate) fn highlight_settings(cfg: &SyntaxConfig) -> HighlightSettings {
    HighlightSettings {
        enabled: cfg.enabled,
        trailing_whitespace: cfg.highlight_trailing_whitespace,
        long_lines: cfg.highlight_long_lines,
        max_line_length: cfg.max_line_length,
        matching_brackets: cfg.highlight_matching_brackets,
    }
}

/// Everything one editing session owns: the document, the view onto it, the
/// highlighter, the active configuration and the last search.
#[derive(Debug)]
pub struct Session {
    pub document: Document,
    pub view: View,
    pub highlighter: Highlighter,
    pub config: Config,
    /// Parameters reused by `:fn` / `:fp`.
    pub last_search: Option<SearchParams>,
    pub message: Option<StatusMessage>,
    pub running: bool,
    geometry: ViewGeometry,
}

impl Session {
    pub fn new(config: Config) -> Self {
        let mut document = Document::new();
        let name = &config.file.files.default_encoding;
        match Encoding::from_name(name) {
            Some(enc) => document.set_encoding(enc),
            None => warn!(target: "config", encoding = %name, "default_encoding_unknown"),
        }
        let highlighter = Highlighter::new(highlight_settings(&config.file.syntax));
        let geometry = ViewGeometry::new(DEFAULT_TEXT_ROWS, DEFAULT_WIDTH, config.gutter());
        Self {
            document,
            view: View::new(),
            highlighter,
            config,
            last_search: None,
            message: None,
            running: true,
            geometry,
        }
    }

    pub fn geometry(&self) -> ViewGeometry {
        self.geometry
    }

    /// Record new terminal dimensions for the text area and keep the cursor on screen.
    pub fn resize(&mut self, text_rows: usize, width: usize) {
        self.geometry = ViewGeometry::new(text_rows, width, self.config.gutter());
        self.view.ensure_cursor_visible(self.geometry);
    }

    /// Re-derive the gutter after the line number setting changed.
    pub(crate) fn sync_gutter(&mut self) {
        self.geometry.gutter = self.config.gutter();
        self.view.ensure_cursor_visible(self.geometry);
    }

    pub fn set_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        let text = text.into();
        info!(target: "runtime.command", kind = kind.label(), text = %text, "status_message");
        self.message = Some(StatusMessage { text, kind });
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set_message(text, MessageKind::Info);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.set_message(text, MessageKind::Warning);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set_message(text, MessageKind::Error);
    }

    pub fn take_message(&mut self) -> Option<StatusMessage> {
        self.message.take()
    }

    /// Highlighted segments for document line `idx`, with bracket matching
    /// at the cursor when the cursor sits on that line.
    pub fn highlight_line(&self, idx: usize) -> Vec<Segment> {
        let line = self.document.line(idx).unwrap_or_default();
        let cursor = (self.view.cursor.line == idx).then_some(self.view.cursor.col);
        self.highlighter
            .highlight(line, self.document.filename(), cursor)
    }
}
