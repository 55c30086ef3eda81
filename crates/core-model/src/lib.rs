//! Cursor and viewport controller.
//!
//! A [`View`] pairs the cursor with the scroll offsets of the visible
//! rectangle. Every public mutator leaves the view satisfying two invariants:
//! * the cursor addresses a valid line and a column no greater than that
//!   line's length (the append position is allowed);
//! * the cursor cell lies inside the rectangle described by the
//!   [`ViewGeometry`] supplied with the call.
//!
//! Geometry is passed in rather than stored: the terminal layer owns the
//! dimensions and may change them between calls.
//!
//! Vertical moves do not remember a preferred column. Moving onto a shorter
//! line truncates the column and moving back does not restore it.

use core_text::{Document, DocumentError, Position};
use tracing::trace;

/// Screen dimensions available to the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewGeometry {
    /// Rows available for text (excludes status and command lines).
    pub text_rows: usize,
    /// Total columns of the text area including the gutter.
    pub width: usize,
    /// Columns reserved on the left for line numbers (0 when hidden).
    pub gutter: usize,
}

impl ViewGeometry {
    pub fn new(text_rows: usize, width: usize, gutter: usize) -> Self {
        Self {
            text_rows,
            width,
            gutter,
        }
    }

    pub fn visible_rows(&self) -> usize {
        self.text_rows.max(1)
    }

    pub fn visible_cols(&self) -> usize {
        self.width.saturating_sub(self.gutter).max(1)
    }

    /// Lines moved by PageUp / PageDown: one less than a screenful.
    pub fn page_size(&self) -> usize {
        self.text_rows.saturating_sub(1).max(1)
    }
}

/// Top-left visible cell, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub scroll_x: usize,
    pub scroll_y: usize,
}

/// Discrete cursor movements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
}

/// New leading offset needed to keep `pos` inside `[first, first + extent)`,
/// or `None` when it is already visible.
pub fn compute_scroll_intent(first: usize, pos: usize, extent: usize) -> Option<usize> {
    if extent == 0 {
        return None;
    }
    if pos < first {
        Some(pos)
    } else if pos >= first + extent {
        Some(pos + 1 - extent)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub cursor: Position,
    pub viewport: Viewport,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor and scroll back to the origin (after opening a file).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply `motion`, then scroll the minimal amount to keep the cursor visible.
    pub fn apply_motion(&mut self, doc: &Document, motion: Motion, geom: ViewGeometry) {
        let last = doc.last_line();
        let Position { line, col } = self.cursor;
        match motion {
            Motion::Up => {
                if line > 0 {
                    self.cursor.line -= 1;
                    self.clamp_col(doc);
                }
            }
            Motion::Down => {
                if line < last {
                    self.cursor.line += 1;
                    self.clamp_col(doc);
                }
            }
            Motion::Left => {
                if col > 0 {
                    self.cursor.col -= 1;
                } else if line > 0 {
                    self.cursor.line -= 1;
                    self.cursor.col = doc.line_len(line - 1);
                }
            }
            Motion::Right => {
                if col < doc.line_len(line) {
                    self.cursor.col += 1;
                } else if line < last {
                    self.cursor = Position::new(line + 1, 0);
                }
            }
            Motion::Home => self.cursor.col = 0,
            Motion::End => self.cursor.col = doc.line_len(line),
            Motion::PageUp => {
                self.cursor.line = line.saturating_sub(geom.page_size());
                self.clamp_col(doc);
            }
            Motion::PageDown => {
                self.cursor.line = (line + geom.page_size()).min(last);
                self.clamp_col(doc);
            }
        }
        trace!(target: "view", ?motion, line = self.cursor.line, col = self.cursor.col, "motion");
        self.ensure_cursor_visible(geom);
    }

    /// Adjust scroll offsets so the cursor cell is inside the visible rectangle.
    /// Returns whether either offset changed.
    pub fn ensure_cursor_visible(&mut self, geom: ViewGeometry) -> bool {
        let mut changed = false;
        if let Some(y) =
            compute_scroll_intent(self.viewport.scroll_y, self.cursor.line, geom.visible_rows())
        {
            self.viewport.scroll_y = y;
            changed = true;
        }
        if let Some(x) =
            compute_scroll_intent(self.viewport.scroll_x, self.cursor.col, geom.visible_cols())
        {
            self.viewport.scroll_x = x;
            changed = true;
        }
        changed
    }

    /// Jump to the start of line `n` (clamped to the last line).
    pub fn goto_line(&mut self, doc: &Document, n: usize, geom: ViewGeometry) {
        self.cursor = Position::new(n.min(doc.last_line()), 0);
        self.ensure_cursor_visible(geom);
    }

    /// Place the cursor at an arbitrary position (e.g. a search hit), clamped.
    pub fn move_to(&mut self, doc: &Document, pos: Position, geom: ViewGeometry) {
        self.cursor = pos;
        self.clamp_to(doc);
        self.ensure_cursor_visible(geom);
    }

    /// Re-establish the cursor invariant after the document changed underneath.
    pub fn clamp_to(&mut self, doc: &Document) {
        self.cursor.clamp_to(doc.line_count(), |l| doc.line_len(l));
    }

    fn clamp_col(&mut self, doc: &Document) {
        self.cursor.col = self.cursor.col.min(doc.line_len(self.cursor.line));
    }

    /// On-screen `(row, col)` of the cursor including the gutter, or `None`
    /// when the cursor falls outside the text area.
    pub fn screen_cursor(&self, geom: ViewGeometry) -> Option<(usize, usize)> {
        let row = self.cursor.line.checked_sub(self.viewport.scroll_y)?;
        let col = self.cursor.col.checked_sub(self.viewport.scroll_x)? + geom.gutter;
        (row < geom.text_rows && col < geom.width).then_some((row, col))
    }

    /// Insert `ch` at the cursor. A line terminator behaves like Enter.
    pub fn insert_char(
        &mut self,
        doc: &mut Document,
        ch: char,
        geom: ViewGeometry,
    ) -> Result<(), DocumentError> {
        if matches!(ch, '\n' | '\r') {
            return self.insert_newline(doc, geom);
        }
        doc.insert_char(self.cursor.line, self.cursor.col, ch)?;
        self.cursor.col += 1;
        self.ensure_cursor_visible(geom);
        Ok(())
    }

    /// Insert `tab_width` spaces, or a literal tab when `use_spaces` is off.
    pub fn insert_tab(
        &mut self,
        doc: &mut Document,
        use_spaces: bool,
        tab_width: usize,
        geom: ViewGeometry,
    ) -> Result<(), DocumentError> {
        if use_spaces {
            for _ in 0..tab_width {
                self.insert_char(doc, ' ', geom)?;
            }
            Ok(())
        } else {
            self.insert_char(doc, '\t', geom)
        }
    }

    pub fn insert_newline(
        &mut self,
        doc: &mut Document,
        geom: ViewGeometry,
    ) -> Result<(), DocumentError> {
        doc.insert_newline(self.cursor.line, self.cursor.col)?;
        self.cursor = Position::new(self.cursor.line + 1, 0);
        self.ensure_cursor_visible(geom);
        Ok(())
    }

    /// Delete the char before the cursor, joining with the previous line at column 0.
    pub fn backspace(&mut self, doc: &mut Document, geom: ViewGeometry) -> bool {
        let Position { line, col } = self.cursor;
        let changed = if col > 0 {
            let removed = doc.delete_char(line, col - 1);
            if removed {
                self.cursor.col -= 1;
            }
            removed
        } else if line > 0 {
            let prev_len = doc.line_len(line - 1);
            let joined = doc.join_lines(line - 1);
            if joined {
                self.cursor = Position::new(line - 1, prev_len);
            }
            joined
        } else {
            false
        };
        self.ensure_cursor_visible(geom);
        changed
    }

    /// Delete the char under the cursor, joining the next line at end of line.
    pub fn delete_forward(&mut self, doc: &mut Document, geom: ViewGeometry) -> bool {
        let Position { line, col } = self.cursor;
        let changed = if col < doc.line_len(line) {
            doc.delete_char(line, col)
        } else {
            doc.join_lines(line)
        };
        self.ensure_cursor_visible(geom);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom(rows: usize, width: usize) -> ViewGeometry {
        ViewGeometry::new(rows, width, 0)
    }

    fn ten_lines() -> Document {
        Document::from_lines((0..10).map(|i| i.to_string()))
    }

    #[test]
    fn scroll_intent_basic() {
        assert_eq!(compute_scroll_intent(0, 3, 5), None);
        assert_eq!(compute_scroll_intent(0, 5, 5), Some(1));
        assert_eq!(compute_scroll_intent(4, 2, 5), Some(2));
        assert_eq!(compute_scroll_intent(4, 2, 0), None);
    }

    #[test]
    fn scrolls_down_and_up_minimally() {
        let d = ten_lines();
        let g = geom(5, 80);
        let mut v = View::new();
        for _ in 0..5 {
            v.apply_motion(&d, Motion::Down, g);
        }
        assert_eq!(v.cursor.line, 5);
        assert_eq!(v.viewport.scroll_y, 1);
        for _ in 0..4 {
            v.apply_motion(&d, Motion::Down, g);
        }
        assert_eq!(v.viewport.scroll_y, 5);
        v.apply_motion(&d, Motion::Down, g);
        assert_eq!(v.cursor.line, 9, "clamped at last line");
        v.goto_line(&d, 3, g);
        assert_eq!(v.viewport.scroll_y, 3);
    }

    #[test]
    fn vertical_move_truncates_column_without_memory() {
        let d = Document::from_text("long line\nab\nlong line");
        let g = geom(10, 80);
        let mut v = View::new();
        v.apply_motion(&d, Motion::End, g);
        assert_eq!(v.cursor.col, 9);
        v.apply_motion(&d, Motion::Down, g);
        assert_eq!(v.cursor, Position::new(1, 2));
        v.apply_motion(&d, Motion::Down, g);
        assert_eq!(v.cursor, Position::new(2, 2));
    }

    #[test]
    fn left_and_right_wrap_lines() {
        let d = Document::from_text("ab\ncd");
        let g = geom(10, 80);
        let mut v = View::new();
        v.apply_motion(&d, Motion::Left, g);
        assert_eq!(v.cursor, Position::origin(), "no-op at buffer start");
        v.apply_motion(&d, Motion::End, g);
        v.apply_motion(&d, Motion::Right, g);
        assert_eq!(v.cursor, Position::new(1, 0));
        v.apply_motion(&d, Motion::Left, g);
        assert_eq!(v.cursor, Position::new(0, 2));
        v.move_to(&d, Position::new(1, 2), g);
        v.apply_motion(&d, Motion::Right, g);
        assert_eq!(v.cursor, Position::new(1, 2), "no-op at buffer end");
    }

    #[test]
    fn paging_uses_rows_minus_one() {
        let d = Document::from_lines((0..100).map(|i| i.to_string()));
        let g = geom(20, 80);
        let mut v = View::new();
        v.apply_motion(&d, Motion::PageDown, g);
        assert_eq!(v.cursor.line, 19);
        v.apply_motion(&d, Motion::PageDown, g);
        assert_eq!(v.cursor.line, 38);
        assert_eq!(v.viewport.scroll_y, 19);
        v.apply_motion(&d, Motion::PageUp, g);
        assert_eq!(v.cursor.line, 19);
        assert_eq!(v.viewport.scroll_y, 19);
        for _ in 0..3 {
            v.apply_motion(&d, Motion::PageUp, g);
        }
        assert_eq!(v.cursor.line, 0);
        assert_eq!(v.viewport.scroll_y, 0);
    }

    #[test]
    fn horizontal_scroll_accounts_for_gutter() {
        let d = Document::from_text(&"x".repeat(40));
        let g = ViewGeometry::new(5, 15, 5);
        let mut v = View::new();
        v.apply_motion(&d, Motion::End, g);
        assert_eq!(v.viewport.scroll_x, 31);
        assert_eq!(v.screen_cursor(g), Some((0, 14)));
        v.apply_motion(&d, Motion::Home, g);
        assert_eq!(v.viewport.scroll_x, 0);
        assert_eq!(v.screen_cursor(g), Some((0, 5)));
    }

    #[test]
    fn screen_cursor_none_when_scrolled_away() {
        let v = View {
            cursor: Position::new(0, 0),
            viewport: Viewport {
                scroll_x: 0,
                scroll_y: 3,
            },
        };
        assert_eq!(v.screen_cursor(geom(5, 80)), None);
    }

    #[test]
    fn edits_move_cursor() {
        let mut d = Document::from_text("ac");
        let g = geom(10, 80);
        let mut v = View::new();
        v.apply_motion(&d, Motion::Right, g);
        v.insert_char(&mut d, 'b', g).unwrap();
        assert_eq!(d.line(0), Some("abc"));
        assert_eq!(v.cursor.col, 2);
        v.insert_newline(&mut d, g).unwrap();
        assert_eq!(d.lines(), &["ab".to_string(), "c".to_string()]);
        assert_eq!(v.cursor, Position::new(1, 0));
        assert!(v.backspace(&mut d, g));
        assert_eq!(d.line(0), Some("abc"));
        assert_eq!(v.cursor, Position::new(0, 2));
        assert!(v.delete_forward(&mut d, g));
        assert_eq!(d.line(0), Some("ab"));
        assert!(!v.delete_forward(&mut d, g));
    }

    #[test]
    fn typed_terminator_acts_as_enter() {
        let mut d = Document::from_text("xy");
        let g = geom(10, 80);
        let mut v = View::new();
        v.apply_motion(&d, Motion::Right, g);
        v.insert_char(&mut d, '\n', g).unwrap();
        assert_eq!(d.lines(), &["x".to_string(), "y".to_string()]);
        assert_eq!(v.cursor, Position::new(1, 0));
    }

    #[test]
    fn tab_inserts_spaces_or_tab() {
        let mut d = Document::new();
        let g = geom(10, 80);
        let mut v = View::new();
        v.insert_tab(&mut d, true, 4, g).unwrap();
        assert_eq!(d.line(0), Some("    "));
        assert_eq!(v.cursor.col, 4);
        v.insert_tab(&mut d, false, 4, g).unwrap();
        assert_eq!(d.line(0), Some("    \t"));
    }

    #[test]
    fn clamp_after_external_edit() {
        let mut d = Document::from_text("abcdef\nxyz");
        let mut v = View::new();
        v.cursor = Position::new(1, 3);
        d.join_lines(0);
        v.clamp_to(&d);
        assert_eq!(v.cursor, Position::new(0, 3));
    }
}
