//! Edit-mode key handling: cursor motion and text mutation.
//!
//! Every key leaves the cursor valid and on screen; the helpers on
//! `core_model::View` do the clamping and scrolling. Keys that cannot act
//! (backspace at the origin, delete at the very end) are clean no-ops.

use super::DispatchResult;
use crate::{EditKey, Session};
use core_model::Motion;

pub(crate) fn handle_key(key: EditKey, s: &mut Session) -> DispatchResult {
    let geom = s.geometry();
    let motion = match key {
        EditKey::Up => Some(Motion::Up),
        EditKey::Down => Some(Motion::Down),
        EditKey::Left => Some(Motion::Left),
        EditKey::Right => Some(Motion::Right),
        EditKey::Home => Some(Motion::Home),
        EditKey::End => Some(Motion::End),
        EditKey::PageUp => Some(Motion::PageUp),
        EditKey::PageDown => Some(Motion::PageDown),
        _ => None,
    };
    if let Some(motion) = motion {
        let before = s.view.clone();
        s.view.apply_motion(&s.document, motion, geom);
        return if s.view == before {
            DispatchResult::clean()
        } else {
            DispatchResult::dirty()
        };
    }

    let before = s.view.cursor;
    let result = match key {
        EditKey::Char(ch) => s.view.insert_char(&mut s.document, ch, geom).map(|_| true),
        EditKey::Tab => {
            let editor = &s.config.file.editor;
            let (spaces, width) = (editor.use_spaces_for_tabs, editor.tab_width);
            s.view
                .insert_tab(&mut s.document, spaces, width, geom)
                .map(|_| true)
        }
        EditKey::Enter => s.view.insert_newline(&mut s.document, geom).map(|_| true),
        EditKey::Backspace => Ok(s.view.backspace(&mut s.document, geom)),
        EditKey::Delete => Ok(s.view.delete_forward(&mut s.document, geom)),
        _ => Ok(false),
    };
    match result {
        Ok(true) => {
            tracing::trace!(target: "runtime.command", key = ?key, line = before.line, col = before.col, to_line = s.view.cursor.line, to_col = s.view.cursor.col, "edit");
            DispatchResult::dirty()
        }
        Ok(false) => DispatchResult::clean(),
        Err(e) => {
            tracing::error!(target: "runtime.command", key = ?key, error = %e, "edit_failed");
            s.error(super::capitalize(&e.to_string()));
            DispatchResult::dirty()
        }
    }
}
