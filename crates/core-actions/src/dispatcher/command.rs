//! File, quit, configuration and information commands.

use super::{DispatchResult, capitalize};
use super::command_parser::ParsedCommand;
use crate::Session;
use crate::io_ops::{open_file, write_file};
use core_text::LineEnding;
use std::path::Path;

const HELP_TEXT: [&str; 6] = [
    "Axiom Text Editor Commands:",
    "File: :o <file> (open), :s (save), :sa <file> (save as), :q (quit)",
    "Edit: :g <line> (goto), :f <text> (find), :r <old> <new> (replace)",
    "Advanced: :fs <text> [-i -c -r -w] (advanced find), :ra <old> <new> [-i -c -r -w] (replace all), :fn (find next), :fp (find previous)",
    "Config: :set <opt> <val>, :show <opt>, :ln (line numbers), :syntax <type>, :enc <name>, :eol <type>",
    "Other: :help, :info, :stats",
];

const UNSAVED_WARNING: &str = "Unsaved changes! Use :q! to force quit or :sq to save and quit";

pub(crate) fn handle_command(cmd: ParsedCommand, s: &mut Session) -> DispatchResult {
    use ParsedCommand as C;
    match cmd {
        C::Open(path) => handle_open(&path, s),
        C::Save(target) => handle_save(target.as_deref(), s),
        C::SaveAs(target) => handle_save(Some(&target), s),
        C::Goto(n) => {
            let geom = s.geometry();
            s.view.goto_line(&s.document, n - 1, geom);
            let line = s.view.cursor.line + 1;
            s.info(format!("Moved to line {line}"));
            DispatchResult::dirty()
        }
        C::Quit { force } => handle_quit(force, s),
        C::SaveQuit => match write_file(&mut s.document, None) {
            Ok(_) => {
                s.running = false;
                DispatchResult::quit()
            }
            Err(e) => {
                s.error(format!("Cannot save and quit: {}", e.root_cause()));
                DispatchResult::dirty()
            }
        },
        C::Set { option, value } => handle_set(&option, &value, s),
        C::Show(option) => handle_show(option.as_deref(), s),
        C::ToggleLineNumbers => {
            let editor = &mut s.config.file.editor;
            editor.show_line_numbers = !editor.show_line_numbers;
            let state = enabled_label(editor.show_line_numbers);
            s.sync_gutter();
            s.info(format!("Line numbers {state}"));
            DispatchResult::dirty()
        }
        C::Syntax(None) => {
            let current = s
                .highlighter
                .current_syntax()
                .map_or("auto-detect", |l| l.name());
            s.info(format!("Current syntax: {current}"));
            DispatchResult::clean()
        }
        C::Syntax(Some(name)) => {
            match s.highlighter.set_syntax(&name) {
                Ok(_) => s.info(format!("Syntax highlighting set to: {name}")),
                Err(e) => s.error(capitalize(&e.to_string())),
            }
            DispatchResult::dirty()
        }
        C::Encoding(None) => {
            let enc = s.document.encoding();
            s.info(format!("Current encoding: {enc}"));
            DispatchResult::clean()
        }
        C::Encoding(Some(name)) => {
            match s.document.set_encoding_name(&name) {
                Ok(enc) => s.info(format!("Encoding set to: {enc}")),
                Err(e) => s.error(capitalize(&e.to_string())),
            }
            DispatchResult::dirty()
        }
        C::LineEnding(None) => {
            let eol = s.document.line_ending();
            s.info(format!("Current line ending: {eol}"));
            DispatchResult::clean()
        }
        C::LineEnding(Some(name)) => {
            match LineEnding::from_name(&name) {
                Some(eol) => {
                    s.document.set_line_ending(eol);
                    s.info(format!("Line ending set to: {name}"));
                }
                None => s.error(format!("Unknown line ending type: {name}")),
            }
            DispatchResult::dirty()
        }
        C::Info => {
            let st = s.document.stats();
            let name = st
                .filename
                .as_deref()
                .map_or_else(|| "[No File]".to_string(), |p| p.display().to_string());
            let state = if st.modified { "[Modified]" } else { "[Saved]" };
            s.info(format!(
                "File: {name} | Lines: {} | Chars: {} | Encoding: {} | {state}",
                st.lines, st.chars, st.encoding
            ));
            DispatchResult::clean()
        }
        C::Stats => {
            let st = s.document.stats();
            s.info(format!(
                "Lines: {} | Chars: {} | Encoding: {} | Line ending: {}",
                st.lines, st.chars, st.encoding, st.line_ending
            ));
            DispatchResult::clean()
        }
        C::Help => {
            s.info(HELP_TEXT.join(" | "));
            DispatchResult::clean()
        }
        other => {
            tracing::error!(target: "runtime.command", cmd = ?other, "misrouted_command");
            DispatchResult::clean()
        }
    }
}

fn enabled_label(on: bool) -> &'static str {
    if on { "enabled" } else { "disabled" }
}

fn handle_open(path: &Path, s: &mut Session) -> DispatchResult {
    let max = s.config.file.files.max_file_size;
    match open_file(&mut s.document, path, max) {
        Ok(()) => {
            s.view.reset();
            s.info(format!("Opened '{}'", path.display()));
            DispatchResult::buffer_replaced()
        }
        Err(e) => {
            tracing::error!(target: "io", error = %format!("{e:#}"), "file_open_error");
            s.error(format!("{e:#}"));
            DispatchResult::dirty()
        }
    }
}

fn handle_save(target: Option<&Path>, s: &mut Session) -> DispatchResult {
    match write_file(&mut s.document, target) {
        Ok(written) => s.info(format!("Saved '{}'", written.display())),
        Err(e) => {
            tracing::error!(target: "io", error = %format!("{e:#}"), "file_write_error");
            s.error(format!("{e:#}"));
        }
    }
    DispatchResult::dirty()
}

fn handle_quit(force: bool, s: &mut Session) -> DispatchResult {
    if s.document.is_modified() && !force {
        s.warning(UNSAVED_WARNING);
        return DispatchResult::dirty();
    }
    s.running = false;
    DispatchResult::quit()
}

fn handle_set(option: &str, value: &str, s: &mut Session) -> DispatchResult {
    if option == "encoding" {
        match s.document.set_encoding_name(value) {
            Ok(enc) => s.info(format!("Encoding set to {enc}")),
            Err(e) => s.error(capitalize(&e.to_string())),
        }
        return DispatchResult::dirty();
    }
    if let Err(e) = s.config.set_option(option, value) {
        s.error(capitalize(&e.to_string()));
        return DispatchResult::dirty();
    }
    let editor = &s.config.file.editor;
    let msg = match option {
        "tabwidth" => format!("Tab width set to {}", editor.tab_width),
        "linenumbers" => format!("Line numbers {}", enabled_label(editor.show_line_numbers)),
        _ => format!("Spaces for tabs {}", enabled_label(editor.use_spaces_for_tabs)),
    };
    s.sync_gutter();
    s.info(msg);
    DispatchResult::dirty()
}

fn handle_show(option: Option<&str>, s: &mut Session) -> DispatchResult {
    match option {
        None => {
            let e = &s.config.file.editor;
            let all = [
                format!("Tab width: {}", e.tab_width),
                format!("Show line numbers: {}", e.show_line_numbers),
                format!("Use spaces for tabs: {}", e.use_spaces_for_tabs),
                format!("Encoding: {}", s.document.encoding()),
                format!("Line ending: {}", s.document.line_ending()),
            ];
            s.info(all.join(" | "));
        }
        Some("encoding") => {
            let enc = s.document.encoding();
            s.info(format!("Encoding: {enc}"));
        }
        Some(name) => match s.config.show_option(name) {
            Some(text) => s.info(text),
            None => s.error(format!("Unknown option: {name}")),
        },
    }
    DispatchResult::clean()
}
