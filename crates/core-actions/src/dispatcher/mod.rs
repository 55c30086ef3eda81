//! Dispatcher applying command lines and edit keys to a [`Session`].
//!
//! Sub-modules:
//! * `command_parser` - tokenizing and classification into `ParsedCommand`
//! * `command` - file, quit, configuration and information commands
//! * `search` - find / replace commands and the remembered search
//! * `edit` - cursor motion and text mutation keys
//!
//! Every outcome a user should see lands in `Session::message`; dispatch
//! never panics on input and never terminates the process. Quitting only
//! clears `Session::running` and reports it through `DispatchResult::quit`.

use crate::{EditKey, Session};

mod command;
pub(crate) mod command_parser;
mod edit;
mod search;

use command_parser::{CommandParser, ParsedCommand};

/// Result of dispatching a single command line or key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// The document was replaced wholesale (`:o`); cached per-line render
    /// state must be discarded.
    pub buffer_replaced: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
            buffer_replaced: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            buffer_replaced: false,
        }
    }
    pub fn buffer_replaced() -> Self {
        Self {
            dirty: true,
            quit: false,
            buffer_replaced: true,
        }
    }
}

/// Library errors render lower-case; status messages start upper-case.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Parse and execute one command line.
pub fn dispatch(session: &mut Session, raw: &str) -> DispatchResult {
    let parsed = CommandParser::parse(raw);
    tracing::debug!(target: "runtime.command", raw, parsed = ?parsed, "dispatch");
    execute(session, parsed)
}

/// Execute an already-parsed command.
pub fn execute(session: &mut Session, cmd: ParsedCommand) -> DispatchResult {
    use ParsedCommand as C;
    match cmd {
        C::Empty => DispatchResult::clean(),
        C::Invalid(msg) => {
            session.error(msg);
            DispatchResult::dirty()
        }
        C::Unknown(name) => {
            tracing::warn!(target: "runtime.command", command = %name, "unknown_command");
            session.error(format!("Unknown command: {name}"));
            DispatchResult::dirty()
        }
        C::Find(_)
        | C::FindAdvanced { .. }
        | C::FindNext
        | C::FindPrevious
        | C::Replace { .. }
        | C::ReplaceAll { .. } => search::handle_search(cmd, session),
        other => command::handle_command(other, session),
    }
}

/// Apply one edit-mode key.
pub fn handle_key(session: &mut Session, key: EditKey) -> DispatchResult {
    edit::handle_key(key, session)
}
