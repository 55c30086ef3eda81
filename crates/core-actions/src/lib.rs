//! Command layer for the Axiom editing core.
//!
//! A [`Session`] owns one document together with its view, highlighter,
//! configuration and remembered search. Command lines (`:f foo`, `:w`, ...)
//! go through [`dispatch`]; decoded edit keys go through [`handle_key`].
//! Both report their outcome as a [`DispatchResult`] plus an optional
//! [`StatusMessage`] stored on the session.

mod dispatcher;
pub mod io_ops;
mod session;

pub use dispatcher::command_parser::{CommandParser, ParsedCommand, SearchFlags, tokenize};
pub use dispatcher::{DispatchResult, dispatch, execute, handle_key};
pub use session::{
    DEFAULT_TEXT_ROWS, DEFAULT_WIDTH, EditKey, MessageKind, Session, StatusMessage,
};
