/*
 * The application logic layer: `TallySession`, which owns the state of one
 * editing session, and the command handler that maps user input onto it.
 * Unit tests for `TallySession` are in `session_tests.rs`.
 */
pub mod handler;
pub mod session;

#[cfg(test)]
mod session_tests;

pub use handler::{HandlerError, Reply, TallyCommand, handle_line};
pub use session::{APP_NAME, ListRow, SessionError, TallySession};
