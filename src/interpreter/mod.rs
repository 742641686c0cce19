//! Command Interpreter Module
//!
//! The session state machine: one line of input plus the current mode
//! produces a closed [`Command`], and the [`Interpreter`] drives the gateway
//! and emits display intents for the router.

pub mod command;
pub mod engine;

pub use command::{Command, UsageError};
pub use engine::{Interpreter, Turn};
