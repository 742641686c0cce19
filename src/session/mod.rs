//! Session State Module
//!
//! The per-session state machine data: current mode, candidate list,
//! selected author, single-flight guards and the debug flag.

pub mod state;

pub use state::{SessionMode, SessionState};
