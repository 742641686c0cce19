//! CLI Terminal Interface Module
//!
//! The interactive front-end around the interpreter:
//!
//! - `history` - input history with arrow-key recall
//! - `prompter` - raw-mode input loop and region-tagged output printing

pub mod history;
pub mod prompter;

pub use history::InputHistory;
pub use prompter::Prompter;
