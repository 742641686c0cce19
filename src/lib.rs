//! scholar-term - interactive terminal for scholarly-author search
//!
//! A command-terminal front-end for the OpenAlex author/works API. A session
//! moves between three modes: idle search, author disambiguation, and
//! works analysis for one selected author.
//!
//! # Architecture
//!
//! - **`api`** - HTTP gateway: issues single requests to the search service
//!   and maps failures into a typed `ApiError` taxonomy
//! - **`session`** - per-session state machine data: mode, candidate list,
//!   selected author, single-flight guards
//! - **`interpreter`** - the core: classifies each input line into a closed
//!   `Command`, drives the gateway, and emits ordered display intents
//! - **`display`** - four independent output regions fed by those intents
//! - **`cli`** - the interactive prompter binary glue
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scholar_term::api::OpenAlexClient;
//! use scholar_term::interpreter::Interpreter;
//!
//! # async fn run() {
//! let gateway = OpenAlexClient::new().unwrap();
//! let mut interpreter = Interpreter::new(gateway);
//! let turn = interpreter.handle_line("carl sagan").await;
//! for intent in &turn.intents {
//!     println!("{}: {}", intent.region, intent.content);
//! }
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod display;
pub mod interpreter;
pub mod session;

// Re-export the types most callers need.
pub use api::{ApiError, AuthorSearchApi, OpenAlexClient};
pub use display::{DisplayIntent, DisplayRouter, Region};
pub use interpreter::{Command, Interpreter, Turn};
pub use session::{SessionMode, SessionState};
