//! Command parsing.
//!
//! One line of raw input plus the current session mode produces exactly one
//! [`Command`] variant. All string inspection lives here; the engine matches
//! the closed enum exhaustively and never looks at raw text again.

use crate::api::WorksFilter;
use crate::session::SessionMode;

/// Accepted publication-year window for `year <yyyy>`.
pub const YEAR_MIN: u16 = 1500;
pub const YEAR_MAX: u16 = 2100;

/// Every action a line of input can request, classified by the current mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Whitespace-only line; a no-op.
    Empty,
    /// Mode-sensitive command summary.
    Help,
    /// End the terminal session (Idle only).
    Quit,
    /// Free-text author-name query.
    Search(String),
    /// 1-based pick from the displayed candidate list.
    Select(usize),
    /// `y`/`yes`: shorthand for selecting position 1.
    AcceptFirst,
    /// `n`/`no`: stay in disambiguation and re-prompt.
    Reject,
    /// Explicit cancel out of disambiguation, back to idle.
    Cancel,
    /// Works-mode query with its filter.
    Works(WorksFilter),
    /// `show <n>`: expand the n-th visible work into the detail region.
    ShowWork(usize),
    /// Author summary statistics.
    Stats,
    /// Author topic distribution.
    Topics,
    /// Toggle the in-session debug trace.
    ToggleDebug,
    /// Leave works mode, clearing selection and displayed works.
    ExitWorks,
    /// Malformed command syntax; no API call is made.
    Usage(UsageError),
}

/// Locally-handled syntax errors, reported to the Terminal region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    EmptySearchTerm,
    BadYear(String),
    BadShowIndex(String),
    UnknownCommand(String),
}

impl UsageError {
    pub fn message(&self) -> String {
        match self {
            UsageError::EmptySearchTerm => {
                "usage: search <term>, the term must not be empty".to_string()
            }
            UsageError::BadYear(given) => format!(
                "usage: year <yyyy>, '{}' is not a year between {} and {}",
                given, YEAR_MIN, YEAR_MAX
            ),
            UsageError::BadShowIndex(given) => {
                format!("usage: show <n>, '{}' is not a list position", given)
            }
            UsageError::UnknownCommand(given) => format!(
                "unknown command '{}', type 'help' for the commands available here",
                given
            ),
        }
    }
}

impl Command {
    /// Classify one trimmed input line against the current mode.
    pub fn parse(input: &str, mode: SessionMode) -> Self {
        let line = input.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let lowered = line.to_lowercase();
        if lowered == "help" || lowered == "?" {
            return Command::Help;
        }

        match mode {
            SessionMode::Idle => Self::parse_idle(line, &lowered),
            SessionMode::AwaitingAuthorSelection => Self::parse_selection(line, &lowered),
            SessionMode::WorksMode => Self::parse_works(line),
        }
    }

    fn parse_idle(line: &str, lowered: &str) -> Self {
        match lowered {
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Search(line.to_string()),
        }
    }

    fn parse_selection(line: &str, lowered: &str) -> Self {
        if let Ok(position) = lowered.parse::<usize>() {
            return Command::Select(position);
        }
        match lowered {
            "y" | "yes" => Command::AcceptFirst,
            "n" | "no" => Command::Reject,
            "cancel" => Command::Cancel,
            // Anything else is a fresh search discarding the candidates.
            _ => Command::Search(line.to_string()),
        }
    }

    fn parse_works(line: &str) -> Self {
        // Split on the original line so the argument keeps its casing;
        // only the head token is case-folded.
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        match head.as_str() {
            "recent" if rest.is_empty() => Command::Works(WorksFilter::Recent),
            "top" if rest.is_empty() => Command::Works(WorksFilter::TopCited),
            "search" => {
                if rest.is_empty() {
                    Command::Usage(UsageError::EmptySearchTerm)
                } else {
                    Command::Works(WorksFilter::TextSearch(rest.to_string()))
                }
            }
            "year" => match rest.parse::<u16>() {
                Ok(year) if (YEAR_MIN..=YEAR_MAX).contains(&year) => {
                    Command::Works(WorksFilter::ByYear(year))
                }
                _ => Command::Usage(UsageError::BadYear(rest.to_string())),
            },
            "show" => match rest.parse::<usize>() {
                Ok(position) if position >= 1 => Command::ShowWork(position),
                _ => Command::Usage(UsageError::BadShowIndex(rest.to_string())),
            },
            "stats" if rest.is_empty() => Command::Stats,
            "topics" if rest.is_empty() => Command::Topics,
            "debug" if rest.is_empty() => Command::ToggleDebug,
            "exit" if rest.is_empty() => Command::ExitWorks,
            _ => Command::Usage(UsageError::UnknownCommand(line.to_string())),
        }
    }

    /// The command summary printed by `help`, per mode.
    pub fn help_lines(mode: SessionMode) -> Vec<&'static str> {
        match mode {
            SessionMode::Idle => vec![
                "Type an author name to search, e.g. 'carl sagan'.",
                "quit - leave the terminal",
            ],
            SessionMode::AwaitingAuthorSelection => vec![
                "<n>    - select the n-th listed author",
                "y / n  - accept the first candidate / re-prompt",
                "cancel - back to search",
                "Or type a new name to search again.",
            ],
            SessionMode::WorksMode => vec![
                "recent        - latest publications",
                "top           - most-cited publications",
                "search <term> - publications matching a title term",
                "year <yyyy>   - publications from one year",
                "show <n>      - expand the n-th listed publication",
                "stats         - citation statistics",
                "topics        - research topic distribution",
                "debug         - toggle request tracing",
                "exit          - leave works mode",
            ],
        }
    }
}
