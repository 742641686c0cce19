//! Display intents.
//!
//! The interpreter never writes to the screen; it emits an ordered list of
//! `DisplayIntent`s, each a self-contained instruction to append, replace or
//! clear content in one output region. Intents are consumed once by the
//! router and discarded.

use std::fmt;

/// The four independent output regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Command echo, prompts, errors. Append-only history.
    Terminal,
    /// Selected-author data, stats, topics. Append-only history.
    Profile,
    /// Current works result set. Replaced wholesale per query.
    WorksList,
    /// One expanded work record. Replaced wholesale per selection.
    WorkDetail,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Terminal => "terminal",
            Region::Profile => "profile",
            Region::WorksList => "works",
            Region::WorkDetail => "detail",
        };
        write!(f, "{}", name)
    }
}

/// How the router applies an intent to its target region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentKind {
    /// Push one more entry onto the region's log.
    Append,
    /// Drop the region's entries, then push this one.
    Replace,
    /// Drop the region's entries; `content` is ignored.
    Clear,
}

/// Presentation tag for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Info,
    Success,
    Error,
    Prompt,
    Heading,
    Echo,
}

impl Style {
    /// Short marker printed before the entry, in the spirit of a terminal log.
    pub fn prefix(&self) -> &'static str {
        match self {
            Style::Info => "·",
            Style::Success => "✓",
            Style::Error => "✗",
            Style::Prompt => "?",
            Style::Heading => "═",
            Style::Echo => ">",
        }
    }
}

/// One routed display instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayIntent {
    pub region: Region,
    pub kind: IntentKind,
    pub content: String,
    pub style: Style,
    /// Render progressively character-by-character. Purely cosmetic: the
    /// router and the state machine never depend on animation completing.
    pub typed: bool,
}

impl DisplayIntent {
    pub fn append(region: Region, style: Style, content: impl Into<String>) -> Self {
        Self {
            region,
            kind: IntentKind::Append,
            content: content.into(),
            style,
            typed: false,
        }
    }

    pub fn replace(region: Region, style: Style, content: impl Into<String>) -> Self {
        Self {
            region,
            kind: IntentKind::Replace,
            content: content.into(),
            style,
            typed: false,
        }
    }

    pub fn clear(region: Region) -> Self {
        Self {
            region,
            kind: IntentKind::Clear,
            content: String::new(),
            style: Style::Info,
            typed: false,
        }
    }

    pub fn typed(mut self) -> Self {
        self.typed = true;
        self
    }

    /// Terminal info line, the most common intent.
    pub fn terminal(content: impl Into<String>) -> Self {
        Self::append(Region::Terminal, Style::Info, content)
    }

    /// Terminal error line (usage errors and API failures).
    pub fn terminal_error(content: impl Into<String>) -> Self {
        Self::append(Region::Terminal, Style::Error, content)
    }

    /// Terminal confirmation line for a completed action.
    pub fn terminal_ok(content: impl Into<String>) -> Self {
        Self::append(Region::Terminal, Style::Success, content)
    }

    /// Terminal echo of the line the user submitted.
    pub fn echo(content: impl Into<String>) -> Self {
        Self::append(Region::Terminal, Style::Echo, content)
    }
}
