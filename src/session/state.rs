//! Per-session mutable state.
//!
//! One `SessionState` lives for the whole terminal session and is mutated
//! exclusively by the command interpreter on the single command-processing
//! path. The transition helpers keep the two structural invariants in one
//! place: the candidate list is non-empty iff the mode is
//! `AwaitingAuthorSelection`, and an author is selected iff the mode is
//! `WorksMode`.

use crate::api::{AuthorProfile, AuthorSummary, Work};

/// Which phase of the search dialogue the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// No search in progress; free text is an author-name query.
    Idle,
    /// A candidate list is displayed and awaiting a 1-based pick.
    AwaitingAuthorSelection,
    /// One author is selected; publication-analysis commands are live.
    WorksMode,
}

/// Session state machine data.
#[derive(Debug, Default)]
pub struct SessionState {
    mode: Mode,
    /// Single-flight guard: a second top-level search while one is
    /// outstanding is dropped, not queued.
    pub search_in_flight: bool,
    /// Same discipline for works-mode fetches (see DESIGN.md).
    pub works_in_flight: bool,
    pub debug_enabled: bool,
    visible_works: Vec<Work>,
}

#[derive(Debug, Default)]
enum Mode {
    #[default]
    Idle,
    AwaitingAuthorSelection {
        candidates: Vec<AuthorSummary>,
    },
    WorksMode {
        selected: Box<AuthorProfile>,
    },
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SessionMode {
        match self.mode {
            Mode::Idle => SessionMode::Idle,
            Mode::AwaitingAuthorSelection { .. } => SessionMode::AwaitingAuthorSelection,
            Mode::WorksMode { .. } => SessionMode::WorksMode,
        }
    }

    /// The candidate list, valid only while awaiting a selection.
    pub fn candidates(&self) -> &[AuthorSummary] {
        match &self.mode {
            Mode::AwaitingAuthorSelection { candidates } => candidates,
            _ => &[],
        }
    }

    /// Candidate at a 1-based position, as numbered in the displayed list.
    pub fn candidate_at(&self, position: usize) -> Option<&AuthorSummary> {
        position
            .checked_sub(1)
            .and_then(|i| self.candidates().get(i))
    }

    pub fn selected_author(&self) -> Option<&AuthorProfile> {
        match &self.mode {
            Mode::WorksMode { selected } => Some(selected.as_ref()),
            _ => None,
        }
    }

    pub fn visible_works(&self) -> &[Work] {
        &self.visible_works
    }

    /// Replace the visible works set (works queries replace, never append).
    pub fn set_visible_works(&mut self, works: Vec<Work>) {
        self.visible_works = works;
    }

    /// Store a candidate list and enter the disambiguation mode.
    ///
    /// An empty list never enters disambiguation; the caller reports
    /// `EmptyResult` and the session stays where it was.
    pub fn enter_selection(&mut self, candidates: Vec<AuthorSummary>) {
        debug_assert!(!candidates.is_empty());
        if candidates.is_empty() {
            return;
        }
        self.mode = Mode::AwaitingAuthorSelection { candidates };
    }

    /// Enter works mode for the given author, discarding any candidates.
    pub fn enter_works(&mut self, profile: AuthorProfile) {
        self.mode = Mode::WorksMode {
            selected: Box::new(profile),
        };
        self.visible_works.clear();
    }

    /// Back to idle: drops candidates, selection and visible works.
    /// The debug flag survives resets for the lifetime of the session.
    pub fn reset_to_idle(&mut self) {
        self.mode = Mode::Idle;
        self.visible_works.clear();
    }
}
