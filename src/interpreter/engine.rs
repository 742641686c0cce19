//! The command interpreter.
//!
//! Owns the session state, classifies each input line through
//! [`Command::parse`], drives the gateway, and produces the ordered display
//! intents for that line. Gateway failures stop here: every `ApiError`
//! becomes a Terminal entry and session state is left exactly as it was
//! before the call.

use crate::api::{
    ApiError, AuthorProfile, AuthorSearchApi, AuthorStats, AuthorSummary, Work, WorksFilter,
};
use crate::display::{DisplayIntent, Region, Style};
use crate::session::{SessionMode, SessionState};

use super::command::Command;

/// Everything one input line produced.
#[derive(Debug, Default)]
pub struct Turn {
    pub intents: Vec<DisplayIntent>,
    /// Set by `quit` in idle mode; the prompter stops its loop.
    pub exit_requested: bool,
}

impl Turn {
    fn with(intents: Vec<DisplayIntent>) -> Self {
        Self {
            intents,
            exit_requested: false,
        }
    }

    fn exit() -> Self {
        Self {
            intents: Vec::new(),
            exit_requested: true,
        }
    }
}

/// Session state machine plus gateway orchestration.
pub struct Interpreter<G> {
    gateway: G,
    state: SessionState,
}

impl<G: AuthorSearchApi> Interpreter<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            state: SessionState::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> SessionMode {
        self.state.mode()
    }

    /// Process one submitted line and return the intents it produced.
    pub async fn handle_line(&mut self, input: &str) -> Turn {
        let command = Command::parse(input, self.state.mode());
        match command {
            Command::Empty => Turn::default(),
            Command::Help => Turn::with(
                Command::help_lines(self.state.mode())
                    .into_iter()
                    .map(DisplayIntent::terminal)
                    .collect(),
            ),
            Command::Quit => Turn::exit(),
            Command::Search(query) => Turn::with(self.run_search(&query).await),
            Command::Select(position) => Turn::with(self.run_select(position).await),
            Command::AcceptFirst => Turn::with(self.run_select(1).await),
            Command::Reject => Turn::with(vec![self.selection_prompt()]),
            Command::Cancel => {
                self.state.reset_to_idle();
                Turn::with(vec![DisplayIntent::terminal(
                    "Selection cancelled. Type an author name to search.",
                )])
            }
            Command::Works(filter) => Turn::with(self.run_works(filter).await),
            Command::ShowWork(position) => Turn::with(self.run_show_work(position)),
            Command::Stats => Turn::with(self.run_stats().await),
            Command::Topics => Turn::with(self.run_topics().await),
            Command::ToggleDebug => {
                self.state.debug_enabled = !self.state.debug_enabled;
                let status = if self.state.debug_enabled { "on" } else { "off" };
                Turn::with(vec![DisplayIntent::terminal(format!(
                    "Request tracing is now {}.",
                    status
                ))])
            }
            Command::ExitWorks => {
                self.state.reset_to_idle();
                Turn::with(vec![
                    DisplayIntent::clear(Region::Profile),
                    DisplayIntent::clear(Region::WorksList),
                    DisplayIntent::clear(Region::WorkDetail),
                    DisplayIntent::terminal("Left works mode. Type an author name to search."),
                ])
            }
            Command::Usage(err) => Turn::with(vec![DisplayIntent::terminal_error(err.message())]),
        }
    }

    // -- top-level search ---------------------------------------------------

    async fn run_search(&mut self, query: &str) -> Vec<DisplayIntent> {
        // Single-flight: a second search while one is outstanding is dropped
        // entirely, not queued, so late responses cannot interleave.
        if self.state.search_in_flight {
            return Vec::new();
        }

        self.state.search_in_flight = true;
        let result = self.gateway.search(query).await;
        self.state.search_in_flight = false;

        let mut intents = Vec::new();
        self.trace(&mut intents, "search", query, summarize(&result));

        match result {
            Ok(candidates) => {
                intents.push(
                    DisplayIntent::append(
                        Region::Terminal,
                        Style::Heading,
                        format!("Found {} authors for '{}':", candidates.len(), query),
                    )
                    .typed(),
                );
                for (index, author) in candidates.iter().enumerate() {
                    intents.push(DisplayIntent::terminal(candidate_line(index + 1, author)));
                }
                self.state.enter_selection(candidates);
                intents.push(self.selection_prompt());
            }
            Err(ApiError::EmptyResult) => {
                // Zero matches never enter disambiguation; back to idle even
                // if a stale candidate list was on screen.
                self.state.reset_to_idle();
                intents.push(DisplayIntent::terminal(format!(
                    "No authors found for '{}'. Try a different spelling.",
                    query
                )));
            }
            Err(err) => {
                intents.push(DisplayIntent::terminal_error(format!(
                    "Search failed: {}",
                    err
                )));
            }
        }
        intents
    }

    // -- candidate selection ------------------------------------------------

    fn selection_prompt(&self) -> DisplayIntent {
        DisplayIntent::append(
            Region::Terminal,
            Style::Prompt,
            format!(
                "Select an author (1-{}), 'y' for the first, or a new name to search again.",
                self.state.candidates().len()
            ),
        )
    }

    async fn run_select(&mut self, position: usize) -> Vec<DisplayIntent> {
        let candidate = match self.state.candidate_at(position) {
            Some(author) => author.clone(),
            None => {
                // Parser guarantees we are in selection mode, so the list is
                // non-empty; this is an out-of-range pick.
                debug_assert!(!self.state.candidates().is_empty());
                return vec![
                    DisplayIntent::terminal_error(format!(
                        "'{}' is not in the list.",
                        position
                    )),
                    self.selection_prompt(),
                ];
            }
        };

        let result = self.gateway.fetch_profile(&candidate.id).await;

        let mut intents = Vec::new();
        self.trace(&mut intents, "profile", &candidate.id, summarize(&result));

        match result {
            Ok(profile) => {
                intents.extend(profile_intents(&profile));
                intents.push(DisplayIntent::terminal_ok(format!(
                    "Selected {}. Works-mode commands: recent, top, search <term>, year <yyyy>, \
                     show <n>, stats, topics, exit.",
                    profile.summary.display_name
                )));
                self.state.enter_works(profile);
            }
            Err(err) => {
                // Selection stands; the user can retry or pick another.
                intents.push(DisplayIntent::terminal_error(format!(
                    "Could not load profile for {}: {}",
                    candidate.display_name, err
                )));
                intents.push(self.selection_prompt());
            }
        }
        intents
    }

    // -- works mode ---------------------------------------------------------

    fn selected_id(&self) -> Option<String> {
        self.state.selected_author().map(|p| p.summary.id.clone())
    }

    /// Works-mode fetches share one in-flight guard so a slow earlier
    /// response can never overwrite a faster later one.
    fn works_guard(&self) -> Option<DisplayIntent> {
        if self.state.works_in_flight {
            Some(DisplayIntent::terminal(
                "Still waiting on the previous query, input dropped.",
            ))
        } else {
            None
        }
    }

    async fn run_works(&mut self, filter: WorksFilter) -> Vec<DisplayIntent> {
        if let Some(notice) = self.works_guard() {
            return vec![notice];
        }
        let Some(author_id) = self.selected_id() else {
            debug_assert!(false, "works command parsed outside works mode");
            return Vec::new();
        };

        self.state.works_in_flight = true;
        let result = self.gateway.fetch_works(&author_id, &filter).await;
        self.state.works_in_flight = false;

        let mut intents = Vec::new();
        self.trace(&mut intents, "works", &filter_label(&filter), summarize(&result));

        match result {
            Ok(works) => {
                intents.push(DisplayIntent::terminal(format!(
                    "{}: {} works.",
                    filter_label(&filter),
                    works.len()
                )));
                intents.push(DisplayIntent::replace(
                    Region::WorksList,
                    Style::Info,
                    works_block(&works),
                ));
                self.state.set_visible_works(works);
            }
            Err(ApiError::EmptyResult) => {
                intents.push(DisplayIntent::terminal(format!(
                    "{}: no works matched.",
                    filter_label(&filter)
                )));
                intents.push(DisplayIntent::replace(
                    Region::WorksList,
                    Style::Info,
                    "(no works matched)",
                ));
                self.state.set_visible_works(Vec::new());
            }
            Err(err) => {
                intents.push(DisplayIntent::terminal_error(format!(
                    "Works query failed: {}",
                    err
                )));
            }
        }
        intents
    }

    fn run_show_work(&mut self, position: usize) -> Vec<DisplayIntent> {
        let works = self.state.visible_works();
        if works.is_empty() {
            return vec![DisplayIntent::terminal_error(
                "No works listed yet. Run 'recent', 'top', 'search' or 'year' first.",
            )];
        }
        match works.get(position - 1) {
            Some(work) => vec![DisplayIntent::replace(
                Region::WorkDetail,
                Style::Info,
                work_detail(work),
            )],
            None => vec![DisplayIntent::terminal_error(format!(
                "'show {}' is out of range; the list has {} works.",
                position,
                works.len()
            ))],
        }
    }

    async fn run_stats(&mut self) -> Vec<DisplayIntent> {
        if let Some(notice) = self.works_guard() {
            return vec![notice];
        }
        let Some(author_id) = self.selected_id() else {
            debug_assert!(false, "stats command parsed outside works mode");
            return Vec::new();
        };
        let name = self
            .state
            .selected_author()
            .map(|p| p.summary.display_name.clone())
            .unwrap_or_default();

        self.state.works_in_flight = true;
        let result = self.gateway.fetch_stats(&author_id).await;
        self.state.works_in_flight = false;

        let mut intents = Vec::new();
        self.trace(&mut intents, "stats", &author_id, summarize(&result));

        match result {
            Ok(stats) => {
                intents.push(DisplayIntent::append(
                    Region::Profile,
                    Style::Heading,
                    format!("Citation statistics for {}", name),
                ));
                for line in stats_lines(&stats) {
                    intents.push(DisplayIntent::append(Region::Profile, Style::Info, line));
                }
                intents.push(DisplayIntent::terminal_ok("Statistics updated."));
            }
            Err(err) => {
                intents.push(DisplayIntent::terminal_error(format!(
                    "Stats query failed: {}",
                    err
                )));
            }
        }
        intents
    }

    async fn run_topics(&mut self) -> Vec<DisplayIntent> {
        if let Some(notice) = self.works_guard() {
            return vec![notice];
        }
        let Some(author_id) = self.selected_id() else {
            debug_assert!(false, "topics command parsed outside works mode");
            return Vec::new();
        };

        self.state.works_in_flight = true;
        let result = self.gateway.fetch_topics(&author_id).await;
        self.state.works_in_flight = false;

        let mut intents = Vec::new();
        self.trace(&mut intents, "topics", &author_id, summarize(&result));

        match result {
            Ok(topics) => {
                intents.push(DisplayIntent::append(
                    Region::Profile,
                    Style::Heading,
                    "Research topics",
                ));
                for topic in &topics {
                    intents.push(DisplayIntent::append(
                        Region::Profile,
                        Style::Info,
                        format!("{} ({} works)", topic.display_name, topic.count),
                    ));
                }
                intents.push(DisplayIntent::terminal_ok("Topics updated."));
            }
            Err(ApiError::EmptyResult) => {
                intents.push(DisplayIntent::terminal(
                    "No topic data recorded for this author.",
                ));
            }
            Err(err) => {
                intents.push(DisplayIntent::terminal_error(format!(
                    "Topics query failed: {}",
                    err
                )));
            }
        }
        intents
    }

    /// One request-trace line per gateway call while debug is on.
    fn trace(&self, intents: &mut Vec<DisplayIntent>, call: &str, arg: &str, outcome: String) {
        if self.state.debug_enabled {
            intents.push(DisplayIntent::terminal(format!(
                "debug: {} '{}' -> {}",
                call, arg, outcome
            )));
        }
    }
}

// -- formatting -------------------------------------------------------------

fn summarize<T>(result: &Result<T, ApiError>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(err) => format!("error: {}", err),
    }
}

fn candidate_line(position: usize, author: &AuthorSummary) -> String {
    let mut line = format!(
        "{}. {} - {} works, {} citations",
        position, author.display_name, author.works_count, author.cited_by_count
    );
    if let Some(affiliation) = &author.affiliation {
        line.push_str(&format!(" - {}", affiliation));
    }
    line
}

fn profile_intents(profile: &AuthorProfile) -> Vec<DisplayIntent> {
    let summary = &profile.summary;
    let mut intents = vec![DisplayIntent::append(
        Region::Profile,
        Style::Heading,
        summary.display_name.clone(),
    )];
    intents.push(DisplayIntent::append(
        Region::Profile,
        Style::Info,
        format!("id: {}", summary.id),
    ));
    if let Some(orcid) = &summary.orcid {
        intents.push(DisplayIntent::append(
            Region::Profile,
            Style::Info,
            format!("ORCID: {}", orcid),
        ));
    }
    intents.push(DisplayIntent::append(
        Region::Profile,
        Style::Info,
        format!(
            "{} works, {} citations",
            summary.works_count, summary.cited_by_count
        ),
    ));
    for affiliation in &profile.affiliations {
        intents.push(DisplayIntent::append(
            Region::Profile,
            Style::Info,
            format!("affiliation: {}", affiliation),
        ));
    }
    intents
}

fn filter_label(filter: &WorksFilter) -> String {
    match filter {
        WorksFilter::Recent => "Recent works".to_string(),
        WorksFilter::TopCited => "Top-cited works".to_string(),
        WorksFilter::TextSearch(term) => format!("Works matching '{}'", term),
        WorksFilter::ByYear(year) => format!("Works from {}", year),
    }
}

fn works_block(works: &[Work]) -> String {
    works
        .iter()
        .enumerate()
        .map(|(index, work)| {
            let year = work
                .publication_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "n.d.".to_string());
            let mut line = format!(
                "{:>2}. {} ({}) - {} citations",
                index + 1,
                work.title,
                year,
                work.cited_by_count
            );
            if let Some(venue) = &work.venue {
                line.push_str(&format!(" - {}", venue));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn work_detail(work: &Work) -> String {
    let mut lines = vec![work.title.clone(), format!("id: {}", work.id)];
    if let Some(year) = work.publication_year {
        lines.push(format!("year: {}", year));
    }
    lines.push(format!("citations: {}", work.cited_by_count));
    if let Some(venue) = &work.venue {
        lines.push(format!("venue: {}", venue));
    }
    if !work.topics.is_empty() {
        lines.push(format!("topics: {}", work.topics.join(", ")));
    }
    lines.join("\n")
}

fn stats_lines(stats: &AuthorStats) -> Vec<String> {
    let mut lines = vec![
        format!("works: {}", stats.works_count),
        format!("citations: {}", stats.cited_by_count),
    ];
    if let Some(h) = stats.h_index {
        lines.push(format!("h-index: {}", h));
    }
    if let Some(i10) = stats.i10_index {
        lines.push(format!("i10-index: {}", i10));
    }
    if let Some(mean) = stats.two_year_mean_citedness {
        lines.push(format!("2-yr mean citedness: {:.2}", mean));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResult, TopicShare};
    use crate::display::{DisplayRouter, IntentKind};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned-response gateway recording every call it receives.
    struct MockGateway {
        search_response: ApiResult<Vec<AuthorSummary>>,
        profile_response: ApiResult<AuthorProfile>,
        works_response: ApiResult<Vec<Work>>,
        stats_response: ApiResult<AuthorStats>,
        topics_response: ApiResult<Vec<TopicShare>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockGateway {
        fn new() -> Self {
            Self {
                search_response: Ok(two_candidates()),
                profile_response: Ok(profile_fixture("A1", "Carl Sagan")),
                works_response: Ok(works_fixture()),
                stats_response: Ok(stats_fixture()),
                topics_response: Ok(vec![TopicShare {
                    display_name: "Planetary Science".to_string(),
                    count: 80,
                }]),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl AuthorSearchApi for &MockGateway {
        async fn search(&self, query: &str) -> ApiResult<Vec<AuthorSummary>> {
            self.record(format!("search:{}", query));
            self.search_response.clone()
        }

        async fn fetch_profile(&self, author_id: &str) -> ApiResult<AuthorProfile> {
            self.record(format!("profile:{}", author_id));
            self.profile_response.clone()
        }

        async fn fetch_works(
            &self,
            author_id: &str,
            filter: &WorksFilter,
        ) -> ApiResult<Vec<Work>> {
            self.record(format!("works:{}:{:?}", author_id, filter));
            self.works_response.clone()
        }

        async fn fetch_stats(&self, author_id: &str) -> ApiResult<AuthorStats> {
            self.record(format!("stats:{}", author_id));
            self.stats_response.clone()
        }

        async fn fetch_topics(&self, author_id: &str) -> ApiResult<Vec<TopicShare>> {
            self.record(format!("topics:{}", author_id));
            self.topics_response.clone()
        }
    }

    fn author_fixture(id: &str, name: &str) -> AuthorSummary {
        AuthorSummary {
            id: id.to_string(),
            display_name: name.to_string(),
            works_count: 42,
            cited_by_count: 1000,
            affiliation: Some("Cornell University".to_string()),
            orcid: None,
        }
    }

    fn two_candidates() -> Vec<AuthorSummary> {
        vec![
            author_fixture("A1", "Carl Sagan"),
            author_fixture("A2", "Carl E. Sagan"),
        ]
    }

    fn profile_fixture(id: &str, name: &str) -> AuthorProfile {
        AuthorProfile {
            summary: author_fixture(id, name),
            affiliations: vec!["Cornell University".to_string()],
            topics: vec![],
            stats: stats_fixture(),
        }
    }

    fn stats_fixture() -> AuthorStats {
        AuthorStats {
            works_count: 42,
            cited_by_count: 1000,
            h_index: Some(55),
            i10_index: Some(120),
            two_year_mean_citedness: Some(3.4),
        }
    }

    fn works_fixture() -> Vec<Work> {
        vec![
            Work {
                id: "W1".to_string(),
                title: "The Dragons of Eden".to_string(),
                publication_year: Some(1977),
                cited_by_count: 900,
                venue: Some("Random House".to_string()),
                topics: vec!["Neuroscience".to_string()],
            },
            Work {
                id: "W2".to_string(),
                title: "Pale Blue Dot".to_string(),
                publication_year: Some(1994),
                cited_by_count: 800,
                venue: None,
                topics: vec![],
            },
        ]
    }

    async fn in_works_mode(gateway: &MockGateway) -> Interpreter<&MockGateway> {
        let mut interp = Interpreter::new(gateway);
        interp.handle_line("carl sagan").await;
        interp.handle_line("1").await;
        assert_eq!(interp.mode(), SessionMode::WorksMode);
        interp
    }

    // -- transition table, row by row --------------------------------------

    #[tokio::test]
    async fn test_idle_search_with_results_enters_selection() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        let turn = interp.handle_line("carl sagan").await;
        assert_eq!(interp.mode(), SessionMode::AwaitingAuthorSelection);
        assert_eq!(interp.state().candidates().len(), 2);
        assert_eq!(gateway.calls(), vec!["search:carl sagan"]);
        assert!(turn
            .intents
            .iter()
            .any(|i| i.content.contains("Found 2 authors")));
    }

    #[tokio::test]
    async fn test_idle_search_with_zero_results_stays_idle() {
        let mut gateway = MockGateway::new();
        gateway.search_response = Err(ApiError::EmptyResult);
        let mut interp = Interpreter::new(&gateway);
        let turn = interp.handle_line("zzzz qqqq").await;
        assert_eq!(interp.mode(), SessionMode::Idle);
        assert!(interp.state().candidates().is_empty());
        assert!(turn
            .intents
            .iter()
            .any(|i| i.content.contains("No authors found")));
    }

    #[tokio::test]
    async fn test_search_failure_leaves_state_unchanged() {
        let mut gateway = MockGateway::new();
        gateway.search_response = Err(ApiError::HttpFailure(503));
        let mut interp = Interpreter::new(&gateway);
        let turn = interp.handle_line("carl sagan").await;
        assert_eq!(interp.mode(), SessionMode::Idle);
        assert!(turn.intents.iter().any(|i| i.style == Style::Error));
    }

    #[tokio::test]
    async fn test_selection_is_one_based_and_stable() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        interp.handle_line("carl sagan").await;
        interp.handle_line("2").await;
        assert_eq!(interp.mode(), SessionMode::WorksMode);
        // Position 2 maps to the second candidate in API order.
        assert!(gateway.calls().contains(&"profile:A2".to_string()));
    }

    #[tokio::test]
    async fn test_selection_confirmation_is_marked_success() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        interp.handle_line("carl sagan").await;
        let turn = interp.handle_line("1").await;
        assert!(turn
            .intents
            .iter()
            .any(|i| i.style == Style::Success && i.content.contains("Selected Carl Sagan")));
    }

    #[tokio::test]
    async fn test_out_of_range_selection_is_rejected_in_place() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        interp.handle_line("carl sagan").await;

        for bad in ["0", "4"] {
            let turn = interp.handle_line(bad).await;
            assert_eq!(interp.mode(), SessionMode::AwaitingAuthorSelection);
            assert!(turn.intents.iter().any(|i| i.style == Style::Error));
        }
        // No profile fetch happened for either rejected pick.
        assert_eq!(gateway.calls(), vec!["search:carl sagan"]);
    }

    #[tokio::test]
    async fn test_yes_selects_first_candidate() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        interp.handle_line("carl sagan").await;
        interp.handle_line("y").await;
        assert_eq!(interp.mode(), SessionMode::WorksMode);
        assert!(gateway.calls().contains(&"profile:A1".to_string()));
    }

    #[tokio::test]
    async fn test_no_reprompts_and_stays() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        interp.handle_line("carl sagan").await;
        let turn = interp.handle_line("no").await;
        assert_eq!(interp.mode(), SessionMode::AwaitingAuthorSelection);
        assert!(turn.intents.iter().any(|i| i.style == Style::Prompt));
    }

    #[tokio::test]
    async fn test_new_text_during_selection_is_a_fresh_search() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        interp.handle_line("carl sagan").await;
        interp.handle_line("marie curie").await;
        assert_eq!(interp.mode(), SessionMode::AwaitingAuthorSelection);
        assert_eq!(
            gateway.calls(),
            vec!["search:carl sagan", "search:marie curie"]
        );
    }

    #[tokio::test]
    async fn test_cancel_returns_to_idle() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        interp.handle_line("carl sagan").await;
        interp.handle_line("cancel").await;
        assert_eq!(interp.mode(), SessionMode::Idle);
        assert!(interp.state().candidates().is_empty());
    }

    #[tokio::test]
    async fn test_profile_fetch_failure_keeps_candidates() {
        let mut gateway = MockGateway::new();
        gateway.profile_response = Err(ApiError::NetworkFailure);
        let mut interp = Interpreter::new(&gateway);
        interp.handle_line("carl sagan").await;
        let turn = interp.handle_line("1").await;
        assert_eq!(interp.mode(), SessionMode::AwaitingAuthorSelection);
        assert_eq!(interp.state().candidates().len(), 2);
        assert!(turn.intents.iter().any(|i| i.style == Style::Error));
    }

    #[tokio::test]
    async fn test_works_mode_rows_stay_in_works_mode() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        for input in ["recent", "top", "search mars", "year 1977", "stats", "topics", "debug"] {
            interp.handle_line(input).await;
            assert_eq!(interp.mode(), SessionMode::WorksMode, "after '{}'", input);
        }
    }

    #[tokio::test]
    async fn test_exit_clears_selection_and_regions() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        let mut router = DisplayRouter::new();

        let turn = interp.handle_line("recent").await;
        router.route_all(&turn.intents);
        assert!(!router.region(Region::WorksList).is_empty());

        let turn = interp.handle_line("exit").await;
        router.route_all(&turn.intents);
        assert_eq!(interp.mode(), SessionMode::Idle);
        assert!(interp.state().selected_author().is_none());
        assert!(router.region(Region::Profile).is_empty());
        assert!(router.region(Region::WorksList).is_empty());
        assert!(router.region(Region::WorkDetail).is_empty());
    }

    // -- single-flight ------------------------------------------------------

    #[tokio::test]
    async fn test_search_single_flight_drops_second_input() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        interp.state.search_in_flight = true;

        let turn = interp.handle_line("carl sagan").await;
        assert!(turn.intents.is_empty());
        assert!(gateway.calls().is_empty());
        assert_eq!(interp.mode(), SessionMode::Idle);
    }

    #[tokio::test]
    async fn test_works_single_flight_drops_second_query() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        let calls_before = gateway.calls().len();
        interp.state.works_in_flight = true;

        let turn = interp.handle_line("recent").await;
        assert_eq!(gateway.calls().len(), calls_before);
        assert!(turn.intents.iter().any(|i| i.content.contains("dropped")));
    }

    // -- works queries ------------------------------------------------------

    #[tokio::test]
    async fn test_recent_replaces_works_list_idempotently() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        let mut router = DisplayRouter::new();

        let turn = interp.handle_line("recent").await;
        router.route_all(&turn.intents);
        let first: Vec<String> = router
            .region(Region::WorksList)
            .entries()
            .iter()
            .map(|e| e.content.clone())
            .collect();

        let turn = interp.handle_line("recent").await;
        router.route_all(&turn.intents);
        let second: Vec<String> = router
            .region(Region::WorksList)
            .entries()
            .iter()
            .map(|e| e.content.clone())
            .collect();

        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
        assert!(second[0].contains("The Dragons of Eden"));
        assert!(second[0].contains("Pale Blue Dot"));
    }

    #[tokio::test]
    async fn test_works_replace_intents_target_works_list() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        let turn = interp.handle_line("top").await;
        let replace = turn
            .intents
            .iter()
            .find(|i| i.kind == IntentKind::Replace)
            .expect("a replace intent");
        assert_eq!(replace.region, Region::WorksList);
    }

    #[tokio::test]
    async fn test_empty_works_result_replaces_with_notice() {
        let mut gateway = MockGateway::new();
        gateway.works_response = Err(ApiError::EmptyResult);
        let mut interp = in_works_mode(&gateway).await;
        let turn = interp.handle_line("year 1602").await;
        assert!(turn
            .intents
            .iter()
            .any(|i| i.region == Region::WorksList && i.content.contains("no works")));
        assert!(interp.state().visible_works().is_empty());
    }

    #[tokio::test]
    async fn test_show_expands_listed_work_into_detail() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        interp.handle_line("recent").await;
        let turn = interp.handle_line("show 2").await;
        let detail = turn
            .intents
            .iter()
            .find(|i| i.region == Region::WorkDetail)
            .expect("a detail intent");
        assert_eq!(detail.kind, IntentKind::Replace);
        assert!(detail.content.contains("Pale Blue Dot"));
    }

    #[tokio::test]
    async fn test_show_without_list_is_an_error() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        let turn = interp.handle_line("show 1").await;
        assert!(turn.intents.iter().any(|i| i.style == Style::Error));
    }

    #[tokio::test]
    async fn test_year_abcd_is_usage_error_with_no_api_call() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        let calls_before = gateway.calls().len();

        let turn = interp.handle_line("year abcd").await;
        assert_eq!(gateway.calls().len(), calls_before);
        assert!(turn
            .intents
            .iter()
            .any(|i| i.style == Style::Error && i.content.contains("year")));
        assert_eq!(interp.mode(), SessionMode::WorksMode);
    }

    #[tokio::test]
    async fn test_stats_and_topics_append_to_profile() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        let mut router = DisplayRouter::new();

        let turn = interp.handle_line("stats").await;
        router.route_all(&turn.intents);
        let turn = interp.handle_line("topics").await;
        router.route_all(&turn.intents);

        let profile: Vec<&str> = router
            .region(Region::Profile)
            .entries()
            .iter()
            .map(|e| e.content.as_str())
            .collect();
        assert!(profile.iter().any(|c| c.contains("h-index: 55")));
        assert!(profile.iter().any(|c| c.contains("Planetary Science")));
    }

    #[tokio::test]
    async fn test_debug_toggle_traces_requests() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;

        let turn = interp.handle_line("debug").await;
        assert!(turn.intents.iter().any(|i| i.content.contains("now on")));

        let turn = interp.handle_line("recent").await;
        assert!(turn
            .intents
            .iter()
            .any(|i| i.content.starts_with("debug: works")));

        let turn = interp.handle_line("debug").await;
        assert!(turn.intents.iter().any(|i| i.content.contains("now off")));
    }

    #[tokio::test]
    async fn test_unknown_works_command_is_usage_error() {
        let gateway = MockGateway::new();
        let mut interp = in_works_mode(&gateway).await;
        let calls_before = gateway.calls().len();
        let turn = interp.handle_line("frobnicate").await;
        assert_eq!(gateway.calls().len(), calls_before);
        assert!(turn.intents.iter().any(|i| i.style == Style::Error));
        assert_eq!(interp.mode(), SessionMode::WorksMode);
    }

    // -- end to end ---------------------------------------------------------

    #[tokio::test]
    async fn test_full_session_scenario() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        let mut router = DisplayRouter::new();

        let turn = interp.handle_line("carl sagan").await;
        router.route_all(&turn.intents);
        assert_eq!(interp.mode(), SessionMode::AwaitingAuthorSelection);

        let turn = interp.handle_line("1").await;
        router.route_all(&turn.intents);
        assert_eq!(interp.mode(), SessionMode::WorksMode);
        assert!(router
            .region(Region::Profile)
            .entries()
            .iter()
            .any(|e| e.content.contains("Carl Sagan")));

        let turn = interp.handle_line("recent").await;
        router.route_all(&turn.intents);
        assert!(!router.region(Region::WorksList).is_empty());

        let turn = interp.handle_line("exit").await;
        router.route_all(&turn.intents);
        assert_eq!(interp.mode(), SessionMode::Idle);
        assert!(router.region(Region::Profile).is_empty());
        assert!(router.region(Region::WorksList).is_empty());
        // Terminal history survives the reset.
        assert!(!router.region(Region::Terminal).is_empty());
    }

    #[tokio::test]
    async fn test_quit_requests_exit_only_from_idle() {
        let gateway = MockGateway::new();
        let mut interp = Interpreter::new(&gateway);
        let turn = interp.handle_line("quit").await;
        assert!(turn.exit_requested);

        // In works mode 'exit' leaves the mode instead of the program.
        let mut interp = in_works_mode(&gateway).await;
        let turn = interp.handle_line("exit").await;
        assert!(!turn.exit_requested);
        assert_eq!(interp.mode(), SessionMode::Idle);
    }
}
