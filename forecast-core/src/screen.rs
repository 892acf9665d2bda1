//! Screen state and its transitions.
//!
//! [`ScreenState::apply`] is a pure reducer: it mutates the state for one
//! [`Event`] and returns the [`Effect`]s the caller must run. Nothing here
//! performs I/O, so every transition is testable without a runtime.

use crate::{
    error::GatewayError,
    model::{ForecastBundle, LocationCandidate},
};

/// City shown when nothing has been stored yet.
pub const DEFAULT_CITY: &str = "Amsterdam";

/// Number of forecast days requested for every city.
pub const FORECAST_DAYS: u8 = 14;

/// Queries shorter than this (in characters) never reach the gateway.
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready { search_open: bool },
}

/// Monotonic request tag; only the latest issued per request class is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn bump(&mut self) -> Generation {
        self.0 += 1;
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastOrigin {
    Mount,
    Selection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastRequest {
    pub city: String,
    pub days: u8,
    pub origin: ForecastOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchForecast { generation: Generation, request: ForecastRequest },
    SearchLocations { generation: Generation, query: String },
    PersistCity(String),
}

#[derive(Debug)]
pub enum Event {
    Mounted { stored_city: Option<String> },
    ToggleSearch,
    /// A debounced search query became due.
    QuerySettled(String),
    SearchCompleted {
        generation: Generation,
        result: Result<Vec<LocationCandidate>, GatewayError>,
    },
    CandidateSelected(LocationCandidate),
    ForecastCompleted {
        generation: Generation,
        result: Result<ForecastBundle, GatewayError>,
    },
    /// Re-issue a forecast load that failed.
    Retry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenState {
    phase: Phase,
    candidates: Vec<LocationCandidate>,
    forecast: Option<ForecastBundle>,
    error: Option<String>,
    search_generation: Generation,
    forecast_generation: Generation,
    pending_forecast: Option<ForecastRequest>,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            candidates: Vec::new(),
            forecast: None,
            error: None,
            search_generation: Generation::default(),
            forecast_generation: Generation::default(),
            pending_forecast: None,
        }
    }
}

impl ScreenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn search_open(&self) -> bool {
        matches!(self.phase, Phase::Ready { search_open: true })
    }

    /// Last search results, whether or not the panel is showing them.
    pub fn candidates(&self) -> &[LocationCandidate] {
        &self.candidates
    }

    /// Search results as rendered: empty while the panel is closed.
    pub fn visible_candidates(&self) -> &[LocationCandidate] {
        if self.search_open() { &self.candidates } else { &[] }
    }

    pub fn forecast(&self) -> Option<&ForecastBundle> {
        self.forecast.as_ref()
    }

    /// Description of the most recent failed request, if not yet superseded.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// City of the forecast load in progress (or the one that failed).
    pub fn pending_city(&self) -> Option<&str> {
        self.pending_forecast.as_ref().map(|r| r.city.as_str())
    }

    pub fn can_retry(&self) -> bool {
        self.is_loading() && self.error.is_some() && self.pending_forecast.is_some()
    }

    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Mounted { stored_city } => {
                let city = stored_city
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CITY.to_string());
                vec![self.request_forecast(city, ForecastOrigin::Mount)]
            }

            Event::ToggleSearch => {
                if let Phase::Ready { search_open } = self.phase {
                    self.phase = Phase::Ready { search_open: !search_open };
                }
                Vec::new()
            }

            Event::QuerySettled(query) => {
                // A load is replacing the screen; the query belongs to an abandoned search.
                if self.is_loading() {
                    return Vec::new();
                }
                // Counted in chars, not UTF-16 units: two emoji are still a two-character query.
                if query.chars().count() < MIN_QUERY_CHARS {
                    return Vec::new();
                }
                let generation = self.search_generation.bump();
                vec![Effect::SearchLocations { generation, query }]
            }

            Event::SearchCompleted { generation, result } => {
                if generation != self.search_generation {
                    tracing::debug!(
                        ?generation,
                        latest = ?self.search_generation,
                        "dropping stale search result"
                    );
                    return Vec::new();
                }
                match result {
                    Ok(candidates) => {
                        self.candidates = candidates;
                        self.error = None;
                    }
                    Err(err) => {
                        tracing::warn!(
                            endpoint = err.endpoint(),
                            error = %err,
                            "location search failed"
                        );
                        self.error = Some(err.to_string());
                    }
                }
                Vec::new()
            }

            Event::CandidateSelected(candidate) => {
                if self.is_loading() {
                    return Vec::new();
                }
                self.candidates.clear();
                // Results of searches still in flight must not repopulate the list.
                self.search_generation.bump();
                vec![self.request_forecast(candidate.name, ForecastOrigin::Selection)]
            }

            Event::ForecastCompleted { generation, result } => {
                if generation != self.forecast_generation {
                    tracing::debug!(
                        ?generation,
                        latest = ?self.forecast_generation,
                        "dropping stale forecast"
                    );
                    return Vec::new();
                }
                match result {
                    Ok(bundle) => {
                        self.forecast = Some(bundle);
                        self.phase = Phase::Ready { search_open: false };
                        self.error = None;
                        match self.pending_forecast.take() {
                            Some(ForecastRequest {
                                city, origin: ForecastOrigin::Selection, ..
                            }) => vec![Effect::PersistCity(city)],
                            _ => Vec::new(),
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            endpoint = err.endpoint(),
                            error = %err,
                            city = ?self.pending_city(),
                            "forecast load failed"
                        );
                        self.error = Some(err.to_string());
                        Vec::new()
                    }
                }
            }

            Event::Retry => {
                if !self.can_retry() {
                    return Vec::new();
                }
                match self.pending_forecast.clone() {
                    Some(request) => vec![self.request_forecast(request.city, request.origin)],
                    None => Vec::new(),
                }
            }
        }
    }

    fn request_forecast(&mut self, city: String, origin: ForecastOrigin) -> Effect {
        self.phase = Phase::Loading;
        self.error = None;
        let generation = self.forecast_generation.bump();
        let request = ForecastRequest { city, days: FORECAST_DAYS, origin };
        self.pending_forecast = Some(request.clone());
        Effect::FetchForecast { generation, request }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bundle, candidate};

    fn parse_error() -> GatewayError {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        GatewayError::Parse { endpoint: "forecast", source }
    }

    fn fetch_of(effects: &[Effect]) -> (Generation, ForecastRequest) {
        match effects {
            [Effect::FetchForecast { generation, request }] => (*generation, request.clone()),
            other => panic!("expected a single forecast fetch, got {other:?}"),
        }
    }

    fn search_generation(effects: &[Effect]) -> Generation {
        match effects {
            [Effect::SearchLocations { generation, .. }] => *generation,
            other => panic!("expected a single search, got {other:?}"),
        }
    }

    /// Mounted and resolved, panel open, showing `candidates`.
    fn ready_with_candidates(names: &[&str]) -> ScreenState {
        let mut state = ScreenState::new();
        let (generation, _) = fetch_of(&state.apply(Event::Mounted { stored_city: None }));
        state.apply(Event::ForecastCompleted { generation, result: Ok(bundle("Amsterdam")) });
        state.apply(Event::ToggleSearch);

        let generation = search_generation(&state.apply(Event::QuerySettled("Lon".into())));
        state.apply(Event::SearchCompleted {
            generation,
            result: Ok(names.iter().map(|n| candidate(n)).collect()),
        });
        state
    }

    #[test]
    fn mount_without_stored_city_fetches_default() {
        let mut state = ScreenState::new();
        let (_, request) = fetch_of(&state.apply(Event::Mounted { stored_city: None }));

        assert_eq!(request.city, "Amsterdam");
        assert_eq!(request.days, 14);
        assert!(state.is_loading());
    }

    #[test]
    fn mount_with_stored_city_fetches_it() {
        let mut state = ScreenState::new();
        let (_, request) =
            fetch_of(&state.apply(Event::Mounted { stored_city: Some("Paris".into()) }));

        assert_eq!(request.city, "Paris");
        assert_eq!(request.days, 14);
        assert_eq!(request.origin, ForecastOrigin::Mount);
    }

    #[test]
    fn mount_resolution_enters_ready_without_persisting() {
        let mut state = ScreenState::new();
        let (generation, _) = fetch_of(&state.apply(Event::Mounted { stored_city: None }));

        let effects =
            state.apply(Event::ForecastCompleted { generation, result: Ok(bundle("Amsterdam")) });

        assert!(effects.is_empty());
        assert_eq!(state.phase(), Phase::Ready { search_open: false });
        assert_eq!(state.forecast().map(|f| f.location.name.as_str()), Some("Amsterdam"));
    }

    #[test]
    fn toggle_is_ignored_while_loading() {
        let mut state = ScreenState::new();
        state.apply(Event::Mounted { stored_city: None });
        state.apply(Event::ToggleSearch);

        assert_eq!(state.phase(), Phase::Loading);
    }

    #[test]
    fn toggling_twice_restores_panel_and_keeps_data() {
        let mut state = ready_with_candidates(&["London"]);
        let before = state.clone();

        state.apply(Event::ToggleSearch);
        assert!(!state.search_open());
        assert!(state.visible_candidates().is_empty());
        assert_eq!(state.candidates().len(), 1);

        state.apply(Event::ToggleSearch);
        assert_eq!(state, before);
    }

    #[test]
    fn short_queries_issue_nothing_and_keep_stale_candidates() {
        let mut state = ready_with_candidates(&["London", "Londrina"]);

        assert!(state.apply(Event::QuerySettled("Lo".into())).is_empty());
        assert!(state.apply(Event::QuerySettled(String::new())).is_empty());
        // Two characters, four bytes.
        assert!(state.apply(Event::QuerySettled("Åå".into())).is_empty());
        // Two characters, four UTF-16 units.
        assert!(state.apply(Event::QuerySettled("🌧🌦".into())).is_empty());

        assert_eq!(state.visible_candidates().len(), 2);
    }

    #[test]
    fn long_query_issues_search_with_the_query() {
        let mut state = ready_with_candidates(&[]);
        let effects = state.apply(Event::QuerySettled("Berl".into()));

        assert!(matches!(
            effects.as_slice(),
            [Effect::SearchLocations { query, .. }] if query == "Berl"
        ));
    }

    #[test]
    fn selection_clears_closes_and_fetches_once() {
        let mut state = ready_with_candidates(&["London", "Londrina"]);
        let chosen = state.candidates()[1].clone();

        let (_, request) = fetch_of(&state.apply(Event::CandidateSelected(chosen)));

        assert_eq!(request.city, "Londrina");
        assert_eq!(request.days, 14);
        assert!(state.candidates().is_empty());
        assert!(!state.search_open());
        assert!(state.is_loading());
    }

    #[test]
    fn selection_success_persists_city() {
        let mut state = ready_with_candidates(&["London"]);
        let (generation, _) =
            fetch_of(&state.apply(Event::CandidateSelected(candidate("London"))));

        let effects =
            state.apply(Event::ForecastCompleted { generation, result: Ok(bundle("London")) });

        assert_eq!(effects, vec![Effect::PersistCity("London".into())]);
        assert_eq!(state.phase(), Phase::Ready { search_open: false });
    }

    #[test]
    fn stale_forecast_does_not_clobber_newer_one() {
        let mut state = ready_with_candidates(&["London", "Paris"]);
        let (first, _) = fetch_of(&state.apply(Event::CandidateSelected(candidate("London"))));
        state.apply(Event::ForecastCompleted { generation: first, result: Ok(bundle("London")) });
        state.apply(Event::ToggleSearch);
        let (second, _) = fetch_of(&state.apply(Event::CandidateSelected(candidate("Paris"))));

        // The earlier request resolves again late (e.g. a duplicate delivery).
        let effects =
            state.apply(Event::ForecastCompleted { generation: first, result: Ok(bundle("Old")) });
        assert!(effects.is_empty());
        assert!(state.is_loading());

        state.apply(Event::ForecastCompleted { generation: second, result: Ok(bundle("Paris")) });
        assert_eq!(state.forecast().map(|f| f.location.name.as_str()), Some("Paris"));
    }

    #[test]
    fn stale_search_results_are_dropped() {
        let mut state = ready_with_candidates(&[]);
        let first = search_generation(&state.apply(Event::QuerySettled("Lon".into())));
        let second = search_generation(&state.apply(Event::QuerySettled("Londo".into())));

        let newer = Ok(vec![candidate("London")]);
        let older = Ok(vec![candidate("Long Beach")]);
        state.apply(Event::SearchCompleted { generation: second, result: newer });
        state.apply(Event::SearchCompleted { generation: first, result: older });

        assert_eq!(state.candidates(), &[candidate("London")]);
    }

    #[test]
    fn search_in_flight_during_selection_is_discarded() {
        let mut state = ready_with_candidates(&["London"]);
        let generation = search_generation(&state.apply(Event::QuerySettled("Lond".into())));

        state.apply(Event::CandidateSelected(candidate("London")));
        let late = Ok(vec![candidate("Londonderry")]);
        state.apply(Event::SearchCompleted { generation, result: late });

        assert!(state.candidates().is_empty());
    }

    #[test]
    fn query_settling_during_selection_load_issues_nothing() {
        let mut state = ready_with_candidates(&["London"]);
        state.apply(Event::CandidateSelected(candidate("London")));

        assert!(state.apply(Event::QuerySettled("Lond".into())).is_empty());
        assert!(state.candidates().is_empty());
        assert!(state.is_loading());
    }

    #[test]
    fn failed_forecast_stays_loading_and_can_be_retried() {
        let mut state = ScreenState::new();
        let (generation, _) =
            fetch_of(&state.apply(Event::Mounted { stored_city: Some("Paris".into()) }));
        assert!(!state.can_retry());

        state.apply(Event::ForecastCompleted { generation, result: Err(parse_error()) });

        assert!(state.is_loading());
        assert!(state.error().is_some_and(|e| e.contains("forecast")));
        assert!(state.can_retry());

        let (retry_gen, request) = fetch_of(&state.apply(Event::Retry));
        assert!(retry_gen > generation);
        assert_eq!(request.city, "Paris");
        assert_eq!(state.error(), None);
        assert!(state.apply(Event::Retry).is_empty());
    }

    #[test]
    fn failed_search_keeps_candidates_and_records_error() {
        let mut state = ready_with_candidates(&["London"]);
        let generation = search_generation(&state.apply(Event::QuerySettled("Lond".into())));

        state.apply(Event::SearchCompleted { generation, result: Err(parse_error()) });

        assert_eq!(state.candidates(), &[candidate("London")]);
        assert!(state.error().is_some());
        assert!(!state.can_retry());
    }
}
