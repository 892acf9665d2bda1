//! Drives [`ScreenState`] against the real collaborators.
//!
//! The controller is the single owner of the screen state. Gateway calls run
//! as spawned tasks and report back over a channel; [`ScreenController::step`]
//! applies one completion (or one debounced query) at a time, so every state
//! change happens on the caller's task.

use std::sync::Arc;

use tokio::{
    sync::mpsc,
    time::{Instant, sleep_until},
};

use crate::{
    debounce::{Debouncer, SEARCH_DEBOUNCE},
    gateway::WeatherGateway,
    screen::{Effect, Event, ScreenState},
    store::{CITY_KEY, PreferenceStore},
};

#[derive(Debug)]
pub struct ScreenController {
    state: ScreenState,
    debouncer: Debouncer<String>,
    gateway: Arc<dyn WeatherGateway>,
    store: Arc<dyn PreferenceStore>,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    in_flight: usize,
}

impl ScreenController {
    pub fn new(gateway: Arc<dyn WeatherGateway>, store: Arc<dyn PreferenceStore>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: ScreenState::new(),
            debouncer: Debouncer::new(SEARCH_DEBOUNCE),
            gateway,
            store,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Load the stored city (or the default) and start fetching its forecast.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(&mut self) {
        let stored_city = match self.store.get(CITY_KEY) {
            Ok(city) => city,
            Err(err) => {
                tracing::warn!(error = %err, "could not read stored city, using default");
                None
            }
        };
        self.dispatch(Event::Mounted { stored_city });
    }

    pub fn toggle_search(&mut self) {
        self.dispatch(Event::ToggleSearch);
    }

    /// Feed the full current contents of the search input.
    ///
    /// Ignored unless the search panel is open.
    pub fn input_changed(&mut self, value: impl Into<String>) {
        if !self.state.search_open() {
            return;
        }
        self.debouncer.push(value.into(), Instant::now());
    }

    /// Select the visible candidate at `index`. Returns false if there is none.
    pub fn select_candidate(&mut self, index: usize) -> bool {
        let Some(candidate) = self.state.visible_candidates().get(index).cloned() else {
            return false;
        };
        if self.debouncer.cancel().is_some() {
            tracing::debug!("dropping unsettled query on selection");
        }
        self.dispatch(Event::CandidateSelected(candidate));
        true
    }

    /// Re-issue a failed forecast load. Returns false if nothing can be retried.
    pub fn retry(&mut self) -> bool {
        if !self.state.can_retry() {
            return false;
        }
        self.dispatch(Event::Retry);
        true
    }

    /// No request outstanding and no query waiting on the debounce timer.
    pub fn is_idle(&self) -> bool {
        self.in_flight == 0 && !self.debouncer.is_pending()
    }

    /// Wait for the next request completion or debounce firing and apply it.
    ///
    /// Returns false immediately when idle.
    pub async fn step(&mut self) -> bool {
        let deadline = self.debouncer.deadline();
        if self.in_flight == 0 && deadline.is_none() {
            return false;
        }

        tokio::select! {
            Some(event) = self.rx.recv(), if self.in_flight > 0 => {
                self.in_flight -= 1;
                self.dispatch(event);
                true
            }
            () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(query) = self.debouncer.fire(Instant::now()) {
                    self.dispatch(Event::QuerySettled(query));
                }
                true
            }
            else => false,
        }
    }

    /// Step until idle.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    fn dispatch(&mut self, event: Event) {
        for effect in self.state.apply(event) {
            self.run(effect);
        }
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::FetchForecast { generation, request } => {
                tracing::info!(city = %request.city, days = request.days, "requesting forecast");
                self.in_flight += 1;
                let gateway = Arc::clone(&self.gateway);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = gateway.fetch_forecast(&request.city, request.days).await;
                    if tx.send(Event::ForecastCompleted { generation, result }).is_err() {
                        tracing::debug!("screen gone before forecast arrived");
                    }
                });
            }
            Effect::SearchLocations { generation, query } => {
                tracing::info!(%query, "searching locations");
                self.in_flight += 1;
                let gateway = Arc::clone(&self.gateway);
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = gateway.search_locations(&query).await;
                    if tx.send(Event::SearchCompleted { generation, result }).is_err() {
                        tracing::debug!("screen gone before search results arrived");
                    }
                });
            }
            Effect::PersistCity(city) => {
                if let Err(err) = self.store.set(CITY_KEY, &city) {
                    tracing::warn!(error = %err, %city, "could not store selected city");
                }
            }
        }
    }
}
