//! Core library for the `forecast` weather screen.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather service gateway (location search, multi-day forecast)
//! - Durable preferences (last selected city)
//! - The screen state machine, its search debouncer and async controller
//!
//! It is used by `forecast-cli`, but can also be driven by other front ends.

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod gateway;
pub mod model;
pub mod screen;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use controller::ScreenController;
pub use error::{GatewayError, StoreError};
pub use gateway::{WeatherGateway, gateway_from_config};
pub use model::{
    ConditionIcon, CurrentConditions, DayForecast, ForecastBundle, LocationCandidate, LocationInfo,
};
pub use screen::{DEFAULT_CITY, FORECAST_DAYS, MIN_QUERY_CHARS, Phase, ScreenState};
pub use store::{CITY_KEY, FileStore, MemoryStore, PreferenceStore};
