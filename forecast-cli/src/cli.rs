use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use forecast_core::{
    CITY_KEY, Config, DEFAULT_CITY, FORECAST_DAYS, FileStore, MIN_QUERY_CHARS, PreferenceStore,
    ScreenController, WeatherGateway, gateway_from_config,
};
use inquire::{Password, PasswordDisplayMode};

use crate::{
    app,
    logging::{self, LogTarget},
    render,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecast screen")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive weather screen (default).
    Interactive,

    /// Print the forecast once and exit.
    Show {
        /// City to show; defaults to the last selected city.
        city: Option<String>,
    },

    /// List locations matching a partial name.
    Search {
        query: String,
    },

    /// Store the weatherapi.com API key.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Interactive => {
                let _guard = logging::init(LogTarget::File)?;
                let config = Config::load()?;
                let gateway = gateway_from_config(&config)?;
                let store = Arc::new(FileStore::open_default()?);
                app::run(ScreenController::new(gateway, store)).await?;
            }
            Command::Show { city } => {
                logging::init(LogTarget::Stderr)?;
                let config = Config::load()?;
                let gateway = gateway_from_config(&config)?;

                let city = match city {
                    Some(city) => city,
                    None => stored_city().unwrap_or_else(|| DEFAULT_CITY.to_string()),
                };

                let bundle = gateway
                    .fetch_forecast(&city, FORECAST_DAYS)
                    .await
                    .with_context(|| format!("Failed to load forecast for {city}"))?;

                println!("{}", render::header(&bundle));
                println!();
                for line in render::render_forecast(&bundle) {
                    println!("{line}");
                }
            }
            Command::Search { query } => {
                logging::init(LogTarget::Stderr)?;
                if query.chars().count() < MIN_QUERY_CHARS {
                    bail!("Search needs at least {MIN_QUERY_CHARS} characters, got '{query}'.");
                }

                let config = Config::load()?;
                let gateway = gateway_from_config(&config)?;
                let candidates = gateway
                    .search_locations(&query)
                    .await
                    .with_context(|| format!("Failed to search locations for '{query}'"))?;

                if candidates.is_empty() {
                    println!("No locations match '{query}'.");
                }
                for line in render::render_candidate_list(&candidates) {
                    println!("{line}");
                }
            }
            Command::Configure => {
                logging::init(LogTarget::Stderr)?;
                let mut config = Config::load()?;
                if config.is_configured() {
                    println!("An API key is already stored; entering a new one replaces it.");
                }

                let api_key = Password::new("weatherapi.com API key:")
                    .with_display_mode(PasswordDisplayMode::Masked)
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;

                if api_key.trim().is_empty() {
                    bail!("API key must not be empty.");
                }

                config.set_api_key(api_key.trim().to_string());
                config.save()?;
                println!("Saved configuration to {}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

/// Last selected city, if the preference file has one.
fn stored_city() -> Option<String> {
    let store = match FileStore::open_default() {
        Ok(store) => store,
        Err(err) => {
            tracing::warn!(error = %err, "no preference store available");
            return None;
        }
    };

    match store.get(CITY_KEY) {
        Ok(city) => city,
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %store.path().display(),
                "could not read stored city"
            );
            None
        }
    }
}
