use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    error::GatewayError,
    model::{
        ConditionIcon, CurrentConditions, DayForecast, ForecastBundle, LocationCandidate,
        LocationInfo,
    },
};

use super::WeatherGateway;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

const SEARCH_ENDPOINT: &str = "search";
const FORECAST_ENDPOINT: &str = "forecast";

#[derive(Debug, Clone)]
pub struct WeatherApiGateway {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiGateway {
    pub fn new(api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http })
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn get_body(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<String, GatewayError> {
        let url = format!("{}/{endpoint}.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|source| GatewayError::Network { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| GatewayError::Network { endpoint, source })?;

        if !status.is_success() {
            return Err(GatewayError::Status { endpoint, status, body: truncate_body(&body) });
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherGateway for WeatherApiGateway {
    async fn search_locations(
        &self,
        query: &str,
    ) -> Result<Vec<LocationCandidate>, GatewayError> {
        tracing::debug!(query, "searching locations");
        let body = self.get_body(SEARCH_ENDPOINT, &[("q", query)]).await?;
        parse_search(&body)
            .map_err(|source| GatewayError::Parse { endpoint: SEARCH_ENDPOINT, source })
    }

    async fn fetch_forecast(&self, city: &str, days: u8) -> Result<ForecastBundle, GatewayError> {
        tracing::debug!(city, days, "fetching forecast");
        let days = days.to_string();
        let body = self
            .get_body(
                FORECAST_ENDPOINT,
                &[("q", city), ("days", days.as_str()), ("aqi", "no"), ("alerts", "no")],
            )
            .await?;
        parse_forecast(&body)
            .map_err(|source| GatewayError::Parse { endpoint: FORECAST_ENDPOINT, source })
    }
}

#[derive(Debug, Deserialize)]
struct WaSearchHit {
    name: String,
    #[serde(default)]
    region: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    condition: WaCondition,
    wind_kph: f64,
    humidity: u8,
    feelslike_c: f64,
    vis_km: f64,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    avgtemp_c: f64,
    totalprecip_mm: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    sunrise: String,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    day: WaDay,
    astro: WaAstro,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

fn parse_search(body: &str) -> Result<Vec<LocationCandidate>, serde_json::Error> {
    let hits: Vec<WaSearchHit> = serde_json::from_str(body)?;

    Ok(hits
        .into_iter()
        .map(|hit| LocationCandidate {
            name: hit.name,
            country: hit.country,
            region: Some(hit.region).filter(|r| !r.is_empty()),
        })
        .collect())
}

fn parse_forecast(body: &str) -> Result<ForecastBundle, serde_json::Error> {
    let parsed: WaForecastResponse = serde_json::from_str(body)?;

    let current = CurrentConditions {
        temperature_c: parsed.current.temp_c,
        icon: ConditionIcon::from_condition(&parsed.current.condition.text),
        condition: parsed.current.condition.text,
        wind_kph: parsed.current.wind_kph,
        humidity_pct: parsed.current.humidity,
        feels_like_c: parsed.current.feelslike_c,
        visibility_km: parsed.current.vis_km,
    };

    let days = parsed
        .forecast
        .forecastday
        .into_iter()
        .map(|fd| DayForecast {
            date: fd.date,
            max_temp_c: fd.day.maxtemp_c,
            avg_temp_c: fd.day.avgtemp_c,
            total_precip_mm: fd.day.totalprecip_mm,
            icon: ConditionIcon::from_condition(&fd.day.condition.text),
            condition: fd.day.condition.text,
            sunrise: fd.astro.sunrise,
        })
        .collect();

    Ok(ForecastBundle {
        current,
        location: LocationInfo {
            name: parsed.location.name,
            region: parsed.location.region,
            country: parsed.location.country,
        },
        days,
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
