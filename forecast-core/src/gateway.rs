use crate::{
    Config,
    error::GatewayError,
    gateway::weatherapi::WeatherApiGateway,
    model::{ForecastBundle, LocationCandidate},
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

/// Read-only access to the remote weather service.
#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    async fn search_locations(&self, query: &str)
    -> Result<Vec<LocationCandidate>, GatewayError>;

    async fn fetch_forecast(&self, city: &str, days: u8) -> Result<ForecastBundle, GatewayError>;
}

/// Construct the weatherapi.com gateway from config.
pub fn gateway_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherGateway>> {
    let api_key = config.resolved_api_key()?;

    let mut gateway = WeatherApiGateway::new(api_key, config.request_timeout())?;
    if let Some(base_url) = &config.base_url {
        gateway = gateway.with_base_url(base_url.clone());
    }

    Ok(Arc::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_from_config_works_when_key_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        let gateway = gateway_from_config(&cfg);
        assert!(gateway.is_ok());
    }
}
