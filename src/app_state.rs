use crate::config::Config;
use crate::error::ApiError;
use crate::fal::FalClient;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Shared state injected into handlers via `Extension`.
///
/// The gateway is stateless per request; the only shared piece is the
/// provider client, which is absent when no credential was configured.
#[derive(Clone)]
pub struct AppState {
    fal: Option<Arc<FalClient>>,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let fal = match config.fal_key.as_deref() {
            Some(key) if !key.is_empty() => Some(Arc::new(FalClient::new(
                key.to_string(),
                config.fal_queue_url.clone(),
                Duration::from_millis(config.poll_interval_ms),
                Duration::from_secs(config.request_timeout_secs),
            )?)),
            _ => {
                warn!("No provider credential configured, inference routes will return 500");
                None
            }
        };

        Ok(Self { fal })
    }

    /// The provider client, or the configuration error handlers surface.
    /// A misconfigured server fails here, before the provider is contacted.
    pub fn provider(&self) -> Result<&FalClient, ApiError> {
        self.fal
            .as_deref()
            .ok_or_else(|| ApiError::Configuration("provider credential is not set".to_string()))
    }

    pub fn provider_configured(&self) -> bool {
        self.fal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_leaves_provider_unconfigured() {
        let state = AppState::new(&Config::default()).unwrap();
        assert!(!state.provider_configured());
        assert!(state.provider().is_err());
    }

    #[test]
    fn blank_credential_counts_as_missing() {
        let config = Config {
            fal_key: Some(String::new()),
            ..Default::default()
        };
        let state = AppState::new(&config).unwrap();
        assert!(!state.provider_configured());
    }

    #[test]
    fn credential_enables_provider() {
        let config = Config {
            fal_key: Some("key-id:key-secret".to_string()),
            ..Default::default()
        };
        let state = AppState::new(&config).unwrap();
        assert!(state.provider_configured());
        assert!(state.provider().is_ok());
    }
}
