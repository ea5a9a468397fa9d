use super::{normalize_hostaway_response, PROVIDER_NAME};
use crate::error::SourceError;
use crate::http::{create_client, TokenResponse};
use crate::traits::{FetchOutcome, ReviewProvider};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use review_sync_config::ProviderConfig;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Hostaway reviews API client (client-credentials token, then a single GET)
pub struct HostawayClient {
    client: Client,
    config: ProviderConfig,
}

impl HostawayClient {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: create_client(config.timeout_secs),
            config,
        }
    }

    async fn request_access_token(&self) -> Result<String, SourceError> {
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", "general"),
        ];
        let response = self
            .client
            .post(&self.config.auth_url)
            .form(&params)
            .send()
            .await
            .map_err(|source| SourceError::Http { provider: PROVIDER_NAME, source })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SourceError::Auth {
                provider: PROVIDER_NAME,
                message: format!("token endpoint returned {}", status),
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| SourceError::Decode {
            provider: PROVIDER_NAME,
            message: e.to_string(),
        })?;
        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| SourceError::Auth {
                provider: PROVIDER_NAME,
                message: "token response has no access_token".to_string(),
            })
    }

    /// Raw reviews payload as returned by the API
    pub async fn fetch_raw(&self) -> Result<Value, SourceError> {
        let token = self.request_access_token().await?;
        debug!(provider = PROVIDER_NAME, url = %self.config.endpoint_url, "Fetching reviews");

        let response = self
            .client
            .get(&self.config.endpoint_url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| SourceError::Http { provider: PROVIDER_NAME, source })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Status {
                provider: PROVIDER_NAME,
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| SourceError::Decode {
            provider: PROVIDER_NAME,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ReviewProvider for HostawayClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    /// Every failure is reported as `Unavailable`; this provider never raises
    async fn fetch_reviews(&self) -> Result<FetchOutcome, SourceError> {
        if !self.is_enabled() {
            debug!(provider = PROVIDER_NAME, "Provider not configured, skipping fetch");
            return Ok(FetchOutcome::Disabled);
        }

        match self.fetch_raw().await {
            Ok(data) => {
                let records = normalize_hostaway_response(&data);
                info!(provider = PROVIDER_NAME, count = records.len(), "Fetched reviews");
                Ok(FetchOutcome::from_records(records))
            }
            Err(e) => {
                warn!(provider = PROVIDER_NAME, error = %e, "Hostaway unavailable");
                Ok(FetchOutcome::Unavailable(e.to_string()))
            }
        }
    }
}
