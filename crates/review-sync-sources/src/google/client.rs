use super::{normalize_google_response, PROVIDER_NAME};
use crate::error::SourceError;
use crate::http::{create_client, TokenResponse};
use crate::traits::{FetchOutcome, ReviewProvider};
use async_trait::async_trait;
use reqwest::Client;
use review_sync_config::GoogleConfig;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Google Business Profile client.
///
/// Token and transport problems make the provider unavailable and an
/// unreadable body counts as empty. Only a non-success status from the
/// reviews endpoint is raised to the caller.
pub struct GoogleClient {
    client: Client,
    config: GoogleConfig,
    refresh_token: Option<String>,
}

impl GoogleClient {
    pub fn new(config: GoogleConfig, refresh_token: Option<String>) -> Self {
        Self {
            client: create_client(config.provider.timeout_secs),
            config,
            refresh_token: refresh_token.filter(|t| !t.trim().is_empty()),
        }
    }

    fn reviews_url(&self) -> String {
        format!(
            "{}/accounts/{}/locations:batchGetReviews",
            self.config.provider.endpoint_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.account_id)
        )
    }

    async fn request_access_token(&self, refresh_token: &str) -> Result<String, SourceError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.provider.client_id.as_str()),
            ("client_secret", self.config.provider.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];
        let response = self
            .client
            .post(&self.config.provider.auth_url)
            .form(&params)
            .send()
            .await
            .map_err(|source| SourceError::Http { provider: PROVIDER_NAME, source })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SourceError::Auth {
                provider: PROVIDER_NAME,
                message: format!("token refresh returned {} - {}", status, error_text),
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| SourceError::Auth {
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

    /// POST batchGetReviews and return the raw body
    pub async fn fetch_raw(&self, access_token: &str) -> Result<Value, SourceError> {
        let url = self.reviews_url();
        debug!(provider = PROVIDER_NAME, url = %url, "Fetching reviews");

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&json!({"locationNames": self.config.location_names}))
            .send()
            .await
            .map_err(|source| SourceError::Http { provider: PROVIDER_NAME, source })?;

        let status = response.status();
        if !status.is_success() {
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
impl ReviewProvider for GoogleClient {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_enabled(&self) -> bool {
        self.config.is_configured() && self.refresh_token.is_some()
    }

    async fn fetch_reviews(&self) -> Result<FetchOutcome, SourceError> {
        let Some(refresh_token) = self.refresh_token.as_deref().filter(|_| self.is_enabled()) else {
            debug!(provider = PROVIDER_NAME, "Provider not configured, skipping fetch");
            return Ok(FetchOutcome::Disabled);
        };

        let access_token = match self.request_access_token(refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                warn!(provider = PROVIDER_NAME, error = %e, "Google unavailable");
                return Ok(FetchOutcome::Unavailable(e.to_string()));
            }
        };

        // Only a non-success status from the reviews endpoint is raised
        let data = match self.fetch_raw(&access_token).await {
            Ok(data) => data,
            Err(e @ SourceError::Status { .. }) => return Err(e),
            Err(SourceError::Decode { message, .. }) => {
                warn!(provider = PROVIDER_NAME, error = %message, "Unreadable reviews body, treating as empty");
                return Ok(FetchOutcome::Empty);
            }
            Err(e) => {
                warn!(provider = PROVIDER_NAME, error = %e, "Google unavailable");
                return Ok(FetchOutcome::Unavailable(e.to_string()));
            }
        };
        let records = normalize_google_response(&data);
        info!(provider = PROVIDER_NAME, count = records.len(), "Fetched reviews");
        Ok(FetchOutcome::from_records(records))
    }
}
