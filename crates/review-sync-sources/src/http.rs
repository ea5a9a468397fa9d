use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Shared reqwest client with the provider's request timeout
pub fn create_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("reviewsync/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// OAuth2 token endpoint body; only the access token is read
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
}
