use thiserror::Error;

/// Failure of a single provider fetch. Never fatal for the pipeline as a whole.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} authentication failed: {message}")]
    Auth {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unreadable body: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },
}

impl SourceError {
    pub fn provider(&self) -> &'static str {
        match self {
            SourceError::Http { provider, .. }
            | SourceError::Auth { provider, .. }
            | SourceError::Status { provider, .. }
            | SourceError::Decode { provider, .. } => provider,
        }
    }
}
