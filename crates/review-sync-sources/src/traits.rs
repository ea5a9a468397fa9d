use async_trait::async_trait;
use review_sync_models::ReviewRecord;
use crate::error::SourceError;

/// Result of asking one provider for its reviews.
///
/// `Unavailable` covers auth failures, transport errors and non-success
/// responses that the provider chooses not to raise; callers treat it like
/// `Empty`, but it stays distinguishable for reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Reviews(Vec<ReviewRecord>),
    Empty,
    Unavailable(String),
    /// Not configured; no request was made
    Disabled,
}

impl FetchOutcome {
    pub fn from_records(records: Vec<ReviewRecord>) -> Self {
        if records.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Reviews(records)
        }
    }

    pub fn into_records(self) -> Vec<ReviewRecord> {
        match self {
            FetchOutcome::Reviews(records) => records,
            FetchOutcome::Empty | FetchOutcome::Unavailable(_) | FetchOutcome::Disabled => Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchOutcome::Reviews(_) => "reviews",
            FetchOutcome::Empty => "empty",
            FetchOutcome::Unavailable(_) => "unavailable",
            FetchOutcome::Disabled => "disabled",
        }
    }
}

#[async_trait]
pub trait ReviewProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Configured with credentials; a disabled provider is never contacted
    fn is_enabled(&self) -> bool;

    /// Fetch and normalize the provider's reviews into canonical records
    async fn fetch_reviews(&self) -> Result<FetchOutcome, SourceError>;
}
