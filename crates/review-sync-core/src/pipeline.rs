use crate::moderation::{AdminAuth, ModerationError};
use crate::reconcile::{reconcile, ReconcileCounts};
use crate::store::ReviewStore;
use chrono::{DateTime, Utc};
use review_sync_models::{IncomingReview, ReviewRecord};
use review_sync_sources::{FetchOutcome, ReviewProvider};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// What one provider contributed to a refresh
#[derive(Debug, Clone, Serialize)]
pub struct ProviderReport {
    pub provider: String,
    pub outcome: &'static str,
    pub fetched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshReport {
    pub created: usize,
    pub updated: usize,
    pub providers: Vec<ProviderReport>,
    pub errors: Vec<String>,
    pub refreshed_at: DateTime<Utc>,
    #[serde(skip)]
    pub duration: Duration,
}

impl RefreshReport {
    pub fn counts(&self) -> ReconcileCounts {
        ReconcileCounts {
            created: self.created,
            updated: self.updated,
        }
    }
}

/// Fetches every provider and reconciles the results into a store.
pub struct RefreshPipeline {
    providers: Vec<Box<dyn ReviewProvider>>,
}

impl RefreshPipeline {
    pub fn new(providers: Vec<Box<dyn ReviewProvider>>) -> Self {
        Self { providers }
    }

    /// Fetch each provider in turn, then upsert everything they returned as one batch.
    ///
    /// Never fails: provider and store errors are recorded in the report.
    #[instrument(skip_all, fields(providers = self.providers.len()))]
    pub async fn refresh<S: ReviewStore + ?Sized>(&self, store: &mut S) -> RefreshReport {
        let start = Instant::now();
        let mut providers = Vec::with_capacity(self.providers.len());
        let mut errors = Vec::new();
        let mut batch: Vec<IncomingReview> = Vec::new();

        for provider in &self.providers {
            let name = provider.provider_name().to_string();

            let outcome = match provider.fetch_reviews().await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(provider = %name, error = %e, "Provider fetch failed");
                    errors.push(format!("{}: {}", name, e));
                    providers.push(ProviderReport {
                        provider: name,
                        outcome: "failed",
                        fetched: 0,
                    });
                    continue;
                }
            };

            let label = outcome.label();
            let records = match outcome {
                FetchOutcome::Reviews(records) => records,
                FetchOutcome::Empty => Vec::new(),
                FetchOutcome::Unavailable(reason) => {
                    warn!(provider = %name, reason = %reason, "Provider unavailable");
                    Vec::new()
                }
                FetchOutcome::Disabled => {
                    debug!(provider = %name, "Provider disabled, skipping");
                    Vec::new()
                }
            };

            info!(provider = %name, outcome = label, fetched = records.len(), "Provider fetched");
            providers.push(ProviderReport {
                provider: name,
                outcome: label,
                fetched: records.len(),
            });
            batch.extend(records.into_iter().map(IncomingReview::from));
        }

        let mut counts = ReconcileCounts::default();
        if !batch.is_empty() {
            match reconcile(store, batch) {
                Ok(result) => counts = result,
                Err(e) => {
                    error!(error = %e, "Failed to store fetched reviews");
                    errors.push(format!("store: {}", e));
                }
            }
        }

        let report = RefreshReport {
            created: counts.created,
            updated: counts.updated,
            providers,
            errors,
            refreshed_at: Utc::now(),
            duration: start.elapsed(),
        };
        info!(
            created = report.created,
            updated = report.updated,
            errors = report.errors.len(),
            "Refresh finished in {:.2}s",
            report.duration.as_secs_f64()
        );
        report
    }
}

/// Read-side filter for [`list_reviews`]
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub include_hidden: bool,
    pub token: Option<String>,
}

/// Stored reviews, newest first.
///
/// Hidden records are only returned to an authorized caller who asks for them.
pub fn list_reviews<S: ReviewStore + ?Sized>(
    store: &S,
    query: &ListQuery,
    auth: &AdminAuth,
) -> Result<Vec<ReviewRecord>, ModerationError> {
    if query.include_hidden {
        auth.authorize(query.token.as_deref())?;
    }

    let mut reviews: Vec<ReviewRecord> = store
        .list()?
        .into_iter()
        .filter(|r| query.include_hidden || !r.hidden)
        .collect();
    // Stable sort keeps id order among equal timestamps
    reviews.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    Ok(reviews)
}

/// Read path: refresh from the providers, then list whatever the store holds
pub async fn refresh_and_list<S: ReviewStore + ?Sized>(
    pipeline: &RefreshPipeline,
    store: &mut S,
    query: &ListQuery,
    auth: &AdminAuth,
) -> Result<(RefreshReport, Vec<ReviewRecord>), ModerationError> {
    let report = pipeline.refresh(store).await;
    let reviews = list_reviews(store, query, auth)?;
    Ok((report, reviews))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use review_sync_models::ReviewCategory;
    use review_sync_sources::SourceError;

    struct FakeProvider {
        name: &'static str,
        outcome: fn() -> Result<FetchOutcome, SourceError>,
    }

    #[async_trait]
    impl ReviewProvider for FakeProvider {
        fn provider_name(&self) -> &str {
            self.name
        }

        fn is_enabled(&self) -> bool {
            true
        }

        async fn fetch_reviews(&self) -> Result<FetchOutcome, SourceError> {
            (self.outcome)()
        }
    }

    fn review(id: i64, submitted_at: &str) -> ReviewRecord {
        let mut record = ReviewRecord::with_id(id);
        record.submitted_at = submitted_at.to_string();
        record
    }

    fn hostaway_reviews() -> Result<FetchOutcome, SourceError> {
        let mut record = review(7001, "2024-01-02 10:00:00");
        record.channel = Some("Hostaway".to_string());
        record.review_category = vec![ReviewCategory::new("cleanliness", 10)];
        Ok(FetchOutcome::Reviews(vec![record, review(7002, "2024-03-01 09:00:00")]))
    }

    fn google_reviews() -> Result<FetchOutcome, SourceError> {
        let mut record = review(-7001, "2024-02-01T12:00:00Z");
        record.review_type = "guest-to-host".to_string();
        record.channel = Some("Google".to_string());
        Ok(FetchOutcome::Reviews(vec![record]))
    }

    fn google_failure() -> Result<FetchOutcome, SourceError> {
        Err(SourceError::Status {
            provider: "google",
            status: 403,
            body: "forbidden".to_string(),
        })
    }

    fn unavailable() -> Result<FetchOutcome, SourceError> {
        Ok(FetchOutcome::Unavailable("token request failed".to_string()))
    }

    fn provider(
        name: &'static str,
        outcome: fn() -> Result<FetchOutcome, SourceError>,
    ) -> Box<dyn ReviewProvider> {
        Box::new(FakeProvider { name, outcome })
    }

    #[tokio::test]
    async fn test_refresh_merges_both_providers() {
        let pipeline = RefreshPipeline::new(vec![
            provider("hostaway", hostaway_reviews),
            provider("google", google_reviews),
        ]);
        let mut store = MemoryStore::new();

        let report = pipeline.refresh(&mut store).await;
        assert_eq!(report.created, 3);
        assert_eq!(report.updated, 0);
        assert!(report.errors.is_empty());
        assert_eq!(store.get(-7001).unwrap().unwrap().channel.as_deref(), Some("Google"));
        assert_eq!(store.get(7001).unwrap().unwrap().review_category.len(), 1);

        let again = pipeline.refresh(&mut store).await;
        assert_eq!(again.counts(), ReconcileCounts { created: 0, updated: 3 });
    }

    #[tokio::test]
    async fn test_refresh_survives_provider_failure() {
        let pipeline = RefreshPipeline::new(vec![
            provider("google", google_failure),
            provider("hostaway", hostaway_reviews),
        ]);
        let mut store = MemoryStore::new();

        let report = pipeline.refresh(&mut store).await;
        assert_eq!(report.created, 2);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("google"));
        assert_eq!(report.providers[0].outcome, "failed");
        assert_eq!(report.providers[1].fetched, 2);
    }

    #[tokio::test]
    async fn test_unavailable_provider_leaves_store_untouched() {
        let pipeline = RefreshPipeline::new(vec![provider("hostaway", unavailable)]);
        let mut store = MemoryStore::new();
        store.commit(vec![review(1, "2023-01-01")]).unwrap();

        let report = pipeline.refresh(&mut store).await;
        assert_eq!(report.counts(), ReconcileCounts::default());
        assert!(report.errors.is_empty());
        assert_eq!(report.providers[0].outcome, "unavailable");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_refresh_preserves_hidden_flag() {
        let pipeline = RefreshPipeline::new(vec![provider("hostaway", hostaway_reviews)]);
        let mut store = MemoryStore::new();
        pipeline.refresh(&mut store).await;

        let mut row = store.get(7001).unwrap().unwrap();
        row.hidden = true;
        store.commit(vec![row]).unwrap();

        pipeline.refresh(&mut store).await;
        assert!(store.get(7001).unwrap().unwrap().hidden);
    }

    #[tokio::test]
    async fn test_refresh_and_list_orders_newest_first() {
        let pipeline = RefreshPipeline::new(vec![
            provider("hostaway", hostaway_reviews),
            provider("google", google_reviews),
        ]);
        let mut store = MemoryStore::new();

        let (_, reviews) = refresh_and_list(&pipeline, &mut store, &ListQuery::default(), &AdminAuth::default())
            .await
            .unwrap();
        let ids: Vec<i64> = reviews.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![7002, -7001, 7001]);
    }

    #[test]
    fn test_list_hides_moderated_reviews() {
        let mut store = MemoryStore::new();
        let mut hidden = review(1, "2024-01-01");
        hidden.hidden = true;
        store.commit(vec![hidden, review(2, "2023-01-01")]).unwrap();
        let auth = AdminAuth::new(Some("s3cret".to_string()));

        let public = list_reviews(&store, &ListQuery::default(), &auth).unwrap();
        assert_eq!(public.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);

        let admin_query = ListQuery {
            include_hidden: true,
            token: Some("s3cret".to_string()),
        };
        let all = list_reviews(&store, &admin_query, &auth).unwrap();
        assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);

        let bad_query = ListQuery {
            include_hidden: true,
            token: Some("nope".to_string()),
        };
        assert!(matches!(
            list_reviews(&store, &bad_query, &auth),
            Err(ModerationError::Unauthorized)
        ));
    }
}
