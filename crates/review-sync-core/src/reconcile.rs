use crate::store::{ReviewStore, StoreError, UnitOfWork};
use review_sync_models::{
    IncomingCategory, IncomingReview, ReviewCategory, ReviewRecord, DEFAULT_REVIEW_TYPE,
    DEFAULT_STATUS,
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// How many records a reconcile pass created and updated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileCounts {
    pub created: usize,
    pub updated: usize,
}

impl ReconcileCounts {
    pub fn total(&self) -> usize {
        self.created + self.updated
    }
}

/// Keep the first occurrence of every id, preserving order
pub fn dedupe_by_id(items: Vec<IncomingReview>) -> Vec<IncomingReview> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(item.id)).collect()
}

/// Upsert a batch into an open unit of work.
///
/// Records are never deleted here. The caller decides whether to commit.
pub fn apply_batch<S: ReviewStore + ?Sized>(
    uow: &mut UnitOfWork<'_, S>,
    items: Vec<IncomingReview>,
) -> Result<ReconcileCounts, StoreError> {
    let mut counts = ReconcileCounts::default();

    for item in dedupe_by_id(items) {
        match uow.get(item.id)? {
            Some(existing) => {
                let merged = merge_existing(uow, existing, item);
                uow.insert(merged);
                counts.updated += 1;
            }
            None => {
                uow.insert(create_record(item));
                counts.created += 1;
            }
        }
    }

    Ok(counts)
}

/// Upsert a batch into `store` in one transaction.
///
/// Nothing is written when the batch is empty.
#[instrument(skip_all, fields(items = items.len()))]
pub fn reconcile<S: ReviewStore + ?Sized>(
    store: &mut S,
    items: Vec<IncomingReview>,
) -> Result<ReconcileCounts, StoreError> {
    let mut uow = UnitOfWork::begin(store);
    let counts = apply_batch(&mut uow, items)?;

    if counts.total() > 0 {
        uow.commit()?;
        info!(
            created = counts.created,
            updated = counts.updated,
            "Reconciled reviews"
        );
    } else {
        debug!("Nothing to reconcile");
    }

    Ok(counts)
}

fn merge_existing<S: ReviewStore + ?Sized>(
    uow: &mut UnitOfWork<'_, S>,
    mut row: ReviewRecord,
    item: IncomingReview,
) -> ReviewRecord {
    fn overwrite(slot: &mut String, value: Option<String>) {
        if let Some(value) = value {
            *slot = value;
        }
    }

    overwrite(&mut row.review_type, item.review_type);
    overwrite(&mut row.status, item.status);
    overwrite(&mut row.public_review, item.public_review);
    overwrite(&mut row.submitted_at, item.submitted_at);
    overwrite(&mut row.guest_name, item.guest_name);
    overwrite(&mut row.listing_name, item.listing_name);
    if item.channel.is_some() {
        row.channel = item.channel;
    }

    // Rating and sub-ratings always follow the incoming item, even when absent
    row.rating = item.rating;
    uow.delete_categories(&mut row);
    row.review_category = resolve_categories(&item.review_category);

    row
}

fn create_record(item: IncomingReview) -> ReviewRecord {
    ReviewRecord {
        id: item.id,
        review_type: item
            .review_type
            .unwrap_or_else(|| DEFAULT_REVIEW_TYPE.to_string()),
        status: item.status.unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        rating: item.rating,
        public_review: item.public_review.unwrap_or_default(),
        submitted_at: item.submitted_at.unwrap_or_default(),
        guest_name: item.guest_name.unwrap_or_default(),
        listing_name: item.listing_name.unwrap_or_default(),
        channel: item.channel,
        hidden: false,
        review_category: resolve_categories(&item.review_category),
    }
}

fn resolve_categories(entries: &[IncomingCategory]) -> Vec<ReviewCategory> {
    entries
        .iter()
        .filter_map(|entry| {
            let resolved = entry.resolve();
            if resolved.is_none() {
                debug!(entry = %entry.0, "Skipping unusable category entry");
            }
            resolved
        })
        .collect()
}
