use super::DEFAULT_CHANNEL;
use crate::categories::normalize_categories;
use crate::extract::FieldRule;
use review_sync_models::{ReviewRecord, DEFAULT_REVIEW_TYPE, DEFAULT_STATUS};
use serde_json::Value;
use tracing::debug;

/// Container keys tried, in order, before falling back to the first list field
const CONTAINER_KEYS: &[&str] = &["result", "results", "data", "reviews", "list"];

const ID: FieldRule = FieldRule::new("id", &[&["id"], &["reviewId"], &["reservationId"]]);
const RATING: FieldRule = FieldRule::new("rating", &[&["rating"], &["overall"], &["stars"]]);
const REVIEW_TYPE: FieldRule = FieldRule::new("type", &[&["type"]]);
const STATUS: FieldRule = FieldRule::new("status", &[&["status"]]);
const PUBLIC_REVIEW: FieldRule = FieldRule::new(
    "publicReview",
    &[&["publicReview"], &["comment"], &["review"], &["text"]],
);
const SUBMITTED_AT: FieldRule = FieldRule::new(
    "submittedAt",
    &[&["submittedAt"], &["createdAt"], &["createTime"]],
);
const GUEST_NAME: FieldRule = FieldRule::new(
    "guestName",
    &[&["guestName"], &["guest", "name"], &["reviewer", "displayName"]],
);
const LISTING_NAME: FieldRule = FieldRule::new(
    "listingName",
    &[&["listingName"], &["listing", "name"], &["propertyName"]],
);
const CHANNEL: FieldRule = FieldRule::new("channel", &[&["channel"], &["source"]]);

/// Normalize a Hostaway reviews response into canonical records.
///
/// Items without an integer id, or with a negative one, are dropped so
/// that this provider only ever emits non-negative ids.
pub fn normalize_hostaway_response(data: &Value) -> Vec<ReviewRecord> {
    let items = locate_reviews(data);
    let mut records = Vec::with_capacity(items.len());
    let mut dropped = 0usize;

    for item in items {
        match normalize_item(item) {
            Some(record) => records.push(record),
            None => dropped += 1,
        }
    }

    debug!(
        provider = "hostaway",
        items = items.len(),
        normalized = records.len(),
        dropped,
        "Normalized Hostaway response"
    );
    records
}

/// Find the review list inside an arbitrary response shape
pub fn locate_reviews(data: &Value) -> &[Value] {
    match data {
        Value::Array(items) => items,
        Value::Object(map) => {
            // The first container key holding a list wins, even an empty one
            let preferred = CONTAINER_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array));
            preferred
                .or_else(|| map.values().find_map(Value::as_array))
                .map(Vec::as_slice)
                .unwrap_or(&[])
        }
        _ => &[],
    }
}

fn normalize_item(item: &Value) -> Option<ReviewRecord> {
    if !item.is_object() {
        return None;
    }

    let id = ID.int(item).filter(|id| *id >= 0);
    let Some(id) = id else {
        debug!(item = %item, "Skipping Hostaway item without a usable id");
        return None;
    };

    Some(ReviewRecord {
        id,
        review_type: REVIEW_TYPE.text_or(item, DEFAULT_REVIEW_TYPE),
        status: STATUS.text_or(item, DEFAULT_STATUS),
        rating: RATING.int(item),
        public_review: PUBLIC_REVIEW.text_or(item, ""),
        submitted_at: SUBMITTED_AT.text_or(item, ""),
        guest_name: GUEST_NAME.text_or(item, ""),
        listing_name: LISTING_NAME.text_or(item, ""),
        channel: Some(CHANNEL.text_or(item, DEFAULT_CHANNEL)),
        hidden: false,
        review_category: normalize_categories(item),
    })
}
