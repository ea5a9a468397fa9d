use super::{ANONYMOUS_REVIEWER, CHANNEL};
use crate::extract::FieldRule;
use review_sync_models::{as_int, as_text, ReviewRecord, DEFAULT_STATUS};
use serde_json::Value;
use tracing::debug;

const CONTAINER_KEYS: &[&str] = &["locationReviews", "locations"];
const REVIEWS_KEY: &str = "reviews";
const GUEST_AUTHORED: &str = "guest-to-host";

const LOCATION_NAME: FieldRule = FieldRule::new("locationName", &[&["locationName"]]);
const REVIEW_ID: FieldRule = FieldRule::new("reviewId", &[&["reviewId"], &["name"]]);
const STAR_RATING: FieldRule = FieldRule::new("starRating", &[&["starRating"], &["rating"]]);
const COMMENT: FieldRule = FieldRule::new("comment", &[&["comment"], &["text"]]);
const SUBMITTED_AT: FieldRule = FieldRule::new("createTime", &[&["createTime"], &["updateTime"]]);
const REVIEWER: FieldRule = FieldRule::new("reviewer", &[&["reviewer", "displayName"]]);

/// Normalize a Google Business Profile reviews response.
///
/// Ids are moved into the negative range so they can never collide with
/// Hostaway ids. Unexpected shapes produce an empty result.
pub fn normalize_google_response(data: &Value) -> Vec<ReviewRecord> {
    let mut records = Vec::new();

    for container in locate_containers(data) {
        if !container.is_object() {
            continue;
        }
        let location_name = LOCATION_NAME.text_or(&container, "");
        let reviews: Vec<&Value> = match container.get(REVIEWS_KEY) {
            Some(Value::Array(reviews)) => reviews.iter().collect(),
            // batchGetReviews nests a single review per location entry
            _ => container.get("review").into_iter().collect(),
        };

        for review in reviews {
            if let Some(record) = normalize_review(review, &location_name) {
                records.push(record);
            }
        }
    }

    debug!(provider = "google", normalized = records.len(), "Normalized Google response");
    records
}

fn locate_containers(data: &Value) -> Vec<Value> {
    match data {
        Value::Array(containers) => containers.clone(),
        Value::Object(map) => {
            let containers = CONTAINER_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .cloned()
                .unwrap_or_default();
            if containers.is_empty() {
                if let Some(reviews) = map.get(REVIEWS_KEY).filter(|v| v.is_array()) {
                    return vec![serde_json::json!({"locationName": "", "reviews": reviews})];
                }
            }
            containers
        }
        _ => Vec::new(),
    }
}

fn normalize_review(review: &Value, location_name: &str) -> Option<ReviewRecord> {
    if !review.is_object() {
        return None;
    }
    let Some(id) = REVIEW_ID.value(review).and_then(namespaced_review_id) else {
        debug!(review = %review, "Skipping Google review without a usable id");
        return None;
    };

    Some(ReviewRecord {
        id,
        review_type: GUEST_AUTHORED.to_string(),
        status: DEFAULT_STATUS.to_string(),
        rating: STAR_RATING.value(review).and_then(star_rating),
        public_review: COMMENT.text_or(review, ""),
        submitted_at: SUBMITTED_AT.text_or(review, ""),
        guest_name: REVIEWER.text_or(review, ANONYMOUS_REVIEWER),
        listing_name: location_name.to_string(),
        channel: Some(CHANNEL.to_string()),
        hidden: false,
        review_category: Vec::new(),
    })
}

/// Map a Google review identifier into the negative id space.
///
/// Integers are negated; resource names use their trailing path segment
/// when it is numeric, otherwise the CRC-32 of the whole name. Returns
/// `None` for ids that cannot be placed strictly below zero.
pub fn namespaced_review_id(raw: &Value) -> Option<i64> {
    let magnitude = match raw {
        Value::Number(n) => n.as_i64()?,
        Value::String(name) => {
            let tail = name.rsplit('/').next().unwrap_or(name).trim();
            match tail.parse::<i64>() {
                Ok(n) => n,
                Err(_) => i64::from(crc32fast::hash(name.as_bytes())),
            }
        }
        _ => return None,
    };

    match magnitude {
        0 => None,
        i64::MIN => Some(i64::MIN),
        n => Some(-n.abs()),
    }
}

/// Numeric ratings are truncated; text accepts `ONE`..`FIVE` and `1`..`5`
pub fn star_rating(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(_) | Value::Bool(_) => as_int(raw),
        Value::String(_) => {
            let text = as_text(raw)?.to_uppercase();
            match text.as_str() {
                "ONE" | "1" => Some(1),
                "TWO" | "2" => Some(2),
                "THREE" | "3" => Some(3),
                "FOUR" | "4" => Some(4),
                "FIVE" | "5" => Some(5),
                _ => None,
            }
        }
        _ => None,
    }
}
