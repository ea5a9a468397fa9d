use crate::coerce::{as_int, as_text};
use crate::review::{ReviewCategory, ReviewRecord};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A review as it arrives for reconciliation.
///
/// Every field except `id` may be absent. Absent text fields leave the
/// stored value untouched on update; `rating` and `review_category` are
/// always replaced. Any incoming `hidden` value is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomingReview {
    pub id: i64,
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub review_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub rating: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub public_review: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub submitted_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub guest_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub listing_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub review_category: Vec<IncomingCategory>,
}

/// A category entry whose shape has not been checked yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct IncomingCategory(pub Value);

impl IncomingCategory {
    /// Resolve into a stored category entry.
    ///
    /// A missing name becomes the empty string and a missing rating becomes
    /// zero; a rating that is present but not an integer rejects the entry,
    /// as does an entry that is not an object.
    pub fn resolve(&self) -> Option<ReviewCategory> {
        let entry = self.0.as_object()?;
        let category = entry.get("category").and_then(as_text).unwrap_or_default();
        let rating = match entry.get("rating") {
            None | Some(Value::Null) => 0,
            Some(raw) => as_int(raw)?,
        };
        Some(ReviewCategory::new(category, rating))
    }
}

impl From<ReviewCategory> for IncomingCategory {
    fn from(category: ReviewCategory) -> Self {
        Self(serde_json::json!({
            "category": category.category,
            "rating": category.rating,
        }))
    }
}

impl From<ReviewRecord> for IncomingReview {
    fn from(record: ReviewRecord) -> Self {
        Self {
            id: record.id,
            review_type: Some(record.review_type),
            status: Some(record.status),
            rating: record.rating,
            public_review: Some(record.public_review),
            submitted_at: Some(record.submitted_at),
            guest_name: Some(record.guest_name),
            listing_name: Some(record.listing_name),
            channel: record.channel,
            review_category: record.review_category.into_iter().map(Into::into).collect(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_int(&value))
}

fn nullable_list<'de, D>(deserializer: D) -> Result<Vec<IncomingCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().map(IncomingCategory).collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_fields_stay_absent() {
        let incoming: IncomingReview = serde_json::from_value(json!({"id": 12})).unwrap();
        assert_eq!(incoming.id, 12);
        assert_eq!(incoming.public_review, None);
        assert_eq!(incoming.rating, None);
        assert!(incoming.review_category.is_empty());
    }

    #[test]
    fn test_lenient_field_shapes() {
        let incoming: IncomingReview = serde_json::from_value(json!({
            "id": 5,
            "rating": "8",
            "guestName": null,
            "submittedAt": 1700000000,
            "reviewCategory": null,
            "hidden": true
        }))
        .unwrap();
        assert_eq!(incoming.rating, Some(8));
        assert_eq!(incoming.guest_name, None);
        assert_eq!(incoming.submitted_at.as_deref(), Some("1700000000"));
        assert!(incoming.review_category.is_empty());
    }

    #[test]
    fn test_non_integer_id_is_rejected() {
        assert!(serde_json::from_value::<IncomingReview>(json!({"id": "abc"})).is_err());
        assert!(serde_json::from_value::<IncomingReview>(json!({"rating": 3})).is_err());
    }

    #[test]
    fn test_category_resolution() {
        let valid = IncomingCategory(json!({"category": "location", "rating": 5}));
        assert_eq!(valid.resolve(), Some(ReviewCategory::new("location", 5)));

        let bad_rating = IncomingCategory(json!({"category": "cleanliness", "rating": "nine"}));
        assert_eq!(bad_rating.resolve(), None);

        let defaults = IncomingCategory(json!({}));
        assert_eq!(defaults.resolve(), Some(ReviewCategory::new("", 0)));

        assert_eq!(IncomingCategory(json!("cleanliness")).resolve(), None);
    }

    #[test]
    fn test_from_record_round_trips_categories() {
        let mut record = ReviewRecord::with_id(1);
        record.review_category.push(ReviewCategory::new("value", 9));
        let incoming = IncomingReview::from(record);
        assert_eq!(incoming.review_type.as_deref(), Some("host-to-guest"));
        assert_eq!(incoming.review_category[0].resolve(), Some(ReviewCategory::new("value", 9)));
    }
}
