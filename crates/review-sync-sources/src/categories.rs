use crate::extract::FieldRule;
use review_sync_models::{as_int, as_text, ReviewCategory};
use serde_json::Value;
use tracing::debug;

/// Where a provider item may carry structured sub-ratings
const SUB_RATINGS: FieldRule = FieldRule::new(
    "reviewCategory",
    &[&["reviewCategory"], &["categories"], &["ratings"], &["scores"]],
);
const ENTRY_NAME: FieldRule = FieldRule::new("category", &[&["category"], &["name"]]);
const ENTRY_SCORE: FieldRule = FieldRule::new("rating", &[&["rating"], &["score"], &["value"]]);

/// Legacy flat sub-rating keys, appended after any structured entries
pub const FLAT_CATEGORY_KEYS: &[&str] = &[
    "cleanliness",
    "communication",
    "respect_house_rules",
    "accuracy",
    "location",
    "value",
    "check_in",
];

/// Collect the sub-ratings of one raw provider item.
///
/// Structured entries come first (list of objects, or a name → score map),
/// followed by any flat legacy keys. Entries that cannot be read are
/// dropped; duplicates across the two sources are kept.
pub fn normalize_categories(item: &Value) -> Vec<ReviewCategory> {
    let mut categories = Vec::new();

    match SUB_RATINGS.value(item) {
        Some(Value::Array(entries)) => {
            for entry in entries {
                match category_from_entry(entry) {
                    Some(category) => categories.push(category),
                    None => debug!(entry = %entry, "Dropping unreadable category entry"),
                }
            }
        }
        Some(Value::Object(map)) => {
            for (name, score) in map {
                if score.is_null() {
                    continue;
                }
                match as_int(score) {
                    Some(rating) => categories.push(ReviewCategory::new(name.as_str(), rating)),
                    None => debug!(category = %name, "Dropping non-numeric category score"),
                }
            }
        }
        _ => {}
    }

    for key in FLAT_CATEGORY_KEYS {
        let Some(score) = item.get(*key).filter(|v| !v.is_null()) else {
            continue;
        };
        match as_int(score) {
            Some(rating) => categories.push(ReviewCategory::new(*key, rating)),
            None => debug!(category = %key, "Dropping non-numeric flat category score"),
        }
    }

    categories
}

fn category_from_entry(entry: &Value) -> Option<ReviewCategory> {
    if !entry.is_object() {
        return None;
    }
    let name = ENTRY_NAME.value(entry).and_then(as_text)?;
    let score = ENTRY_SCORE.value(entry)?;
    Some(ReviewCategory::new(name, as_int(score)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_of_objects() {
        let item = json!({
            "reviewCategory": [
                {"category": "cleanliness", "rating": 10},
                {"name": "communication", "score": "9"},
                {"category": "accuracy", "value": 8.0}
            ]
        });

        assert_eq!(
            normalize_categories(&item),
            vec![
                ReviewCategory::new("cleanliness", 10),
                ReviewCategory::new("communication", 9),
                ReviewCategory::new("accuracy", 8),
            ]
        );
    }

    #[test]
    fn test_bad_entry_does_not_drop_siblings() {
        let item = json!({
            "reviewCategory": [
                {"category": "cleanliness", "rating": "nine"},
                {"category": "location", "rating": 5},
                {"rating": 4},
                "value"
            ]
        });

        assert_eq!(normalize_categories(&item), vec![ReviewCategory::new("location", 5)]);
    }

    #[test]
    fn test_mapping_form() {
        let item = json!({"scores": {"cleanliness": 9, "value": null, "location": "x", "accuracy": "7"}});

        assert_eq!(
            normalize_categories(&item),
            vec![ReviewCategory::new("cleanliness", 9), ReviewCategory::new("accuracy", 7)]
        );
    }

    #[test]
    fn test_empty_structured_field_falls_through() {
        let item = json!({"reviewCategory": [], "categories": [{"category": "value", "rating": 6}]});
        assert_eq!(normalize_categories(&item), vec![ReviewCategory::new("value", 6)]);
    }

    #[test]
    fn test_flat_keys_are_appended_without_dedup() {
        let item = json!({
            "categories": [{"category": "cleanliness", "rating": 8}],
            "cleanliness": 10,
            "check_in": "9",
            "communication": "n/a"
        });

        assert_eq!(
            normalize_categories(&item),
            vec![
                ReviewCategory::new("cleanliness", 8),
                ReviewCategory::new("cleanliness", 10),
                ReviewCategory::new("check_in", 9),
            ]
        );
    }

    #[test]
    fn test_item_without_ratings() {
        assert!(normalize_categories(&json!({"id": 1, "ratings": 5})).is_empty());
        assert!(normalize_categories(&json!("not an object")).is_empty());
    }
}
