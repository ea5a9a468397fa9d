use serde::{Deserialize, Serialize};

/// Review type used when neither the provider nor the dataset supplies one.
pub const DEFAULT_REVIEW_TYPE: &str = "host-to-guest";
/// Publication state used when none is supplied.
pub const DEFAULT_STATUS: &str = "published";

/// Canonical review record shared by every provider, the seed dataset and the store.
///
/// Identifiers are partitioned by provider: property-management ids are
/// non-negative, business-review ids are strictly negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub review_type: String,
    pub status: String,
    pub rating: Option<i64>,
    pub public_review: String,
    pub submitted_at: String,
    pub guest_name: String,
    pub listing_name: String,
    // Older store files predate this field
    #[serde(default)]
    pub channel: Option<String>,
    /// Moderation flag, owned by administrators once the record is stored.
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub review_category: Vec<ReviewCategory>,
}

/// One sub-rating of a review. Has no identity outside its parent record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewCategory {
    pub category: String,
    pub rating: i64,
}

impl ReviewCategory {
    pub fn new(category: impl Into<String>, rating: i64) -> Self {
        Self {
            category: category.into(),
            rating,
        }
    }
}

impl ReviewRecord {
    /// A record carrying only an id and the default literals.
    pub fn with_id(id: i64) -> Self {
        Self {
            id,
            review_type: DEFAULT_REVIEW_TYPE.to_string(),
            status: DEFAULT_STATUS.to_string(),
            rating: None,
            public_review: String::new(),
            submitted_at: String::new(),
            guest_name: String::new(),
            listing_name: String::new(),
            channel: None,
            hidden: false,
            review_category: Vec::new(),
        }
    }
}
