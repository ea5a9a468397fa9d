pub mod client;
pub mod normalize;

pub use client::GoogleClient;
pub use normalize::{namespaced_review_id, normalize_google_response, star_rating};

pub const PROVIDER_NAME: &str = "google";
pub const CHANNEL: &str = "Google";
/// Reviewer name used when the review carries none
pub const ANONYMOUS_REVIEWER: &str = "Google User";
