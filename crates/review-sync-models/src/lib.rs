pub mod coerce;
pub mod incoming;
pub mod review;

pub use coerce::{as_int, as_text};
pub use incoming::{IncomingCategory, IncomingReview};
pub use review::{ReviewCategory, ReviewRecord, DEFAULT_REVIEW_TYPE, DEFAULT_STATUS};
