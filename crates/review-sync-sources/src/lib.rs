pub mod categories;
pub mod error;
pub mod extract;
pub mod factory;
pub mod google;
pub mod hostaway;
pub mod http;
pub mod traits;

pub use categories::normalize_categories;
pub use error::SourceError;
pub use factory::{ProviderFactory, ProviderRegistry};
pub use google::{normalize_google_response, GoogleClient};
pub use hostaway::{normalize_hostaway_response, HostawayClient};
pub use traits::{FetchOutcome, ReviewProvider};
