pub mod client;
pub mod normalize;

pub use client::HostawayClient;
pub use normalize::normalize_hostaway_response;

pub const PROVIDER_NAME: &str = "hostaway";
/// Channel label used when an item names none
pub const DEFAULT_CHANNEL: &str = "Hostaway";
