pub mod moderation;
pub mod pipeline;
pub mod reconcile;
pub mod seed;
pub mod store;

pub use moderation::{bearer_token, hide_review, set_hidden, show_review, AdminAuth, ModerationError};
pub use pipeline::{list_reviews, refresh_and_list, ListQuery, ProviderReport, RefreshPipeline, RefreshReport};
pub use reconcile::{apply_batch, dedupe_by_id, reconcile, ReconcileCounts};
pub use seed::{load_dataset, parse_dataset, seed_if_empty, sync_from_dataset, SeedError};
pub use store::{JsonFileStore, MemoryStore, ReviewStore, StoreError, UnitOfWork};
