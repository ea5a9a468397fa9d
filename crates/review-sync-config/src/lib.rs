pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{AdminConfig, Config, DatasetConfig, GoogleConfig, ProviderConfig, ProvidersConfig, StorageConfig};
pub use credentials::CredentialStore;
pub use paths::PathManager;
