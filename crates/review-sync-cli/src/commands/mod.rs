pub mod config;
pub mod list;
pub mod moderate;
pub mod refresh;
pub mod seed;

use color_eyre::Result;
use review_sync_config::{Config, CredentialStore, PathManager};
use review_sync_core::{AdminAuth, JsonFileStore, RefreshPipeline};
use review_sync_sources::ProviderRegistry;

/// Everything a command needs, loaded from the standard locations
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();

        let config_file = paths.config_file();
        let config = Config::load(&config_file).map_err(|e| {
            color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e)
        })?;
        config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

        let credentials_file = paths.credentials_file();
        let mut credentials = CredentialStore::new(credentials_file.clone());
        credentials.load().map_err(|e| {
            color_eyre::eyre::eyre!(
                "Failed to load credentials from {}: {}",
                credentials_file.display(),
                e
            )
        })?;

        Ok(Self {
            paths,
            config,
            credentials,
        })
    }

    pub fn open_store(&self) -> Result<JsonFileStore> {
        let path = self.config.store_path(self.paths.store_file());
        JsonFileStore::open(&path)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to open review store: {}", e))
    }

    pub fn pipeline(&self) -> RefreshPipeline {
        let registry = ProviderRegistry::new();
        RefreshPipeline::new(registry.create_all(&self.config, &self.credentials))
    }

    pub fn admin_auth(&self) -> AdminAuth {
        AdminAuth::from_config(&self.config, &self.credentials)
    }
}
