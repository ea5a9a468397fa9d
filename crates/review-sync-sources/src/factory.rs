//! Provider factory pattern for building review providers from configuration
//!
//! Providers are created in a fixed order (Hostaway, then Google) so that
//! batches are assembled deterministically.

use crate::google::GoogleClient;
use crate::hostaway::HostawayClient;
use crate::traits::ReviewProvider;
use review_sync_config::{Config, CredentialStore};

/// Factory trait for creating a review provider from configuration
pub trait ProviderFactory: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Always returns a provider; an unconfigured one reports itself disabled
    fn create_provider(&self, config: &Config, credentials: &CredentialStore) -> Box<dyn ReviewProvider>;
}

pub struct HostawayFactory;

impl ProviderFactory for HostawayFactory {
    fn provider_name(&self) -> &str {
        crate::hostaway::PROVIDER_NAME
    }

    fn create_provider(&self, config: &Config, _credentials: &CredentialStore) -> Box<dyn ReviewProvider> {
        Box::new(HostawayClient::new(config.providers.hostaway.clone()))
    }
}

pub struct GoogleFactory;

impl ProviderFactory for GoogleFactory {
    fn provider_name(&self) -> &str {
        crate::google::PROVIDER_NAME
    }

    fn create_provider(&self, config: &Config, credentials: &CredentialStore) -> Box<dyn ReviewProvider> {
        Box::new(GoogleClient::new(
            config.providers.google.clone(),
            credentials.get_google_refresh_token().cloned(),
        ))
    }
}

/// Ordered registry of provider factories
pub struct ProviderRegistry {
    factories: Vec<Box<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    /// Create a new registry with the built-in providers registered
    pub fn new() -> Self {
        let mut registry = Self { factories: Vec::new() };
        registry.register(Box::new(HostawayFactory));
        registry.register(Box::new(GoogleFactory));
        registry
    }

    /// Register a factory; a factory with the same name is replaced in place
    pub fn register(&mut self, factory: Box<dyn ProviderFactory>) {
        match self
            .factories
            .iter()
            .position(|f| f.provider_name() == factory.provider_name())
        {
            Some(index) => self.factories[index] = factory,
            None => self.factories.push(factory),
        }
    }

    pub fn create_all(&self, config: &Config, credentials: &CredentialStore) -> Vec<Box<dyn ReviewProvider>> {
        self.factories
            .iter()
            .map(|factory| factory.create_provider(config, credentials))
            .collect()
    }

    pub fn registered_providers(&self) -> Vec<&str> {
        self.factories.iter().map(|f| f.provider_name()).collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
