use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const HOSTAWAY_API_URL: &str = "https://api.hostaway.com/v1/reviews";
pub const HOSTAWAY_AUTH_URL: &str = "https://api.hostaway.com/v1/accessTokens";
pub const GOOGLE_API_URL: &str = "https://mybusiness.googleapis.com/v4";
pub const GOOGLE_AUTH_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub hostaway: ProviderConfig,
    #[serde(default)]
    pub google: GoogleConfig,
}

/// Connection settings shared by every review provider.
///
/// A provider without both credentials is treated as disabled and is never
/// contacted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub endpoint_url: String,
    #[serde(default)]
    pub auth_url: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(flatten)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub account_id: String,
    /// Location resource names passed to batchGetReviews; empty means all
    #[serde(default)]
    pub location_names: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            endpoint_url: String::new(),
            auth_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn has_credentials(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }

    /// Enabled in the file and carrying credentials
    pub fn is_configured(&self) -> bool {
        self.enabled && self.has_credentials()
    }

    fn fill_urls(&mut self, endpoint_url: &str, auth_url: &str) {
        if self.endpoint_url.trim().is_empty() {
            self.endpoint_url = endpoint_url.to_string();
        }
        if self.auth_url.trim().is_empty() {
            self.auth_url = auth_url.to_string();
        }
    }
}

impl GoogleConfig {
    pub fn is_configured(&self) -> bool {
        self.provider.is_configured() && !self.account_id.trim().is_empty()
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.fill_defaults();
        Ok(config)
    }

    /// Load the file if it exists, otherwise start from defaults; env overrides apply either way
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            let mut config = Self::default();
            config.fill_defaults();
            config
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn fill_defaults(&mut self) {
        self.providers.hostaway.fill_urls(HOSTAWAY_API_URL, HOSTAWAY_AUTH_URL);
        self.providers.google.provider.fill_urls(GOOGLE_API_URL, GOOGLE_AUTH_URL);
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay provider settings from a key lookup (environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let hostaway = &mut self.providers.hostaway;
        if let Some(v) = get("HOSTAWAY_CLIENT_ID") {
            hostaway.client_id = v;
        }
        if let Some(v) = get("HOSTAWAY_CLIENT_SECRET") {
            hostaway.client_secret = v;
        }
        if let Some(v) = get("HOSTAWAY_API_URL") {
            hostaway.endpoint_url = v;
        }
        if let Some(v) = get("HOSTAWAY_AUTH_URL") {
            hostaway.auth_url = v;
        }

        let google = &mut self.providers.google;
        if let Some(v) = get("GOOGLE_CLIENT_ID") {
            google.provider.client_id = v;
        }
        if let Some(v) = get("GOOGLE_CLIENT_SECRET") {
            google.provider.client_secret = v;
        }
        if let Some(v) = get("GOOGLE_BUSINESS_PROFILE_ACCOUNT_ID") {
            google.account_id = v;
        }

        if let Some(v) = get("DASHBOARD_TOKEN") {
            self.admin.token = Some(v);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let providers = [
            ("hostaway", &self.providers.hostaway),
            ("google", &self.providers.google.provider),
        ];
        for (name, provider) in providers {
            if provider.timeout_secs == 0 {
                return Err(anyhow::anyhow!("{}: timeout_secs must be positive", name));
            }
            for url in [&provider.endpoint_url, &provider.auth_url] {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(anyhow::anyhow!("{}: invalid URL '{}'", name, url));
                }
            }
        }
        if let Some(token) = &self.admin.token {
            if token.trim().is_empty() {
                return Err(anyhow::anyhow!("admin.token cannot be blank"));
            }
        }
        Ok(())
    }

    /// Get list of providers that will actually be contacted
    pub fn configured_providers(&self) -> Vec<String> {
        let mut providers = Vec::new();
        if self.providers.hostaway.is_configured() {
            providers.push("hostaway".to_string());
        }
        if self.providers.google.is_configured() {
            providers.push("google".to_string());
        }
        providers
    }

    pub fn store_path(&self, default: PathBuf) -> PathBuf {
        self.storage.path.clone().unwrap_or(default)
    }

    pub fn dataset_path(&self, default: PathBuf) -> PathBuf {
        self.dataset.path.clone().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.providers.hostaway.client_id = "test_id".to_string();
        config.providers.hostaway.client_secret = "test_secret".to_string();
        config.providers.google.account_id = "acct".to_string();
        config.providers.google.location_names = vec!["locations/1".to_string()];
        config.admin.token = Some("s3cret".to_string());

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.providers.hostaway.client_id, "test_id");
        assert_eq!(loaded.providers.hostaway.endpoint_url, HOSTAWAY_API_URL);
        assert_eq!(loaded.providers.google.account_id, "acct");
        assert_eq!(loaded.providers.google.location_names, vec!["locations/1".to_string()]);
        assert_eq!(loaded.providers.google.provider.auth_url, GOOGLE_AUTH_URL);
        assert_eq!(loaded.admin.token.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_partial_file_gets_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "[providers.hostaway]\nclient_id = \"abc\"\nclient_secret = \"xyz\"\n",
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert!(config.providers.hostaway.enabled);
        assert_eq!(config.providers.hostaway.timeout_secs, 10);
        assert_eq!(config.providers.hostaway.auth_url, HOSTAWAY_AUTH_URL);
        assert_eq!(config.configured_providers(), vec!["hostaway".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_credentials_disable_provider() {
        let mut config = Config::default();
        config.fill_defaults();
        assert!(config.configured_providers().is_empty());

        config.providers.hostaway.client_id = "id".to_string();
        assert!(!config.providers.hostaway.is_configured());

        config.providers.hostaway.client_secret = "secret".to_string();
        config.providers.hostaway.enabled = false;
        assert!(!config.providers.hostaway.is_configured());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("HOSTAWAY_CLIENT_ID", "61148"),
            ("HOSTAWAY_CLIENT_SECRET", "f94377"),
            ("GOOGLE_BUSINESS_PROFILE_ACCOUNT_ID", "1234"),
            ("GOOGLE_CLIENT_ID", ""),
            ("DASHBOARD_TOKEN", "demo"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.fill_defaults();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert!(config.providers.hostaway.is_configured());
        assert_eq!(config.providers.google.account_id, "1234");
        assert!(config.providers.google.provider.client_id.is_empty());
        assert!(!config.providers.google.is_configured());
        assert_eq!(config.admin.token.as_deref(), Some("demo"));
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        config.fill_defaults();
        assert!(config.validate().is_ok());

        config.providers.google.provider.endpoint_url = "ftp://example".to_string();
        assert!(config.validate().is_err());

        config.fill_defaults();
        config.providers.google.provider.endpoint_url = GOOGLE_API_URL.to_string();
        config.providers.hostaway.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.providers.hostaway.timeout_secs = 5;
        config.admin.token = Some("  ".to_string());
        assert!(config.validate().is_err());
    }
}
