use anyhow::Result;
use std::path::PathBuf;

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("REVIEWSYNC_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("reviewsync");

        Ok(Self::from_base(base_dir))
    }

    pub fn from_docker_env() -> Self {
        Self::from_base(container_base_path())
    }

    /// Config files at the base, data and logs in subdirectories
    pub fn from_base(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    /// Default location of the review store
    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join("reviews.json")
    }

    /// Default location of the canonical seed dataset
    pub fn dataset_file(&self) -> PathBuf {
        self.data_dir.join("mock_reviews.json")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("reviewsync.log")
    }

}

impl Default for PathManager {
    fn default() -> Self {
        // The container image creates the base directory, so its presence indicates Docker
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_under_base() {
        let paths = PathManager::from_base(PathBuf::from("/srv/reviews"));
        assert_eq!(paths.config_file(), PathBuf::from("/srv/reviews/config.toml"));
        assert_eq!(paths.store_file(), PathBuf::from("/srv/reviews/data/reviews.json"));
        assert_eq!(paths.dataset_file(), PathBuf::from("/srv/reviews/data/mock_reviews.json"));
        assert_eq!(paths.log_file(), PathBuf::from("/srv/reviews/logs/reviewsync.log"));
    }
}
