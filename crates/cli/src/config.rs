use directories::ProjectDirs;
use eyre::Result;
use serde::{Deserialize, Serialize};
use shelf_repo::ApiConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: get_default_data_dir()
                .join("repos")
                .to_string_lossy()
                .to_string(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let api = ApiConfig::default();
        Self {
            timeout_secs: api.timeout.as_secs(),
            user_agent: api.user_agent,
        }
    }
}

impl NetworkConfig {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        get_default_config_dir().join("config.json")
    }

    /// Load the configuration at `path`, writing defaults there if it is missing.
    pub async fn load(path: &Path) -> Result<Self> {
        if !fs::try_exists(path).await? {
            let default_config = Self::default();
            default_config.save(path).await?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["storage", "path"] => {
                self.storage.path = value.to_string();
            }
            ["network", "timeout_secs"] => {
                self.network.timeout_secs = value
                    .parse::<u64>()
                    .map_err(|_| eyre::eyre!("Invalid number of seconds: {}", value))?;
            }
            ["network", "user_agent"] => {
                self.network.user_agent = value.to_string();
            }
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<String> {
        let parts: Vec<&str> = key.split('.').collect();

        let value = match parts.as_slice() {
            ["storage", "path"] => self.storage.path.clone(),
            ["network", "timeout_secs"] => self.network.timeout_secs.to_string(),
            ["network", "user_agent"] => self.network.user_agent.clone(),
            _ => {
                return Err(eyre::eyre!("Unknown configuration key: {}", key));
            }
        };

        Ok(value)
    }

    pub fn show_all(&self) -> String {
        format!(
            "Configuration:\n\
             Storage:\n\
             └─ path: {}\n\
             Network:\n\
             ├─ timeout_secs: {}\n\
             └─ user_agent: {}",
            self.storage.path, self.network.timeout_secs, self.network.user_agent,
        )
    }
}

fn get_default_config_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "shelf", "shelf") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        // Fallback to current directory if we can't determine project dirs
        PathBuf::from(".shelf").join("config")
    }
}

fn get_default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("org", "shelf", "shelf") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        PathBuf::from(".shelf").join("data")
    }
}
