use super::http::DEFAULT_API_BASE_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "primera-pagina";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Content of the static "Mensaje" view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub name: String,
    pub id: u32,
    pub image_url: Option<String>,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            name: "Julian Florez Meyer".to_string(),
            id: 132,
            image_url: Some(
                "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcTcR8uJdMfMvOeZMYrTdPlwXYumnmYEZhYBeg&s"
                    .to_string(),
            ),
        }
    }
}

/// Application settings. Every field has a default so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub storage_path: PathBuf,
    pub request_timeout_secs: Option<u64>,
    pub message: MessageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            storage_path: data_dir().join("storage.json"),
            request_timeout_secs: None,
            message: MessageConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.json")
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// The log file lives next to the storage file.
    pub fn log_path(&self) -> PathBuf {
        self.storage_path
            .parent()
            .map(|dir| dir.join("primera-pagina.log"))
            .unwrap_or_else(|| PathBuf::from("primera-pagina.log"))
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}
