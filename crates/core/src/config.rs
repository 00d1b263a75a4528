//! Runtime configuration, read from TOML.
//!
//! Every section has defaults, so an empty file (or no file) is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "YTSCRIPT_CONFIG";

pub const DEFAULT_LANG: &str = "en";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language requested when the caller does not name one.
    pub lang: String,
    pub http: HttpConfig,
    pub endpoints: EndpointConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANG.to_string(),
            http: HttpConfig::default(),
            endpoints: EndpointConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Base URLs of the platform endpoints the strategies talk to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub watch_url: String,
    pub timedtext_url: String,
    pub innertube_url: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            watch_url: "https://www.youtube.com/watch".to_string(),
            timedtext_url: "https://www.youtube.com/api/timedtext".to_string(),
            innertube_url: "https://www.youtube.com/youtubei/v1/player?prettyPrint=false"
                .to_string(),
        }
    }
}

impl EndpointConfig {
    /// Point every endpoint at one base URL. Used against mock servers.
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            watch_url: format!("{base}/watch"),
            timedtext_url: format!("{base}/api/timedtext"),
            innertube_url: format!("{base}/youtubei/v1/player?prettyPrint=false"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration.
    ///
    /// Lookup order: `explicit`, then `$YTSCRIPT_CONFIG`, then
    /// `<config dir>/ytscript/config.toml`. The first two must exist; the
    /// default location is skipped when absent. No file at all means defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

        let path = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => path,
            None => match default_path().filter(|p| p.is_file()) {
                Some(path) => path,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        Self::load_file(&path)
    }

    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml(&text, path)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ytscript").join("config.toml"))
}
