use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::prediction::input::GenderPolicy;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_INFERENCE_URL: &str = "http://localhost:8000/predict";
pub const DEFAULT_INFERENCE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_INFERENCE_CONNECT_TIMEOUT_MS: u64 = 2_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("YAML parsing failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid inference URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Optional YAML file layered under the environment.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub inference_url: Option<String>,
    pub inference_timeout_ms: Option<u64>,
    pub inference_connect_timeout_ms: Option<u64>,
    pub gender_policy: Option<String>,
    pub static_dir: Option<String>,
}

impl FileConfig {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn read(path: &str) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_yaml(&source)
    }
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub url: Url,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub inference: InferenceConfig,
    pub gender_policy: GenderPolicy,
    pub static_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `CONFIG_FILE` (if set) and lets the process environment override it.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var("CONFIG_FILE") {
            Ok(path) => {
                log::info!("Loading configuration from {}", path);
                FileConfig::read(&path)?
            }
            Err(_) => FileConfig::default(),
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = env("HOST")
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match env("PORT") {
            Some(value) => parse_value("PORT", &value)?,
            None => file.port.unwrap_or(DEFAULT_PORT),
        };

        let raw_url = env("INFERENCE_URL")
            .or(file.inference_url)
            .unwrap_or_else(|| DEFAULT_INFERENCE_URL.to_string());
        let url = Url::parse(&raw_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                key: "INFERENCE_URL",
                value: raw_url,
            });
        }

        let timeout_ms = match env("INFERENCE_TIMEOUT_MS") {
            Some(value) => parse_value("INFERENCE_TIMEOUT_MS", &value)?,
            None => file
                .inference_timeout_ms
                .unwrap_or(DEFAULT_INFERENCE_TIMEOUT_MS),
        };
        let connect_timeout_ms = match env("INFERENCE_CONNECT_TIMEOUT_MS") {
            Some(value) => parse_value("INFERENCE_CONNECT_TIMEOUT_MS", &value)?,
            None => file
                .inference_connect_timeout_ms
                .unwrap_or(DEFAULT_INFERENCE_CONNECT_TIMEOUT_MS),
        };
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "INFERENCE_TIMEOUT_MS",
                value: timeout_ms.to_string(),
            });
        }

        let gender_policy = match env("GENDER_POLICY").or(file.gender_policy) {
            Some(value) => parse_value("GENDER_POLICY", &value)?,
            None => GenderPolicy::default(),
        };

        let static_dir = env("STATIC_DIR")
            .or(file.static_dir)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            host,
            port,
            inference: InferenceConfig {
                url,
                timeout: Duration::from_millis(timeout_ms),
                connect_timeout: Duration::from_millis(connect_timeout_ms),
            },
            gender_policy,
            static_dir,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
