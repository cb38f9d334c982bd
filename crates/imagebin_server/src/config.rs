//! Server configuration.
//!
//! Values are layered, later sources winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`imagebin.toml` in the working directory, or an explicit path)
//! 3. Environment variables prefixed with `IMAGEBIN_`, e.g. `IMAGEBIN_PORT`,
//!    `IMAGEBIN_API_KEY`, `IMAGEBIN_ORIGINS=https://a.com,https://b.com`

use config::{Config, Environment, File};
use derive_getters::Getters;
use imagebin_error::{ConfigError, ImagebinResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration for the image server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    #[builder(default = "default_host()")]
    host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    #[builder(default = "default_port()")]
    port: u16,

    /// Origins allowed to reach protected endpoints
    #[serde(default = "default_origins")]
    #[builder(default = "default_origins()")]
    origins: Vec<String>,

    /// PostgreSQL connection string
    #[serde(default)]
    #[builder(setter(into, strip_option), default)]
    database_url: Option<String>,

    /// Shared secret required for upload and delete
    #[serde(default)]
    api_key: String,

    /// Header carrying the API key
    #[serde(default = "default_api_key_header")]
    #[builder(default = "default_api_key_header()")]
    api_key_header: String,

    /// Directory holding uploaded files
    #[serde(default = "default_upload_dir")]
    #[builder(default = "default_upload_dir()")]
    upload_dir: PathBuf,

    /// Largest accepted request body in bytes
    #[serde(default = "default_max_upload_bytes")]
    #[builder(default = "default_max_upload_bytes()")]
    max_upload_bytes: usize,

    /// Log filter used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    #[builder(default = "default_log_level()")]
    log_level: String,

    /// Emit JSON-formatted logs
    #[serde(default)]
    #[builder(default)]
    json_logs: bool,
}

impl ServerConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.api_key.as_ref().is_some_and(|k| k.trim().is_empty()) {
            return Err("api_key must be set".to_string());
        }
        if self
            .api_key_header
            .as_ref()
            .is_some_and(|h| h.trim().is_empty())
        {
            return Err("api_key_header must not be empty".to_string());
        }
        if self.max_upload_bytes == Some(0) {
            return Err("max_upload_bytes must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_api_key_header() -> String {
    "x-api-key".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./upload")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ServerConfig {
    /// Load configuration from defaults, an optional TOML file and the environment.
    ///
    /// When `path` is `None`, `imagebin.toml` is read if present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a source cannot be parsed or the
    /// result fails validation.
    pub fn load(path: Option<&Path>) -> ImagebinResult<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("imagebin").required(false),
        };

        let config: ServerConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("IMAGEBIN")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("origins"),
            )
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ConfigError::new(format!("Failed to load config: {}", e)))?;

        config.validated()
    }

    /// Normalise and check the configuration.
    ///
    /// Blank origins are dropped and surrounding whitespace trimmed.
    pub fn validated(mut self) -> ImagebinResult<Self> {
        self.origins = self
            .origins
            .iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        if self.api_key.trim().is_empty() {
            Err(ConfigError::new("api_key must be set"))?
        }
        if self.api_key_header.trim().is_empty() {
            Err(ConfigError::new("api_key_header must not be empty"))?
        }
        if self.max_upload_bytes == 0 {
            Err(ConfigError::new("max_upload_bytes must be greater than zero"))?
        }

        Ok(self)
    }

    /// Override the listen port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Whether `origin` is on the allow-list (exact match).
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }
}
