//! Server configuration from environment variables.

use crate::error::{ApiError, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Maximum multipart upload size in bytes.
    pub max_upload_size: usize,
    /// Embedding dimensionality for the built-in hashed embedder.
    pub embedding_dimensions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            embedding_dimensions: 384,
        }
    }
}

impl ServerConfig {
    /// Load settings from `DOCQA_*` environment variables, falling back
    /// to defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a set variable does not parse.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("DOCQA_HOST") {
            config.host = host;
        }
        if let Ok(port) = std::env::var("DOCQA_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ApiError::Validation(format!("Invalid DOCQA_PORT: {port}")))?;
        }
        if let Ok(size) = std::env::var("DOCQA_MAX_UPLOAD_SIZE") {
            config.max_upload_size = size.parse().map_err(|_| {
                ApiError::Validation(format!("Invalid DOCQA_MAX_UPLOAD_SIZE: {size}"))
            })?;
        }
        if let Ok(dims) = std::env::var("DOCQA_EMBEDDING_DIMENSIONS") {
            config.embedding_dimensions = dims.parse().map_err(|_| {
                ApiError::Validation(format!("Invalid DOCQA_EMBEDDING_DIMENSIONS: {dims}"))
            })?;
        }
        Ok(config)
    }

    /// The `host:port` address string.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
