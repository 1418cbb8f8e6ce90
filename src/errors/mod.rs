/// Error types for the image resolver
///
/// `ProbeError` never leaves the resolver: every probe failure is absorbed
/// into the fallback URL. `ConfigError` is returned to the binary.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Transport error for {url}: {message}")] Transport {
        url: String,
        message: String,
    },

    #[error("HTTP {status} from {url}")] HttpStatus {
        url: String,
        status: u16,
    },

    #[error("Not an image at {url}: content-type {content_type:?}")] NotAnImage {
        url: String,
        content_type: Option<String>,
    },

    #[error("Probe timed out after {timeout_ms}ms")] Timeout {
        timeout_ms: u64,
    },

    #[error("Failed to build HTTP client: {0}")] ClientBuild(String),
}

impl ProbeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Timeout { .. })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {source}", .path.display())] Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", .path.display())] Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")] Invalid(String),
}
