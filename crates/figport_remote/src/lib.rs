//! figport remote - Figma REST access, the local file cache and simulation
//! telemetry.
//!
//! Every request is a single blocking GET: no retries, no backoff and no
//! ordering between calls. Callers decide when to issue them.
//!
//! # Example
//!
//! ```ignore
//! use figport_remote::{FigmaClient, FileCache, RemoteSettings};
//!
//! let settings = RemoteSettings::load("remote.toml")?;
//! let client = FigmaClient::new(&settings)?;
//! let path = client.fetch_and_cache("abc123", &FileCache::new(&settings.cache_dir))?;
//! ```

mod cache;
mod figma_api;
mod settings;
mod telemetry;

use thiserror::Error;

pub use cache::FileCache;
pub use figma_api::FigmaClient;
pub use settings::RemoteSettings;
pub use telemetry::{TelemetryClient, TelemetryOutcome};

/// Errors from remote calls and the file cache.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Figma token missing (set figma_token or FIGMA_TOKEN)")]
    MissingToken,

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Response is not valid UTF-8 after unescaping: {0}")]
    Unescape(#[from] std::string::FromUtf8Error),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] figport_core::SchemaError),

    #[error("Invalid file key: {0:?}")]
    InvalidKey(String),
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

impl RemoteError {
    fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        RemoteError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    fn from_ureq(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => RemoteError::Status {
                url: url.to_string(),
                status,
                body: response.into_string().unwrap_or_default(),
            },
            ureq::Error::Transport(transport) => RemoteError::Transport {
                url: url.to_string(),
                message: transport.to_string(),
            },
        }
    }
}

/// Blocking agent shared by the clients.
fn build_agent(timeout: Option<std::time::Duration>) -> ureq::Agent {
    let builder = ureq::AgentBuilder::new();
    match timeout {
        Some(timeout) => builder.timeout(timeout).build(),
        None => builder.build(),
    }
}
