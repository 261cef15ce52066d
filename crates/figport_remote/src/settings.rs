//! Remote endpoint configuration.
//!
//! ```toml
//! figma_base_url = "https://api.figma.com/v1"
//! cache_dir = "FigmaFiles"
//! telemetry_base_uri = "http://localhost:8080/api"
//! timeout_secs = 30
//! ```
//!
//! The Figma token is read from `figma_token` or, when absent, from the
//! `FIGMA_TOKEN` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::{RemoteError, RemoteResult};

pub const FIGMA_TOKEN_ENV: &str = "FIGMA_TOKEN";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub figma_base_url: String,

    pub figma_token: Option<String>,

    /// Directory holding `<key>.json` downloads
    pub cache_dir: PathBuf,

    pub telemetry_base_uri: String,

    /// Request timeout; unset means wait indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            figma_base_url: "https://api.figma.com/v1".to_string(),
            figma_token: None,
            cache_dir: PathBuf::from("FigmaFiles"),
            telemetry_base_uri: "http://ec2-3-137-219-57.us-east-2.compute.amazonaws.com:8080/api"
                .to_string(),
            timeout_secs: None,
        }
    }
}

impl RemoteSettings {
    pub fn from_toml_str(content: &str) -> RemoteResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> RemoteResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RemoteError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Configured token, falling back to the environment.
    pub fn token(&self) -> Option<String> {
        self.figma_token
            .clone()
            .or_else(|| std::env::var(FIGMA_TOKEN_ENV).ok())
            .filter(|t| !t.is_empty())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
