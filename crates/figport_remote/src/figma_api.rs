//! Figma REST client.

use std::path::PathBuf;

use figport_core::figma::{decode_image_response, Format, ImageResponse};

use crate::cache::FileCache;
use crate::settings::RemoteSettings;
use crate::{build_agent, RemoteError, RemoteResult};

const TOKEN_HEADER: &str = "X-Figma-Token";

/// Blocking client for the Figma files and images endpoints.
pub struct FigmaClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl FigmaClient {
    /// Create a client; fails when no token is configured.
    pub fn new(settings: &RemoteSettings) -> RemoteResult<Self> {
        let token = settings.token().ok_or(RemoteError::MissingToken)?;
        Ok(Self {
            agent: build_agent(settings.timeout()),
            base_url: settings.figma_base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn file_url(&self, key: &str) -> String {
        format!("{}/files/{}", self.base_url, urlencoding::encode(key))
    }

    /// Download the raw JSON of a file, percent-unescaped.
    pub fn get_file(&self, key: &str) -> RemoteResult<String> {
        let url = self.file_url(key);
        log::info!("Getting {} from REST API", key);

        let body = self.get(&url)?;
        Ok(urlencoding::decode(&body)?.into_owned())
    }

    /// Download a file into `cache` and return the cached path.
    pub fn fetch_and_cache(&self, key: &str, cache: &FileCache) -> RemoteResult<PathBuf> {
        // Validate before spending a request on it
        cache.path(key)?;
        let body = self.get_file(key)?;
        let path = cache.write(key, &body)?;
        log::info!("File {} retrieved", key);
        Ok(path)
    }

    /// Ask Figma to render `ids` and return the image URLs.
    pub fn get_images(&self, key: &str, ids: &[&str], format: Format, scale: f32) -> RemoteResult<ImageResponse> {
        let url = format!(
            "{}/images/{}?ids={}&format={}&scale={}",
            self.base_url,
            urlencoding::encode(key),
            urlencoding::encode(&ids.join(",")),
            format.as_wire().to_ascii_lowercase(),
            scale
        );
        let body = self.get(&url)?;
        let response = decode_image_response(&body)?;
        if let Some(err) = &response.err {
            log::warn!("Image export for {} reported: {}", key, err);
        }
        Ok(response)
    }

    fn get(&self, url: &str) -> RemoteResult<String> {
        let response = self
            .agent
            .get(url)
            .set(TOKEN_HEADER, &self.token)
            .call()
            .map_err(|e| RemoteError::from_ureq(url, e))?;

        response.into_string().map_err(|e| RemoteError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{closed_url, serve_once};

    fn client(base_url: String) -> FigmaClient {
        FigmaClient::new(&RemoteSettings {
            figma_base_url: base_url,
            figma_token: Some("figd_test".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_missing_token() {
        let settings = RemoteSettings {
            figma_token: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(FigmaClient::new(&settings), Err(RemoteError::MissingToken)));
    }

    #[test]
    fn test_file_url() {
        let client = client("https://api.figma.com/v1/".to_string());
        assert_eq!(client.file_url("abc123"), "https://api.figma.com/v1/files/abc123");
    }

    #[test]
    fn test_get_file_sends_token_and_unescapes() {
        let (url, server) = serve_once("200 OK", "{\"name\":\"Caf%C3%A9 UI\"}");
        let body = client(url).get_file("abc123").unwrap();
        let head = server.join().unwrap();

        assert!(head.starts_with("GET /files/abc123 "));
        assert!(head.to_ascii_lowercase().contains("x-figma-token: figd_test"));
        assert_eq!(body, "{\"name\":\"Café UI\"}");
    }

    #[test]
    fn test_fetch_and_cache_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let (url, server) = serve_once("200 OK", "{\"name\":\"Doc\"}");

        let path = client(url).fetch_and_cache("abc123", &cache).unwrap();
        server.join().unwrap();

        assert_eq!(path, dir.path().join("abc123.json"));
        assert_eq!(cache.read("abc123").unwrap(), "{\"name\":\"Doc\"}");
    }

    #[test]
    fn test_http_error_status() {
        let (url, server) = serve_once("404 Not Found", "{\"status\":404,\"err\":\"Not found\"}");
        let err = client(url).get_file("missing").unwrap_err();
        server.join().unwrap();

        match err {
            RemoteError::Status { status, body, .. } => {
                assert_eq!(status, 404);
                assert!(body.contains("Not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_connection_refused() {
        let err = client(closed_url()).get_file("abc").unwrap_err();
        assert!(matches!(err, RemoteError::Transport { .. }), "got {err}");
    }

    #[test]
    fn test_invalid_key_skips_request() {
        let dir = tempfile::tempdir().unwrap();
        let err = client(closed_url())
            .fetch_and_cache("../abc", &FileCache::new(dir.path()))
            .unwrap_err();
        assert!(matches!(err, RemoteError::InvalidKey(_)));
    }

    #[test]
    fn test_get_images() {
        let (url, server) = serve_once("200 OK", "{\"err\":null,\"images\":{\"1:2\":\"https://cdn/img.png\"}}");
        let response = client(url).get_images("abc", &["1:2"], Format::Png, 2.0).unwrap();
        let head = server.join().unwrap();

        assert!(head.starts_with("GET /images/abc?ids=1%3A2&format=png&scale=2 "));
        assert_eq!(response.images["1:2"].as_deref(), Some("https://cdn/img.png"));
    }
}
