//! Favicon fetching with an on-disk cache

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Well-known icon paths, least preferred first.
const ICON_CANDIDATES: &[&str] = &["favicon.ico", "apple-touch-icon.png"];

/// One loaded icon candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub url: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum FaviconError {
    #[error("url has no host: {0}")]
    NoHost(String),
    #[error("no icons found for {0}")]
    NotFound(String),
}

#[async_trait]
pub trait FaviconService: Send + Sync {
    /// Icon candidates for a site, in ascending order of preference.
    async fn fetch_icons(&self, url: &Url) -> Result<Vec<Icon>, FaviconError>;
}

pub struct HttpFaviconService {
    client: reqwest::Client,
    cache_dir: PathBuf,
}

impl HttpFaviconService {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_dir: cache_dir.join("favicons"),
        }
    }

    async fn fetch_candidate(&self, origin: &str, host: &str, n: usize, path: &str) -> Option<Icon> {
        let url = format!("{}/{}", origin, path);
        let cache_path = self.cache_dir.join(format!("{}-{}", cache_name(host), n));

        if let Ok(data) = tokio::fs::read(&cache_path).await {
            return Some(Icon { url, data });
        }

        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                debug!(url = %url, status = %response.status(), "Icon candidate missing");
                return None;
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Icon request failed");
                return None;
            }
        };

        let data = response.bytes().await.ok()?.to_vec();
        if data.is_empty() {
            return None;
        }

        tokio::fs::create_dir_all(&self.cache_dir).await.ok();
        tokio::fs::write(&cache_path, &data).await.ok();
        Some(Icon { url, data })
    }
}

fn cache_name(host: &str) -> String {
    host.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

#[async_trait]
impl FaviconService for HttpFaviconService {
    async fn fetch_icons(&self, url: &Url) -> Result<Vec<Icon>, FaviconError> {
        let host = url
            .host_str()
            .ok_or_else(|| FaviconError::NoHost(url.to_string()))?;
        let origin = url.origin().ascii_serialization();

        let fetches = ICON_CANDIDATES
            .iter()
            .enumerate()
            .map(|(n, path)| self.fetch_candidate(&origin, host, n, path));
        let icons: Vec<Icon> = futures::future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect();

        if icons.is_empty() {
            return Err(FaviconError::NotFound(host.to_string()));
        }
        Ok(icons)
    }
}
