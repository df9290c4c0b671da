use std::time::Duration;

use async_trait::async_trait;
use records_common::Page;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("relative cursor {0:?} but no base URL configured")]
    RelativeCursor(String),
}

/// Anything that can produce a page of records for a cursor.
///
/// The cursor is opaque to callers: it is whatever the previous page returned
/// as `nextPage` (or the configured first page).
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, cursor: &str) -> Result<Page, ApiError>;
}

/// HTTP page source. Follows `nextPage` URLs as returned by the server.
pub struct RecordsClient {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl RecordsClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            http,
        })
    }

    /// Turn a cursor into an absolute URL.
    fn resolve(&self, cursor: &str) -> Result<String, ApiError> {
        if cursor.starts_with("http://") || cursor.starts_with("https://") {
            return Ok(cursor.to_string());
        }
        match &self.base_url {
            Some(base) if cursor.starts_with('/') => Ok(format!("{}{}", base, cursor)),
            Some(base) => Ok(format!("{}/{}", base, cursor)),
            None => Err(ApiError::RelativeCursor(cursor.to_string())),
        }
    }
}

#[async_trait]
impl PageSource for RecordsClient {
    async fn fetch_page(&self, cursor: &str) -> Result<Page, ApiError> {
        let url = self.resolve(cursor)?;
        debug!("fetching page {}", url);
        let resp = self.http.get(&url).send().await?.error_for_status()?;
        let page: Page = resp.json().await?;
        Ok(page)
    }
}
