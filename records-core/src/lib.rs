//! Catalog services: page API client, configuration, search debouncing and
//! the session controller a view layer drives.

pub mod api;
pub mod config;
pub mod debounce;
pub mod session;

pub use api::{ApiError, PageSource, RecordsClient};
pub use config::{Config, ConfigError};
pub use session::{CatalogSession, CatalogSnapshot, LoadOutcome, SessionError};

/// Session wired to the HTTP page API as described by `config`.
pub fn connect(config: &Config) -> Result<CatalogSession<RecordsClient>, ApiError> {
    let client = RecordsClient::new(config.base_url.clone(), config.request_timeout())?;
    Ok(CatalogSession::new(
        client,
        config.first_page_url.clone(),
        config.search_debounce(),
    ))
}
