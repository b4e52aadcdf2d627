//! Reqwest-backed catalogue source.
//!
//! Fetches the catalogue with a bounded request timeout. Transport details
//! stay here; parsing is left to the domain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use crate::domain::ports::{CatalogueSource, CatalogueSourceError};

const USER_AGENT: &str = concat!("binder/", env!("CARGO_PKG_VERSION"));

/// Default whole-request timeout for catalogue fetches.
pub const DEFAULT_CATALOGUE_TIMEOUT: Duration = Duration::from_secs(10);

/// Catalogue source performing a GET against one URL.
#[derive(Debug, Clone)]
pub struct HttpCatalogueSource {
    client: Client,
    url: Url,
}

impl HttpCatalogueSource {
    /// Build a source with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl CatalogueSource for HttpCatalogueSource {
    async fn load_text(&self) -> Result<String, CatalogueSourceError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "text/tab-separated-values, text/plain")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(map_status_error(status));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        String::from_utf8(body.to_vec())
            .map_err(|error| CatalogueSourceError::decode(error.to_string()))
    }

    fn location(&self) -> String {
        self.url.to_string()
    }
}

fn map_transport_error(error: reqwest::Error) -> CatalogueSourceError {
    if error.is_timeout() {
        CatalogueSourceError::timeout(error.to_string())
    } else {
        CatalogueSourceError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode) -> CatalogueSourceError {
    let message = format!("status {}", status.as_u16());
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            CatalogueSourceError::timeout(message)
        }
        _ => CatalogueSourceError::unavailable(message),
    }
}
