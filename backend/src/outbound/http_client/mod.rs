//! Reqwest client for a running binder server.
//!
//! Implements the driving ports over HTTP so the CLI can reuse the domain
//! view-model (`BinderView`, `BinderSession`) against a remote store. Error
//! envelopes returned by the server decode back into domain [`Error`]s,
//! keeping codes and trace identifiers intact.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::ports::{
    CatalogueSnapshot, CollectionAdmin, CollectionCommand, CollectionQuery, PingReport,
    SyncReport, UpsertStatusRequest, VerifyReport,
};
use crate::domain::{CollectionStatus, Error, StatusMap};

use self::wire::{CatalogueBody, PatchBody, StatusEntryBody, UpsertResponseBody};

/// Default whole-request timeout for CLI calls.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the `/api/v1` surface.
#[derive(Debug, Clone)]
pub struct BinderHttpClient {
    client: Client,
    base: Url,
}

impl BinderHttpClient {
    /// Build a client rooted at `base`, such as `http://localhost:8080/`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(mut base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("binder-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base })
    }

    /// Server root the client talks to.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base
            .join(&format!("api/v1/{path}"))
            .map_err(|error| Error::internal(format!("invalid endpoint {path}: {error}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        Ok(self.client.request(method, self.endpoint(path)?))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let response = request.send().await.map_err(map_transport_error)?;
        decode_response(response).await
    }

    /// Fetch the parsed catalogue.
    ///
    /// # Errors
    ///
    /// Returns the server's error, or `service_unavailable` when it cannot be
    /// reached.
    pub async fn fetch_catalogue(&self) -> Result<CatalogueSnapshot, Error> {
        let body: CatalogueBody = self.send(self.request(Method::GET, "catalogue")?).await?;
        Ok(CatalogueSnapshot {
            references: body.references,
            dropped_lines: body.dropped_lines,
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> Error {
    debug!(%error, "binder request failed");
    if error.is_timeout() {
        Error::service_unavailable(format!("binder server timed out: {error}"))
    } else if error.is_decode() {
        Error::internal(format!("unreadable binder response: {error}"))
    } else {
        Error::service_unavailable(format!("binder server unreachable: {error}"))
    }
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(map_transport_error);
    }
    let body = response.bytes().await.map_err(map_transport_error)?;
    Err(decode_error_body(status, &body))
}

/// Recover the domain error from an error envelope, falling back to a
/// status-derived error when the body is not one.
fn decode_error_body(status: StatusCode, body: &[u8]) -> Error {
    if let Ok(error) = serde_json::from_slice::<Error>(body) {
        return error;
    }
    let message = format!("binder server answered {}", status.as_u16());
    match status {
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            Error::service_unavailable(message)
        }
        StatusCode::NOT_FOUND => Error::not_found(message),
        _ if status.is_client_error() => Error::invalid_request(message),
        _ => Error::internal(message),
    }
}

#[async_trait]
impl CollectionQuery for BinderHttpClient {
    async fn status_map(&self) -> Result<StatusMap, Error> {
        let body: std::collections::BTreeMap<String, StatusEntryBody> =
            self.send(self.request(Method::GET, "collection")?).await?;
        let statuses = body
            .into_iter()
            .map(|(key, entry)| entry.into_status(&key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StatusMap::from_statuses(statuses))
    }
}

#[async_trait]
impl CollectionCommand for BinderHttpClient {
    async fn upsert_status(
        &self,
        request: UpsertStatusRequest,
    ) -> Result<CollectionStatus, Error> {
        let body = PatchBody::from(&request);
        let response: UpsertResponseBody = self
            .send(self.request(Method::PATCH, "collection")?.json(&body))
            .await?;
        response.into_status()
    }
}

#[async_trait]
impl CollectionAdmin for BinderHttpClient {
    async fn sync(&self) -> Result<SyncReport, Error> {
        self.send(self.request(Method::POST, "admin/sync")?).await
    }

    async fn verify(&self) -> Result<VerifyReport, Error> {
        self.send(self.request(Method::GET, "admin/verify")?).await
    }

    async fn ping(&self) -> Result<PingReport, Error> {
        self.send(self.request(Method::GET, "admin/ping")?).await
    }
}
