//! Server settings loaded via OrthoConfig.
//!
//! Values merge CLI flags, `BINDER_*` environment variables, and the
//! defaults below. Optional fields keep the raw input; accessors validate
//! and fall back to defaults.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use binder::domain::{SetLimitParseError, VariantFilter};
use binder::outbound::catalogue::DEFAULT_CATALOGUE_TIMEOUT;
use binder::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CATALOGUE_PATH: &str = "liste.txt";

/// Errors raised while validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    /// `catalogue_url` is not an absolute URL.
    #[error("invalid catalogue URL {value:?}: {message}")]
    CatalogueUrl { value: String, message: String },
    /// An entry of `set_limits` is malformed.
    #[error(transparent)]
    SetLimit(#[from] SetLimitParseError),
}

/// Where the catalogue is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueLocation {
    /// A local tab-separated file.
    File(PathBuf),
    /// An HTTP URL.
    Url(Url),
}

/// Configuration for the `binder` server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BINDER")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it store operations answer as unavailable.
    pub database_url: Option<String>,
    /// Catalogue file path.
    pub catalogue_path: Option<PathBuf>,
    /// Catalogue URL; takes precedence over the path.
    pub catalogue_url: Option<String>,
    /// Catalogue fetch timeout in seconds.
    pub catalogue_timeout_secs: Option<u64>,
    /// Characters marking alternate-art numbers.
    pub variant_glyphs: Option<String>,
    /// Comma-separated `PREFIX=COUNT` printed totals.
    pub set_limits: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: Option<u32>,
    /// Pool checkout timeout in seconds.
    pub pool_connection_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|error: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: error.to_string(),
        })
    }

    /// Non-blank database URL, if configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Catalogue location, preferring a configured URL.
    pub fn catalogue_location(&self) -> Result<CatalogueLocation, SettingsError> {
        match self.catalogue_url.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Url::parse(raw)
                .map(CatalogueLocation::Url)
                .map_err(|error| SettingsError::CatalogueUrl {
                    value: raw.to_owned(),
                    message: error.to_string(),
                }),
            _ => Ok(CatalogueLocation::File(
                self.catalogue_path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOGUE_PATH)),
            )),
        }
    }

    /// Catalogue fetch timeout.
    pub fn catalogue_timeout(&self) -> Duration {
        self.catalogue_timeout_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_CATALOGUE_TIMEOUT, Duration::from_secs)
    }

    /// Filter for the default binder view.
    pub fn variant_filter(&self) -> Result<VariantFilter, SettingsError> {
        Ok(VariantFilter::from_config(
            self.variant_glyphs.as_deref(),
            self.set_limits.as_deref(),
        )?)
    }

    /// Pool configuration for `database_url`.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        let mut config = PoolConfig::new(database_url);
        if let Some(max_size) = self.pool_max_size.filter(|size| *size > 0) {
            config = config.with_max_size(max_size);
        }
        if let Some(secs) = self.pool_connection_timeout_secs.filter(|secs| *secs > 0) {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        config
    }
}
