//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod binder;
pub mod collection;
pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub(crate) mod validation;

pub use error::{ApiResult, json_error_handler, query_error_handler};
pub use state::{HttpState, HttpStatePorts};
