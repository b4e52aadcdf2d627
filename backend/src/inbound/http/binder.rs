//! Catalogue and reconciled binder endpoints.
//!
//! ```text
//! GET /api/v1/catalogue
//! GET /api/v1/binder?q=&view=all|default
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{BinderPage, BinderRequest, BinderScope, CatalogueSnapshot};
use crate::domain::{BinderEntry, BinderSummary, CardReference, StatusSource};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{CardReferenceSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;

/// Parsed catalogue.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueResponse {
    /// Accepted references in file order.
    #[schema(value_type = Vec<CardReferenceSchema>)]
    pub references: Vec<CardReference>,
    /// Rows dropped while parsing.
    pub dropped_lines: usize,
}

impl From<CatalogueSnapshot> for CatalogueResponse {
    fn from(value: CatalogueSnapshot) -> Self {
        Self {
            references: value.references,
            dropped_lines: value.dropped_lines,
        }
    }
}

/// Binder query string.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BinderParams {
    /// Case-insensitive substring over name and number.
    pub q: Option<String>,
    /// `default` hides variant printings; `all` shows every printing.
    #[param(value_type = Option<String>, example = "default")]
    pub view: Option<BinderScope>,
}

impl From<BinderParams> for BinderRequest {
    fn from(value: BinderParams) -> Self {
        Self {
            query: value.q.filter(|query| !query.trim().is_empty()),
            scope: value.view.unwrap_or_default(),
        }
    }
}

/// One catalogue printing with its resolved flags.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BinderEntryResponse {
    /// Encoded identity of the printing.
    #[schema(example = "Jinx|||OGN-001/298")]
    pub key: String,
    /// Card name.
    pub name: String,
    /// Printed number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// In the collection.
    pub owned: bool,
    /// Spare copy held.
    pub duplicate: bool,
    /// Foil copy held.
    pub foil: bool,
    /// `exact`, `name`, or `default`.
    #[schema(example = "exact")]
    pub source: &'static str,
}

fn source_label(source: StatusSource) -> &'static str {
    match source {
        StatusSource::Exact => "exact",
        StatusSource::Name => "name",
        StatusSource::Default => "default",
    }
}

impl From<BinderEntry> for BinderEntryResponse {
    fn from(value: BinderEntry) -> Self {
        Self {
            key: value.key().encode(),
            name: value.reference.name().to_owned(),
            number: value.reference.number().map(str::to_owned),
            owned: value.flags.owned,
            duplicate: value.flags.duplicate,
            foil: value.flags.foil,
            source: source_label(value.source),
        }
    }
}

/// Counts over the returned entries.
#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    /// Entries returned.
    pub total: usize,
    /// Distinct identities among them.
    pub unique: usize,
    /// Entries marked owned.
    pub owned: usize,
    /// Entries marked duplicate.
    pub duplicate: usize,
    /// Entries marked foil.
    pub foil: usize,
}

impl From<BinderSummary> for SummaryResponse {
    fn from(value: BinderSummary) -> Self {
        Self {
            total: value.total,
            unique: value.unique,
            owned: value.owned,
            duplicate: value.duplicate,
            foil: value.foil,
        }
    }
}

/// A page of the binder.
#[derive(Debug, Serialize, ToSchema)]
pub struct BinderResponse {
    /// Matching printings in catalogue order.
    pub entries: Vec<BinderEntryResponse>,
    /// Counts over `entries`.
    pub summary: SummaryResponse,
    /// `true` when statuses could not be read and every entry shows defaults.
    pub degraded: bool,
}

impl From<BinderPage> for BinderResponse {
    fn from(value: BinderPage) -> Self {
        Self {
            entries: value.entries.into_iter().map(BinderEntryResponse::from).collect(),
            summary: SummaryResponse::from(value.summary),
            degraded: value.degraded,
        }
    }
}

/// Fetch the parsed reference catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/catalogue",
    responses(
        (status = 200, description = "Catalogue references", body = CatalogueResponse),
        (status = 503, description = "Catalogue unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["binder"],
    operation_id = "getCatalogue"
)]
#[get("/catalogue")]
pub async fn get_catalogue(state: web::Data<HttpState>) -> ApiResult<web::Json<CatalogueResponse>> {
    let snapshot = state.binder.catalogue().await?;
    Ok(web::Json(CatalogueResponse::from(snapshot)))
}

/// Reconcile the catalogue with stored statuses.
#[utoipa::path(
    get,
    path = "/api/v1/binder",
    params(BinderParams),
    responses(
        (status = 200, description = "Binder page", body = BinderResponse),
        (status = 400, description = "Invalid query string", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["binder"],
    operation_id = "getBinder"
)]
#[get("/binder")]
pub async fn get_binder(
    state: web::Data<HttpState>,
    params: web::Query<BinderParams>,
) -> ApiResult<web::Json<BinderResponse>> {
    let page = state.binder.binder(params.into_inner().into()).await?;
    Ok(web::Json(BinderResponse::from(page)))
}
