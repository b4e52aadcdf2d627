//! Domain primitives, services, and ports.
//!
//! Purpose: define the card identity, catalogue, status, and reconciliation
//! types shared by the HTTP adapter, the persistence adapters, and the CLI.
//! Types here stay free of transport and storage concerns; serialisation
//! contracts are documented on each type.
//!
//! Public surface:
//! - [`CardKey`]: versioned card identity (name-level or printing-level).
//! - [`parse_catalogue`]: best-effort parser for the tab-separated catalogue.
//! - [`VariantFilter`]: display-level allow-list for the default view.
//! - [`StatusMap`] and [`BinderView`]: status lookup and reconciliation.
//! - Services implementing the driving ports in [`ports`].

pub mod ports;

mod admin_service;
mod binder;
mod binder_service;
mod binder_session;
mod card_key;
mod catalogue;
mod catalogue_service;
mod collection_service;
mod collection_status;
pub mod error;
mod trace_id;
mod variant_filter;

pub use self::admin_service::{COLLECTION_TABLE, CollectionAdminService, EXPECTED_COLUMNS};
pub use self::binder::{BinderEntry, BinderSummary, BinderView, OptimisticUpdate};
pub use self::binder_service::BinderService;
pub use self::binder_session::BinderSession;
pub use self::card_key::{
    CardKey, CardKeyValidationError, CardName, CardNumber, KEY_DELIMITER, KeyScheme,
};
pub use self::catalogue::{
    CardReference, CatalogueParse, DropReason, DroppedLine, parse_catalogue,
};
pub use self::catalogue_service::CatalogueService;
pub use self::collection_service::CollectionService;
pub use self::collection_status::{
    CollectionStatus, StatusFlags, StatusMap, StatusPatch, StatusSource,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::variant_filter::{
    DEFAULT_SET_LIMITS, DEFAULT_VARIANT_GLYPH, NumberParts, SetLimit, SetLimitParseError,
    VariantClass, VariantFilter,
};
