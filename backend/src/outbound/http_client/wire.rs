//! Response and request bodies exchanged with the server.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::UpsertStatusRequest;
use crate::domain::{CardKey, CardReference, CollectionStatus, Error, StatusFlags};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CatalogueBody {
    pub references: Vec<CardReference>,
    #[serde(default)]
    pub dropped_lines: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusEntryBody {
    #[serde(flatten)]
    flags: StatusFlags,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl StatusEntryBody {
    pub(super) fn into_status(self, encoded_key: &str) -> Result<CollectionStatus, Error> {
        let key = CardKey::decode(encoded_key).map_err(|error| {
            Error::internal(format!("server returned invalid key {encoded_key:?}: {error}"))
        })?;
        Ok(CollectionStatus {
            key,
            flags: self.flags,
            updated_at: self.updated_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PatchBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    number: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owned: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duplicate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    foil: Option<bool>,
}

impl<'a> From<&'a UpsertStatusRequest> for PatchBody<'a> {
    fn from(value: &'a UpsertStatusRequest) -> Self {
        Self {
            name: value.key.name(),
            number: value.key.number(),
            owned: value.patch.owned,
            duplicate: value.patch.duplicate,
            foil: value.patch.foil,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct UpsertResponseBody {
    ok: bool,
    status: StoredStatusBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredStatusBody {
    key: String,
    #[serde(flatten)]
    flags: StatusFlags,
    updated_at: DateTime<Utc>,
}

impl UpsertResponseBody {
    pub(super) fn into_status(self) -> Result<CollectionStatus, Error> {
        if !self.ok {
            return Err(Error::internal("server reported an unsuccessful write"));
        }
        let StoredStatusBody {
            key,
            flags,
            updated_at,
        } = self.status;
        let entry = StatusEntryBody {
            flags,
            updated_at: Some(updated_at),
        };
        entry.into_status(&key)
    }
}
