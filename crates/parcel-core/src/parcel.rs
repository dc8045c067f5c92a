//! Parcel entity and lifecycle status
//!
//! Conventional lifecycle:
//! ```text
//! Registered → Sent → Delivered
//! ```
//!
//! The ordering is informational only. Nothing in the persistence layer
//! refuses a status change.

use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Surrogate key assigned by storage on insert
pub type ParcelNumber = i64;

/// Opaque identifier of the client a parcel is shipped for
pub type ClientId = i64;

/// Number carried by a parcel that has not been stored yet
pub const UNASSIGNED: ParcelNumber = 0;

/// The lifecycle stage of a parcel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParcelStatus {
    /// Accepted, not yet handed to the carrier
    Registered,
    /// On its way to the delivery address
    Sent,
    /// Handed over to the recipient
    Delivered,
}

impl ParcelStatus {
    /// All known statuses, in lifecycle order
    pub const ALL: [ParcelStatus; 3] = [
        ParcelStatus::Registered,
        ParcelStatus::Sent,
        ParcelStatus::Delivered,
    ];

    /// The text stored in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelStatus::Registered => "registered",
            ParcelStatus::Sent => "sent",
            ParcelStatus::Delivered => "delivered",
        }
    }

    /// The conventional successor, if any
    pub fn next(&self) -> Option<ParcelStatus> {
        match self {
            ParcelStatus::Registered => Some(ParcelStatus::Sent),
            ParcelStatus::Sent => Some(ParcelStatus::Delivered),
            ParcelStatus::Delivered => None,
        }
    }

    /// Check if the parcel has reached the end of its lifecycle
    pub fn is_terminal(&self) -> bool {
        matches!(self, ParcelStatus::Delivered)
    }
}

impl Default for ParcelStatus {
    fn default() -> Self {
        ParcelStatus::Registered
    }
}

impl std::fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a known status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown parcel status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for ParcelStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(ParcelStatus::Registered),
            "sent" => Ok(ParcelStatus::Sent),
            "delivered" => Ok(ParcelStatus::Delivered),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(feature = "sqlite")]
impl rusqlite::types::ToSql for ParcelStatus {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
    }
}

#[cfg(feature = "sqlite")]
impl rusqlite::types::FromSql for ParcelStatus {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|e: UnknownStatus| rusqlite::types::FromSqlError::Other(Box::new(e)))
    }
}

/// A trackable shipment record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Storage-assigned identity; `UNASSIGNED` until the parcel is added
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    /// Free-form delivery address
    pub address: String,
    /// RFC3339 timestamp, written once at creation
    pub created_at: String,
}

impl Parcel {
    /// Build an unassigned, registered parcel stamped with the current time
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            number: UNASSIGNED,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: now_rfc3339(),
        }
    }

    /// Same fields with the given number, as storage hands it back
    pub fn with_number(mut self, number: ParcelNumber) -> Self {
        self.number = number;
        self
    }

    /// Check if storage has assigned this parcel a number
    pub fn is_assigned(&self) -> bool {
        self.number != UNASSIGNED
    }
}

/// Current UTC time in RFC3339 with second precision, e.g. `2024-01-01T00:00:00Z`
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
