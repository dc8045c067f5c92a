//! Parcel Core - persistence for tracked shipments
//!
//! - **Parcel**: the shipment record (client, status, address, creation time)
//! - **Store**: the [`ParcelStore`] trait and its error type
//! - **SQLite**: [`SqliteParcelStore`], one parameterized statement per operation
//! - **Memory**: [`MemoryParcelStore`], same contract without a database
//! - **Config**: settings for opening a store from a file
//!
//! The store is a pure data-access layer. Status changes are written as given;
//! any workflow rules belong to the caller.

pub mod config;
pub mod memory_store;
pub mod parcel;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub use config::{ConfigError, StoreConfig};
pub use memory_store::MemoryParcelStore;
pub use parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus, UnknownStatus, UNASSIGNED};
pub use store::{ParcelStore, StoreError};

#[cfg(feature = "sqlite")]
pub use schema::Schema;
#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteParcelStore;
