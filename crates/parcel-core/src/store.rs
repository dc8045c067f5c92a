use crate::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};

/// The trait that all parcel storage backends implement.
///
/// Every method maps to a single statement against the backing table. Update
/// and delete methods do not report whether a row matched; call [`get`] to
/// confirm existence.
///
/// [`get`]: ParcelStore::get
pub trait ParcelStore: Send + Sync {
    /// Insert a parcel. Returns the number assigned by storage; the caller's
    /// `number` field is ignored.
    fn add(&self, parcel: &Parcel) -> Result<ParcelNumber, StoreError>;

    /// Get a parcel by number. Fails with [`StoreError::NotFound`] if absent.
    fn get(&self, number: ParcelNumber) -> Result<Parcel, StoreError>;

    /// All parcels for a client, in no particular order.
    fn get_by_client(&self, client: ClientId) -> Result<Vec<Parcel>, StoreError>;

    /// Overwrite the delivery address only.
    fn set_address(&self, number: ParcelNumber, address: &str) -> Result<(), StoreError>;

    /// Overwrite the status only. No transition rules are applied.
    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> Result<(), StoreError>;

    /// Delete a parcel by number.
    fn delete(&self, number: ParcelNumber) -> Result<(), StoreError>;
}

/// Errors from the parcel store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Parcel not found: {0}")]
    NotFound(ParcelNumber),

    #[error("Invalid status in storage: {0}")]
    InvalidStatus(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Check if the error means the parcel does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Check if the error is a backend failure rather than a missing parcel
    pub fn is_storage(&self) -> bool {
        !self.is_not_found()
    }
}
