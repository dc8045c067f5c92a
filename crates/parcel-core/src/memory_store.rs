//! In-memory parcel store.
//!
//! Follows the same contract as the SQLite store: numbers start at 1, are
//! never reused, and updates on a missing number are silent.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::store::{ParcelStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    parcels: BTreeMap<ParcelNumber, Parcel>,
    last_number: ParcelNumber,
}

/// Parcel store kept entirely in process memory
#[derive(Debug, Default)]
pub struct MemoryParcelStore {
    inner: RwLock<Inner>,
}

impl MemoryParcelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored parcels
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.parcels.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }
}

impl ParcelStore for MemoryParcelStore {
    fn add(&self, parcel: &Parcel) -> Result<ParcelNumber, StoreError> {
        let mut inner = self.write()?;
        inner.last_number += 1;
        let number = inner.last_number;
        inner
            .parcels
            .insert(number, parcel.clone().with_number(number));

        tracing::debug!(number, client = parcel.client, "parcel added");
        Ok(number)
    }

    fn get(&self, number: ParcelNumber) -> Result<Parcel, StoreError> {
        self.read()?
            .parcels
            .get(&number)
            .cloned()
            .ok_or(StoreError::NotFound(number))
    }

    fn get_by_client(&self, client: ClientId) -> Result<Vec<Parcel>, StoreError> {
        let parcels: Vec<Parcel> = self
            .read()?
            .parcels
            .values()
            .filter(|p| p.client == client)
            .cloned()
            .collect();

        tracing::debug!(client, count = parcels.len(), "parcels fetched by client");
        Ok(parcels)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> Result<(), StoreError> {
        if let Some(parcel) = self.write()?.parcels.get_mut(&number) {
            parcel.address = address.to_string();
        }
        Ok(())
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> Result<(), StoreError> {
        if let Some(parcel) = self.write()?.parcels.get_mut(&number) {
            parcel.status = status;
        }
        Ok(())
    }

    fn delete(&self, number: ParcelNumber) -> Result<(), StoreError> {
        let removed = self.write()?.parcels.remove(&number).is_some();
        tracing::debug!(number, removed, "parcel deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_start_at_one_and_grow() {
        let store = MemoryParcelStore::new();
        let a = store.add(&Parcel::new(1, "a")).unwrap();
        let b = store.add(&Parcel::new(1, "b")).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[test]
    fn delete_does_not_free_number() {
        let store = MemoryParcelStore::new();
        let a = store.add(&Parcel::new(1, "a")).unwrap();
        store.delete(a).unwrap();
        assert!(store.is_empty().unwrap());
        let b = store.add(&Parcel::new(1, "b")).unwrap();
        assert!(b > a);
    }

    #[test]
    fn stored_copy_is_independent_of_caller() {
        let store = MemoryParcelStore::new();
        let mut parcel = Parcel::new(5, "original");
        let number = store.add(&parcel).unwrap();
        parcel.address = "mutated after add".into();
        assert_eq!(store.get(number).unwrap().address, "original");
    }
}
