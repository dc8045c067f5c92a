//! Shared fixtures for parcel store integration tests

use parcel_core::{ClientId, Parcel, ParcelStatus, ParcelStore};

/// A registered parcel for client 1000, as the scenario tests expect
pub fn test_parcel() -> Parcel {
    Parcel {
        number: 0,
        client: 1000,
        status: ParcelStatus::Registered,
        address: "test".to_string(),
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

/// A parcel for the given client with a fresh creation time
pub fn parcel_for(client: ClientId) -> Parcel {
    Parcel::new(client, "test")
}

/// Compare every field except the number
pub fn assert_same_fields(expected: &Parcel, actual: &Parcel) {
    assert_eq!(
        expected.client, actual.client,
        "wrong client for number={}",
        actual.number
    );
    assert_eq!(
        expected.status, actual.status,
        "wrong status for number={}",
        actual.number
    );
    assert_eq!(
        expected.address, actual.address,
        "wrong address for number={}",
        actual.number
    );
    assert_eq!(
        expected.created_at, actual.created_at,
        "wrong created_at for number={}",
        actual.number
    );
}

/// Add a parcel and check storage assigned it a number
pub fn add_parcel(store: &dyn ParcelStore, parcel: &Parcel) -> i64 {
    let number = store.add(parcel).expect("failed to add parcel");
    assert_ne!(number, 0, "added parcel has no number");
    number
}
