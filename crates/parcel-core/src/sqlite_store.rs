use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use crate::config::StoreConfig;
use crate::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus, UnknownStatus};
use crate::schema::Schema;
use crate::store::{ParcelStore, StoreError};

const SELECT_COLUMNS: &str = "SELECT number, client, status, address, created_at FROM parcel";

/// SQLite-backed implementation of the ParcelStore trait.
///
/// The connection is owned by the store and shared by every operation through
/// a mutex, since `rusqlite::Connection` is not `Sync`.
pub struct SqliteParcelStore {
    conn: Mutex<Connection>,
}

impl SqliteParcelStore {
    /// Wrap a caller-supplied connection. The `parcel` table must already exist.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (or create) a database at the given path and ensure the table exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn =
            Connection::open(path).map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        Self::init_with_connection(conn)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::Storage(format!("open_in_memory: {}", e)))?;
        Self::init_with_connection(conn)
    }

    /// Open the database described by `config`.
    pub fn open_with_config(config: &StoreConfig) -> Result<Self, StoreError> {
        config
            .validate()
            .map_err(|e| StoreError::Storage(format!("config: {}", e)))?;

        let conn = Connection::open(&config.database)
            .map_err(|e| StoreError::Storage(format!("open: {}", e)))?;
        conn.busy_timeout(config.busy_timeout())
            .map_err(|e| StoreError::Storage(format!("busy_timeout: {}", e)))?;

        if config.journal_wal {
            let mode: String = conn
                .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                .map_err(|e| StoreError::Storage(format!("journal_mode: {}", e)))?;
            tracing::debug!(mode = %mode, "journal mode set");
        }

        if config.create_schema {
            Schema::apply(&conn).map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))?;
        }

        tracing::debug!(path = %config.database.display(), "opened parcel store");
        Ok(Self::new(conn))
    }

    fn init_with_connection(conn: Connection) -> Result<Self, StoreError> {
        Schema::apply(&conn).map_err(|e| StoreError::Storage(format!("init_schema: {}", e)))?;
        Ok(Self::new(conn))
    }

    /// Give the connection back to the caller.
    pub fn into_inner(self) -> Result<Connection, StoreError> {
        self.conn
            .into_inner()
            .map_err(|e| StoreError::Storage(e.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|e| StoreError::Storage(e.to_string()))
    }

    /// Read a parcel from a row selected with `SELECT_COLUMNS`.
    fn row_to_parcel(row: &rusqlite::Row<'_>) -> rusqlite::Result<Parcel> {
        Ok(Parcel {
            number: row.get(0)?,
            client: row.get(1)?,
            status: row.get(2)?,
            address: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

/// Map a driver error to a store error, keeping undecodable statuses distinct.
fn storage_error(context: &str, err: rusqlite::Error) -> StoreError {
    if let rusqlite::Error::FromSqlConversionFailure(_, _, ref source) = err {
        if let Some(UnknownStatus(text)) = source.downcast_ref::<UnknownStatus>() {
            return StoreError::InvalidStatus(text.clone());
        }
    }
    StoreError::Storage(format!("{}: {}", context, err))
}

impl ParcelStore for SqliteParcelStore {
    fn add(&self, parcel: &Parcel) -> Result<ParcelNumber, StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO parcel (client, status, address, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![parcel.client, parcel.status, parcel.address, parcel.created_at],
        )
        .map_err(|e| storage_error("insert", e))?;

        let number = conn.last_insert_rowid();
        tracing::debug!(number, client = parcel.client, "parcel added");
        Ok(number)
    }

    fn get(&self, number: ParcelNumber) -> Result<Parcel, StoreError> {
        let conn = self.lock()?;
        let sql = format!("{} WHERE number = ?1", SELECT_COLUMNS);
        let parcel = conn
            .query_row(&sql, params![number], Self::row_to_parcel)
            .optional()
            .map_err(|e| storage_error("get", e))?;

        parcel.ok_or(StoreError::NotFound(number))
    }

    fn get_by_client(&self, client: ClientId) -> Result<Vec<Parcel>, StoreError> {
        let conn = self.lock()?;
        let sql = format!("{} WHERE client = ?1", SELECT_COLUMNS);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| storage_error("prepare get_by_client", e))?;

        let parcels = stmt
            .query_map(params![client], Self::row_to_parcel)
            .map_err(|e| storage_error("query get_by_client", e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| storage_error("collect get_by_client", e))?;

        tracing::debug!(client, count = parcels.len(), "parcels fetched by client");
        Ok(parcels)
    }

    fn set_address(&self, number: ParcelNumber, address: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let rows = conn
            .execute(
                "UPDATE parcel SET address = ?1 WHERE number = ?2",
                params![address, number],
            )
            .map_err(|e| storage_error("set address", e))?;

        tracing::debug!(number, rows, "parcel address updated");
        Ok(())
    }

    fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let rows = conn
            .execute(
                "UPDATE parcel SET status = ?1 WHERE number = ?2",
                params![status, number],
            )
            .map_err(|e| storage_error("set status", e))?;

        tracing::debug!(number, %status, rows, "parcel status updated");
        Ok(())
    }

    fn delete(&self, number: ParcelNumber) -> Result<(), StoreError> {
        let conn = self.lock()?;
        let rows = conn
            .execute("DELETE FROM parcel WHERE number = ?1", params![number])
            .map_err(|e| storage_error("delete", e))?;

        tracing::debug!(number, rows, "parcel deleted");
        Ok(())
    }
}
