//! SQLite schema for the parcel table

/// Name of the table the store reads and writes
pub const TABLE: &str = "parcel";

/// SQLite schema definition
pub struct Schema;

impl Schema {
    /// Idempotent DDL for the parcel table and its client index
    pub fn create_tables() -> &'static str {
        r#"
CREATE TABLE IF NOT EXISTS parcel (
    number INTEGER PRIMARY KEY AUTOINCREMENT,
    client INTEGER NOT NULL,
    status TEXT NOT NULL,
    address TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_parcel_client ON parcel(client);
"#
    }

    /// Create the table on the given connection if it does not exist yet
    pub fn apply(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
        conn.execute_batch(Self::create_tables())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_sql_valid() {
        let sql = Schema::create_tables();
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS parcel"));
        assert!(sql.contains(TABLE));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        Schema::apply(&conn).unwrap();
        Schema::apply(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [TABLE],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
