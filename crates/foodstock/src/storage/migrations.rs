//! Database migration system for foodstock.
//!
//! Startup is idempotent: tables are created if absent, column additions are
//! applied best-effort, then versioned migrations bring the schema up to
//! [`CURRENT_VERSION`].

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::schema::{
    COLUMN_ADDITIONS, CREATE_DISTRIBUTED_ITEM_INDEX, CREATE_ITEM_IDENTITY_INDEX,
    CREATE_RECEIVED_EXPIRATION_INDEX, CREATE_RECEIVED_ITEM_INDEX, SCHEMA_STATEMENTS,
};

/// The current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Initialize the database schema.
///
/// # Errors
///
/// Returns an error if schema creation or migration fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    apply_column_additions(conn);

    let version = get_schema_version(conn)?;
    if version < CURRENT_VERSION {
        run_migrations(conn, version)?;
    }

    Ok(())
}

/// Add the columns listed in [`COLUMN_ADDITIONS`], ignoring failures.
fn apply_column_additions(conn: &Connection) {
    for (table, column, declaration) in COLUMN_ADDITIONS {
        let sql = format!("ALTER TABLE {table} ADD COLUMN {column} {declaration}");
        match conn.execute(&sql, []) {
            Ok(_) => debug!("Added column {}.{}", table, column),
            Err(e) if is_duplicate_column(&e) => {}
            Err(e) => warn!("Could not add column {}.{}: {}", table, column, e),
        }
    }
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(message)) if message.contains("duplicate column name")
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (fresh database).
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Run migrations from the given version to the current version.
fn run_migrations(conn: &Connection, from_version: i32) -> Result<()> {
    let mut current = from_version;

    while current < CURRENT_VERSION {
        current += 1;
        debug!("Running schema migration {}", current);
        run_migration(conn, current)?;
    }

    set_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Run a specific migration version.
fn run_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        2 => migrate_v2(conn),
        _ => Err(Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        }),
    }
}

/// Version 1 is the base schema created by `SCHEMA_STATEMENTS`.
fn migrate_v1(conn: &Connection) -> Result<()> {
    set_schema_version(conn, 1)
}

/// Version 2 adds the item identity constraint and the ledger indexes.
fn migrate_v2(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_ITEM_IDENTITY_INDEX, [])
        .map_err(|e| Error::DatabaseMigration {
            message: format!("duplicate items prevent the identity index: {e}"),
        })?;
    for statement in [
        CREATE_RECEIVED_ITEM_INDEX,
        CREATE_RECEIVED_EXPIRATION_INDEX,
        CREATE_DISTRIBUTED_ITEM_INDEX,
    ] {
        conn.execute(statement, [])?;
    }
    set_schema_version(conn, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        conn.prepare(&format!("PRAGMA table_info({table})"))
            .unwrap()
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .filter_map(std::result::Result::ok)
            .collect()
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        for table in [
            "donors",
            "beneficiaries",
            "items",
            "received_donations",
            "distributed_donations",
            "metadata",
        ] {
            let count: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {table}");
        }
    }

    #[test]
    fn test_needed_food_columns_added() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        let columns = table_columns(&conn, "beneficiaries");
        for column in ["needed_food_1", "needed_food_2", "needed_food_3"] {
            assert!(columns.iter().any(|c| c == column), "missing {column}");
        }
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let conn = create_test_db();

        initialize_schema(&conn).expect("first init failed");
        initialize_schema(&conn).expect("second init failed");

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION);
        assert_eq!(
            table_columns(&conn, "beneficiaries")
                .iter()
                .filter(|c| c.starts_with("needed_food_"))
                .count(),
            3
        );
    }

    #[test]
    fn test_duplicate_column_is_recognized() {
        let conn = create_test_db();
        conn.execute("CREATE TABLE t (a TEXT)", []).unwrap();
        let err = conn
            .execute("ALTER TABLE t ADD COLUMN a TEXT", [])
            .unwrap_err();
        assert!(is_duplicate_column(&err));
    }

    #[test]
    fn test_get_schema_version_fresh_db() {
        let conn = create_test_db();
        conn.execute(
            "CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_set_and_get_schema_version() {
        let conn = create_test_db();
        conn.execute(
            "CREATE TABLE metadata (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )
        .unwrap();

        set_schema_version(&conn, 42).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 42);
    }

    #[test]
    fn test_run_migration_unknown_version() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        let err = run_migration(&conn, 999).unwrap_err();
        assert!(err.to_string().contains("unknown migration version"));
    }

    #[test]
    fn test_indexes_created() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(std::result::Result::ok)
            .collect();

        assert!(indexes.iter().any(|n| n == "idx_items_identity"));
        assert!(indexes.iter().any(|n| n == "idx_received_expiration"));
        assert!(indexes.iter().any(|n| n == "idx_distributed_item"));
    }

    #[test]
    fn test_identity_index_rejects_duplicates() {
        let conn = create_test_db();
        initialize_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO items (name, brand, unit) VALUES ('Rice', NULL, 'kg')",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO items (name, brand, unit) VALUES ('Rice', NULL, 'kg')",
            [],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_upgrades_legacy_beneficiaries_table() {
        let conn = create_test_db();
        conn.execute(
            "CREATE TABLE beneficiaries (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, phone TEXT, email TEXT, address TEXT, needed_food_1 TEXT)",
            [],
        )
        .unwrap();

        initialize_schema(&conn).unwrap();

        let columns = table_columns(&conn, "beneficiaries");
        assert!(columns.iter().any(|c| c == "needed_food_3"));
    }
}
