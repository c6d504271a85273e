//! `SQLite` schema definitions for foodstock.
//!
//! Dates are stored as ISO-8601 `YYYY-MM-DD` text and quantities as REAL.

/// SQL statement to create the donors table.
pub const CREATE_DONORS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS donors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT,
    email TEXT,
    address TEXT
)
";

/// SQL statement to create the beneficiaries table.
///
/// The needed-food columns are added separately, see [`COLUMN_ADDITIONS`].
pub const CREATE_BENEFICIARIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS beneficiaries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    phone TEXT,
    email TEXT,
    address TEXT
)
";

/// SQL statement to create the items table.
pub const CREATE_ITEMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    brand TEXT,
    unit TEXT NOT NULL
)
";

/// SQL statement to create the received donations table.
pub const CREATE_RECEIVED_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS received_donations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    donor_id INTEGER NOT NULL REFERENCES donors (id),
    item_id INTEGER NOT NULL REFERENCES items (id),
    quantity REAL NOT NULL,
    received_date TEXT NOT NULL,
    expiration_date TEXT NOT NULL
)
";

/// SQL statement to create the distributed donations table.
pub const CREATE_DISTRIBUTED_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS distributed_donations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    beneficiary_id INTEGER NOT NULL REFERENCES beneficiaries (id),
    item_id INTEGER NOT NULL REFERENCES items (id),
    quantity REAL NOT NULL,
    distribution_date TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All table creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_DONORS_TABLE,
    CREATE_BENEFICIARIES_TABLE,
    CREATE_ITEMS_TABLE,
    CREATE_RECEIVED_TABLE,
    CREATE_DISTRIBUTED_TABLE,
    CREATE_METADATA_TABLE,
];

/// Columns added to existing tables on every startup, as
/// `(table, column, declaration)`. Re-adding an existing column fails with
/// "duplicate column name", which is ignored.
pub const COLUMN_ADDITIONS: &[(&str, &str, &str)] = &[
    ("beneficiaries", "needed_food_1", "TEXT"),
    ("beneficiaries", "needed_food_2", "TEXT"),
    ("beneficiaries", "needed_food_3", "TEXT"),
];

/// Unique index enforcing one item per (name, brand, unit), treating a
/// missing brand as a value of its own.
pub const CREATE_ITEM_IDENTITY_INDEX: &str = r"
CREATE UNIQUE INDEX IF NOT EXISTS idx_items_identity
ON items (name, COALESCE(brand, ''), unit)
";

/// Index for per-item sums over received donations.
pub const CREATE_RECEIVED_ITEM_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_received_item ON received_donations (item_id)
";

/// Index for the expiration alert range scan.
pub const CREATE_RECEIVED_EXPIRATION_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_received_expiration ON received_donations (expiration_date)
";

/// Index for per-item sums over distributed donations.
pub const CREATE_DISTRIBUTED_ITEM_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_distributed_item ON distributed_donations (item_id)
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert_eq!(SCHEMA_STATEMENTS.len(), 6);
        for stmt in SCHEMA_STATEMENTS {
            assert!(stmt.contains("CREATE TABLE IF NOT EXISTS"));
        }
    }

    #[test]
    fn test_donation_tables_reference_parents() {
        assert!(CREATE_RECEIVED_TABLE.contains("REFERENCES donors (id)"));
        assert!(CREATE_RECEIVED_TABLE.contains("REFERENCES items (id)"));
        assert!(CREATE_DISTRIBUTED_TABLE.contains("REFERENCES beneficiaries (id)"));
    }

    #[test]
    fn test_column_additions_target_beneficiaries() {
        assert!(COLUMN_ADDITIONS
            .iter()
            .all(|(table, column, _)| *table == "beneficiaries" && column.starts_with("needed_food_")));
    }
}
