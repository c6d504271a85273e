//! Item records and natural-key resolution.

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{Record, Storage};
use crate::error::Result;
use crate::model::{Item, ItemKey};

impl Record for Item {
    const TABLE: &'static str = "items";
    const ENTITY: &'static str = "item";
    const COLUMNS: &'static str = "id, name, brand, unit";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            key: ItemKey {
                name: row.get(1)?,
                brand: row.get(2)?,
                unit: row.get(3)?,
            },
        })
    }
}

impl Storage {
    /// Insert an item.
    ///
    /// Fails if an item with the same (name, brand, unit) exists; use
    /// [`Storage::resolve_item`] to reuse it instead.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error.
    pub fn insert_item(&self, key: &ItemKey) -> Result<i64> {
        let key = key.validated()?;
        self.conn.execute(
            "INSERT INTO items (name, brand, unit) VALUES (?1, ?2, ?3)",
            params![key.name, key.brand, key.unit],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("Inserted item {} {}", id, key);
        Ok(id)
    }

    /// Replace an item's name, brand and unit.
    ///
    /// Returns `true` if the item existed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error when the
    /// new key collides with another item.
    pub fn update_item(&self, id: i64, key: &ItemKey) -> Result<bool> {
        let key = key.validated()?;
        let affected = self.conn.execute(
            "UPDATE items SET name = ?1, brand = ?2, unit = ?3 WHERE id = ?4",
            params![key.name, key.brand, key.unit, id],
        )?;
        debug!("Updated item {} ({} row(s))", id, affected);
        Ok(affected > 0)
    }

    /// Look up an item by its full natural key.
    ///
    /// Brand comparison is NULL-safe, so an item without a brand is found by
    /// a key without a brand.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find_item(&self, key: &ItemKey) -> Result<Option<Item>> {
        let key = key.validated()?;
        let item = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM items WHERE name = ?1 AND brand IS ?2 AND unit = ?3",
                    Item::COLUMNS
                ),
                params![key.name, key.brand, key.unit],
                Item::from_row,
            )
            .optional()?;
        Ok(item)
    }

    /// Look up an item by name and brand only.
    ///
    /// When several units exist for the pair, the oldest item wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn find_item_by_name_brand(&self, name: &str, brand: Option<&str>) -> Result<Option<Item>> {
        let brand = crate::validation::optional(brand);
        let item = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM items WHERE name = ?1 AND brand IS ?2 ORDER BY id LIMIT 1",
                    Item::COLUMNS
                ),
                params![name.trim(), brand],
                Item::from_row,
            )
            .optional()?;
        Ok(item)
    }

    /// Return the id of the item with this key, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error.
    pub fn resolve_item(&self, key: &ItemKey) -> Result<i64> {
        if let Some(existing) = self.find_item(key)? {
            debug!("Reusing item {} {}", existing.id, existing.key);
            return Ok(existing.id);
        }
        self.insert_item(key)
    }

    /// Distinct item names, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn item_names(&self) -> Result<Vec<String>> {
        self.strings("SELECT DISTINCT name FROM items ORDER BY name")
    }

    /// Distinct non-empty brands, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn item_brands(&self) -> Result<Vec<String>> {
        self.strings(
            "SELECT DISTINCT brand FROM items WHERE brand IS NOT NULL AND brand != '' ORDER BY brand",
        )
    }

    fn strings(&self, sql: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Item, ItemKey};
    use crate::storage::tests::create_test_storage;

    #[test]
    fn test_item_round_trip() {
        let storage = create_test_storage();
        let id = storage
            .insert_item(&ItemKey::new("Arroz", Some("Tio Joao"), "5kg"))
            .unwrap();

        let item: Item = storage.get(id).unwrap().unwrap();
        assert_eq!(item.key.name, "Arroz");

        assert!(storage
            .update_item(id, &ItemKey::new("Arroz", Some("Camil"), "5kg"))
            .unwrap());
        let item: Item = storage.get(id).unwrap().unwrap();
        assert_eq!(item.key.brand.as_deref(), Some("Camil"));

        assert!(storage.delete::<Item>(id).unwrap());
        assert!(storage.get::<Item>(id).unwrap().is_none());
    }

    #[test]
    fn test_resolve_item_reuses_existing() {
        let storage = create_test_storage();
        let key = ItemKey::new("Feijao", Some("Camil"), "1kg");

        let first = storage.resolve_item(&key).unwrap();
        let second = storage.resolve_item(&key).unwrap();
        assert_eq!(first, second);

        let other_unit = storage
            .resolve_item(&ItemKey::new("Feijao", Some("Camil"), "2kg"))
            .unwrap();
        assert_ne!(first, other_unit);
        assert_eq!(storage.count::<Item>().unwrap(), 2);
    }

    #[test]
    fn test_resolve_item_without_brand() {
        let storage = create_test_storage();
        let key = ItemKey::new("Leite", None, "1L");

        let first = storage.resolve_item(&key).unwrap();
        let second = storage
            .resolve_item(&ItemKey::new("Leite", Some(""), "1L"))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_insert_duplicate_item_fails() {
        let storage = create_test_storage();
        let key = ItemKey::new("Arroz", Some("Tio Joao"), "5kg");
        storage.insert_item(&key).unwrap();
        assert!(storage.insert_item(&key).is_err());
    }

    #[test]
    fn test_find_item_by_name_brand() {
        let storage = create_test_storage();
        let first = storage
            .insert_item(&ItemKey::new("Arroz", Some("Tio Joao"), "5kg"))
            .unwrap();
        storage
            .insert_item(&ItemKey::new("Arroz", Some("Tio Joao"), "1kg"))
            .unwrap();

        let found = storage
            .find_item_by_name_brand("Arroz", Some("Tio Joao"))
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first);

        assert!(storage
            .find_item_by_name_brand("Arroz", Some("Camil"))
            .unwrap()
            .is_none());
        assert!(storage.find_item_by_name_brand("Arroz", None).unwrap().is_none());
    }

    #[test]
    fn test_item_names_and_brands() {
        let storage = create_test_storage();
        storage
            .insert_item(&ItemKey::new("Feijao", Some("Camil"), "1kg"))
            .unwrap();
        storage
            .insert_item(&ItemKey::new("Arroz", Some("Tio Joao"), "5kg"))
            .unwrap();
        storage
            .insert_item(&ItemKey::new("Arroz", None, "1kg"))
            .unwrap();

        assert_eq!(storage.item_names().unwrap(), vec!["Arroz", "Feijao"]);
        assert_eq!(storage.item_brands().unwrap(), vec!["Camil", "Tio Joao"]);
    }
}
