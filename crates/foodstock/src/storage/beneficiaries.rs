//! Beneficiary records.

use rusqlite::{params, Row};
use tracing::debug;

use super::{Record, Storage};
use crate::error::Result;
use crate::model::{Beneficiary, Contact, NewBeneficiary};

impl Record for Beneficiary {
    const TABLE: &'static str = "beneficiaries";
    const ENTITY: &'static str = "beneficiary";
    const COLUMNS: &'static str =
        "id, name, phone, email, address, needed_food_1, needed_food_2, needed_food_3";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mut needed_foods = Vec::new();
        for idx in 5..8 {
            if let Some(food) = row.get::<_, Option<String>>(idx)? {
                needed_foods.push(food);
            }
        }
        Ok(Self {
            id: row.get(0)?,
            details: NewBeneficiary {
                contact: Contact {
                    name: row.get(1)?,
                    phone: row.get(2)?,
                    email: row.get(3)?,
                    address: row.get(4)?,
                },
                needed_foods,
            },
        })
    }
}

impl Storage {
    /// Insert a beneficiary after validation.
    ///
    /// Returns the assigned id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error.
    pub fn insert_beneficiary(&self, input: &NewBeneficiary) -> Result<i64> {
        let b = input.validated()?;
        self.conn.execute(
            r"
            INSERT INTO beneficiaries
                (name, phone, email, address, needed_food_1, needed_food_2, needed_food_3)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
            params![
                b.contact.name,
                b.contact.phone,
                b.contact.email,
                b.contact.address,
                b.needed_food(0),
                b.needed_food(1),
                b.needed_food(2),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted beneficiary {} ({})", id, b.contact.name);
        Ok(id)
    }

    /// Replace a beneficiary's details.
    ///
    /// Returns `true` if the beneficiary existed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error.
    pub fn update_beneficiary(&self, id: i64, input: &NewBeneficiary) -> Result<bool> {
        let b = input.validated()?;
        let affected = self.conn.execute(
            r"
            UPDATE beneficiaries
            SET name = ?1, phone = ?2, email = ?3, address = ?4,
                needed_food_1 = ?5, needed_food_2 = ?6, needed_food_3 = ?7
            WHERE id = ?8
            ",
            params![
                b.contact.name,
                b.contact.phone,
                b.contact.email,
                b.contact.address,
                b.needed_food(0),
                b.needed_food(1),
                b.needed_food(2),
                id,
            ],
        )?;
        debug!("Updated beneficiary {} ({} row(s))", id, affected);
        Ok(affected > 0)
    }

    /// Find beneficiaries whose name contains `term`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search_beneficiaries(&self, term: &str) -> Result<Vec<Beneficiary>> {
        self.search_by_name(term, Beneficiary::name)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Beneficiary, Contact, NewBeneficiary};
    use crate::storage::tests::create_test_storage;

    #[test]
    fn test_beneficiary_round_trip() {
        let storage = create_test_storage();
        let input = NewBeneficiary::new(
            Contact::new("Beneficiario Teste")
                .with_email("benef@teste.com")
                .with_address("Rua B"),
        )
        .needing("Arroz")
        .needing("Leite");
        let id = storage.insert_beneficiary(&input).unwrap();

        let b: Beneficiary = storage.get(id).unwrap().unwrap();
        assert_eq!(b.name(), "Beneficiario Teste");
        assert_eq!(b.details.needed_foods, vec!["Arroz", "Leite"]);

        let replacement = NewBeneficiary::new(Contact::new("Beneficiario Atualizado")).needing("Feijao");
        assert!(storage.update_beneficiary(id, &replacement).unwrap());
        let b: Beneficiary = storage.get(id).unwrap().unwrap();
        assert_eq!(b.name(), "Beneficiario Atualizado");
        assert_eq!(b.details.needed_foods, vec!["Feijao"]);
        assert_eq!(b.details.contact.address, None);

        assert!(storage.delete::<Beneficiary>(id).unwrap());
        assert!(storage.get::<Beneficiary>(id).unwrap().is_none());
    }

    #[test]
    fn test_insert_beneficiary_too_many_needs() {
        let storage = create_test_storage();
        let input = NewBeneficiary {
            contact: Contact::new("B"),
            needed_foods: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        };
        assert!(storage.insert_beneficiary(&input).unwrap_err().is_validation());
    }

    #[test]
    fn test_search_beneficiaries() {
        let storage = create_test_storage();
        storage
            .insert_beneficiary(&NewBeneficiary::new(Contact::new("Casa Esperanca")))
            .unwrap();
        storage
            .insert_beneficiary(&NewBeneficiary::new(Contact::new("Abrigo Luz")))
            .unwrap();

        let found = storage.search_beneficiaries("casa").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "Casa Esperanca");
    }

    #[test]
    fn test_search_beneficiaries_accented_name() {
        let storage = create_test_storage();
        storage
            .insert_beneficiary(&NewBeneficiary::new(Contact::new("Família Conceição")))
            .unwrap();
        storage
            .insert_beneficiary(&NewBeneficiary::new(Contact::new("Abrigo_Luz")))
            .unwrap();
        storage
            .insert_beneficiary(&NewBeneficiary::new(Contact::new("AbrigoXLuz")))
            .unwrap();

        let found = storage.search_beneficiaries("FAMÍLIA").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "Família Conceição");

        let found = storage.search_beneficiaries("o_l").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), "Abrigo_Luz");
    }
}
