//! Donors and beneficiaries.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::validation;

/// A beneficiary may list at most this many needed foods.
pub const MAX_NEEDED_FOODS: usize = 3;

/// Name and contact details shared by donors and beneficiaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name (required).
    pub name: String,
    /// Phone number, validated by format only.
    pub phone: Option<String>,
    /// E-mail address, validated by format only.
    pub email: Option<String>,
    /// Free-text postal address.
    pub address: Option<String>,
}

impl Contact {
    /// Create a contact with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the e-mail address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the postal address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Return a trimmed copy, rejecting a blank name or malformed
    /// phone/e-mail.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first bad field.
    pub fn validated(&self) -> Result<Self> {
        Ok(Self {
            name: validation::required("name", &self.name)?,
            phone: validation::phone(self.phone.as_deref())?,
            email: validation::email(self.email.as_deref())?,
            address: validation::optional(self.address.as_deref()),
        })
    }
}

/// Someone who gives food.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    /// Database id.
    pub id: i64,
    /// Name and contact details.
    #[serde(flatten)]
    pub contact: Contact,
}

impl Donor {
    /// Donor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.contact.name
    }
}

/// Input for creating or replacing a beneficiary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBeneficiary {
    /// Name and contact details.
    #[serde(flatten)]
    pub contact: Contact,
    /// Up to three foods the beneficiary needs.
    pub needed_foods: Vec<String>,
}

impl NewBeneficiary {
    /// Create a beneficiary input from contact details.
    #[must_use]
    pub fn new(contact: Contact) -> Self {
        Self {
            contact,
            needed_foods: Vec::new(),
        }
    }

    /// Add a needed food.
    #[must_use]
    pub fn needing(mut self, food: impl Into<String>) -> Self {
        self.needed_foods.push(food.into());
        self
    }

    /// Return a trimmed copy with blank needed foods dropped.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad contact details or more than
    /// [`MAX_NEEDED_FOODS`] entries.
    pub fn validated(&self) -> Result<Self> {
        let needed_foods: Vec<String> = self
            .needed_foods
            .iter()
            .filter_map(|f| validation::optional(Some(f.as_str())))
            .collect();
        if needed_foods.len() > MAX_NEEDED_FOODS {
            return Err(Error::validation(
                "needed_foods",
                format!("at most {MAX_NEEDED_FOODS} entries allowed"),
            ));
        }
        Ok(Self {
            contact: self.contact.validated()?,
            needed_foods,
        })
    }

    /// Needed food in slot `index` (0-based), if any.
    pub(crate) fn needed_food(&self, index: usize) -> Option<&str> {
        self.needed_foods.get(index).map(String::as_str)
    }
}

/// Someone who receives food.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    /// Database id.
    pub id: i64,
    /// Name, contact details and needed foods.
    #[serde(flatten)]
    pub details: NewBeneficiary,
}

impl Beneficiary {
    /// Beneficiary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.details.contact.name
    }
}
