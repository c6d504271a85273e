//! Tracked goods.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation;

/// Natural key of an item: the (name, brand, unit) triple.
///
/// Two receipts with equal keys share one item record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    /// Item name, e.g. "Rice".
    pub name: String,
    /// Brand, if known.
    pub brand: Option<String>,
    /// Unit of measure, e.g. "5kg".
    pub unit: String,
}

impl ItemKey {
    /// Build a key.
    #[must_use]
    pub fn new(name: impl Into<String>, brand: Option<&str>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: brand.map(ToString::to_string),
            unit: unit.into(),
        }
    }

    /// Return a trimmed copy; a blank brand becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when name or unit is blank.
    pub fn validated(&self) -> Result<Self> {
        Ok(Self {
            name: validation::required("item name", &self.name)?,
            brand: validation::optional(self.brand.as_deref()),
            unit: validation::required("unit", &self.unit)?,
        })
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.brand {
            Some(brand) => write!(f, "{} ({brand}, {})", self.name, self.unit),
            None => write!(f, "{} ({})", self.name, self.unit),
        }
    }
}

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Database id.
    pub id: i64,
    /// Name, brand and unit.
    #[serde(flatten)]
    pub key: ItemKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_key_validated() {
        let key = ItemKey::new(" Rice ", Some("  "), " 5kg").validated().unwrap();
        assert_eq!(key, ItemKey::new("Rice", None, "5kg"));
    }

    #[test]
    fn test_item_key_requires_unit() {
        let err = ItemKey::new("Rice", None, "").validated().unwrap_err();
        assert!(err.to_string().contains("unit"));
    }

    #[test]
    fn test_item_key_display() {
        assert_eq!(
            ItemKey::new("Rice", Some("Tio Joao"), "5kg").to_string(),
            "Rice (Tio Joao, 5kg)"
        );
        assert_eq!(ItemKey::new("Beans", None, "1kg").to_string(), "Beans (1kg)");
    }
}
