//! Input validation for values coming from the presentation layer.
//!
//! Names are required, contact details are checked by format only, quantities
//! must be positive numbers and dates are accepted either as `DD/MM/YYYY`
//! (the form entry format) or ISO-8601 `YYYY-MM-DD` (the storage format).

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Error, Result};

/// Date format used for persisted dates.
pub const STORAGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Date format used on data entry forms.
pub const ENTRY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Area code plus 8 or 9 digit number, optional parentheses, space and dash.
const PHONE_PATTERN: &str = r"^\(?\d{2}\)?\s?\d{4,5}-?\d{4}$";

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Check a phone number: the pattern must match the whole value and it must
/// contain 10 or 11 digits.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    phone_regex().is_match(phone) && (digits == 10 || digits == 11)
}

/// Check an e-mail address by format.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Trim a required text value, rejecting it when empty.
///
/// # Errors
///
/// Returns a validation error when the value is blank.
pub fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text value; blank values become `None`.
#[must_use]
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Normalize and validate an optional phone number.
///
/// # Errors
///
/// Returns a validation error when a non-blank value is malformed.
pub fn phone(value: Option<&str>) -> Result<Option<String>> {
    match optional(value) {
        Some(p) if !is_valid_phone(&p) => Err(Error::validation(
            "phone",
            format!("{p:?} must be area code plus number (10 or 11 digits)"),
        )),
        other => Ok(other),
    }
}

/// Normalize and validate an optional e-mail address.
///
/// # Errors
///
/// Returns a validation error when a non-blank value is malformed.
pub fn email(value: Option<&str>) -> Result<Option<String>> {
    match optional(value) {
        Some(e) if !is_valid_email(&e) => Err(Error::validation(
            "email",
            format!("{e:?} is not a valid address"),
        )),
        other => Ok(other),
    }
}

/// Check that a quantity is a finite, strictly positive number.
///
/// # Errors
///
/// Returns a validation error otherwise.
pub fn quantity(value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::validation(
            "quantity",
            format!("{value} must be a positive number"),
        ));
    }
    Ok(value)
}

/// Parse a quantity typed by a user.
///
/// # Errors
///
/// Returns a validation error when the text is not a number or not positive.
pub fn parse_quantity(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| Error::validation("quantity", format!("{trimmed:?} is not a number")))?;
    quantity(value)
}

/// Parse a date in `DD/MM/YYYY` or `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns a validation error when neither format matches.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(trimmed, ENTRY_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, STORAGE_DATE_FORMAT))
        .map_err(|_| {
            Error::validation(
                "date",
                format!("{trimmed:?} must be DD/MM/YYYY or YYYY-MM-DD"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_phones() {
        assert!(is_valid_phone("(11) 98765-4321"));
        assert!(is_valid_phone("(11)98765-4321"));
        assert!(is_valid_phone("11987654321"));
        assert!(is_valid_phone("1133334444"));
        assert!(is_valid_phone("11 3333-4444"));
    }

    #[test]
    fn test_invalid_phones() {
        assert!(!is_valid_phone("1111-1111"));
        assert!(!is_valid_phone("98765-4321"));
        assert!(!is_valid_phone("phone"));
        assert!(!is_valid_phone("(11) 98765-43210"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("donor@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("donor@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("donor example.com"));
        assert!(!is_valid_email("donor@example.c"));
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("name", "  Maria  ").unwrap(), "Maria");
        let err = required("name", "   ").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional(None), None);
        assert_eq!(optional(Some("  ")), None);
        assert_eq!(optional(Some(" Rua A ")), Some("Rua A".to_string()));
    }

    #[test]
    fn test_phone_and_email_optional() {
        assert_eq!(phone(None).unwrap(), None);
        assert_eq!(phone(Some("")).unwrap(), None);
        assert!(phone(Some("1111-1111")).is_err());
        assert_eq!(email(Some("")).unwrap(), None);
        assert!(email(Some("nope")).is_err());
    }

    #[test]
    fn test_quantity_bounds() {
        assert_eq!(quantity(2.5).unwrap(), 2.5);
        assert!(quantity(0.0).is_err());
        assert!(quantity(-1.0).is_err());
        assert!(quantity(f64::NAN).is_err());
        assert!(quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(" 10 ").unwrap(), 10.0);
        assert_eq!(parse_quantity("0.5").unwrap(), 0.5);
        assert!(parse_quantity("ten").unwrap_err().is_validation());
        assert!(parse_quantity("-3").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(parse_date("31/12/2025").unwrap(), expected);
        assert_eq!(parse_date("2025-12-31").unwrap(), expected);
        assert!(parse_date("12/31/2025").is_err());
        assert!(parse_date("tomorrow").is_err());
    }
}
