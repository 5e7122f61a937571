//! Contact snapshot validation: phone normalization.
//!
//! Any phone submitted through ticket creation or a contact-snapshot update
//! strips non-digit characters, must leave exactly 10 digits, and is stored
//! with a fixed country-code prefix.

use std::fmt;

/// Country-code prefix applied to every stored phone number.
pub const PHONE_PREFIX: &str = "+1";

/// Number of digits a phone must normalize to.
pub const PHONE_DIGITS: usize = 10;

/// Error returned when a phone does not normalize to exactly 10 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneError {
    /// The raw input that failed.
    pub raw: String,
    /// How many digits remained after stripping.
    pub digits: usize,
}

impl fmt::Display for PhoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "phone '{}' has {} digits after stripping, expected exactly {}",
            self.raw, self.digits, PHONE_DIGITS
        )
    }
}

impl std::error::Error for PhoneError {}

/// Normalize a phone number to its stored form: `+1` + 10 digits.
///
/// # Errors
///
/// Returns [`PhoneError`] when stripping non-digit characters leaves
/// anything other than exactly 10 digits.
pub fn normalize_phone(raw: &str) -> Result<String, PhoneError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == PHONE_DIGITS {
        Ok(format!("{PHONE_PREFIX}{digits}"))
    } else {
        Err(PhoneError {
            raw: raw.to_string(),
            digits: digits.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PHONE_PREFIX, PhoneError, normalize_phone};

    #[test]
    fn strips_separators_and_prefixes() {
        assert_eq!(normalize_phone("555-0123-456").unwrap(), "+15550123456");
        assert_eq!(normalize_phone("(555) 012 3456").unwrap(), "+15550123456");
        assert_eq!(normalize_phone("555.012.3456").unwrap(), "+15550123456");
    }

    #[test]
    fn rejects_nine_digits() {
        let err = normalize_phone("555-012-345").unwrap_err();
        assert_eq!(err, PhoneError {
            raw: "555-012-345".into(),
            digits: 9,
        });
    }

    #[test]
    fn rejects_eleven_digits() {
        let err = normalize_phone("15550123456").unwrap_err();
        assert_eq!(err.digits, 11);
    }

    #[test]
    fn rejects_empty() {
        assert!(normalize_phone("").is_err());
        assert!(normalize_phone("---").is_err());
    }

    #[test]
    fn stored_form_carries_prefix() {
        let normalized = normalize_phone("5550123456").unwrap();
        assert!(normalized.starts_with(PHONE_PREFIX));
        assert_eq!(normalized.len(), PHONE_PREFIX.len() + 10);
    }
}
