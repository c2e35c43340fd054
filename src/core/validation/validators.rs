//! Reusable field validators
//!
//! Each validator takes the raw value of one form field (absent, or the
//! submitted string) and either coerces it to a typed value or returns the
//! human-readable message configured for that field.

use crate::core::invoice::to_minor_units;
use std::str::FromStr;

/// Validator: field must be present and non-blank; yields the trimmed string
pub fn required_string(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<String, String> + Send + Sync + Clone {
    move |value: Option<&str>| match value.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(message.to_string()),
    }
}

/// Validator: field coerces to a finite number strictly greater than zero
///
/// Coercion follows form semantics: an absent or blank field reads as zero,
/// so it fails the same way an explicit `0` does.
pub fn positive_number(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<f64, String> + Send + Sync + Clone {
    move |value: Option<&str>| {
        let raw = value.map(str::trim).unwrap_or("");
        let number = if raw.is_empty() {
            0.0
        } else {
            raw.parse::<f64>().map_err(|_| message.to_string())?
        };

        if number.is_finite() && number > 0.0 {
            Ok(number)
        } else {
            Err(message.to_string())
        }
    }
}

/// Validator: field is a positive amount that comes to at least one cent
///
/// Yields the amount in cents. Amounts whose cent value overflows an `i64`
/// fail like any other invalid amount.
pub fn positive_cents(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<i64, String> + Send + Sync + Clone {
    let number = positive_number(message);
    move |value: Option<&str>| match to_minor_units(number(value)?) {
        Some(cents) if cents >= 1 => Ok(cents),
        _ => Err(message.to_string()),
    }
}

/// Validator: field must parse exactly as one of the values of `T`
pub fn one_of<T: FromStr>(
    message: &'static str,
) -> impl Fn(Option<&str>) -> Result<T, String> + Send + Sync + Clone {
    move |value: Option<&str>| {
        value
            .and_then(|s| s.parse::<T>().ok())
            .ok_or_else(|| message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invoice::InvoiceStatus;

    const MSG: &str = "bad";

    // === required_string() ===

    #[test]
    fn test_required_string_absent_returns_error() {
        let v = required_string(MSG);
        assert_eq!(v(None), Err(MSG.to_string()));
    }

    #[test]
    fn test_required_string_empty_returns_error() {
        let v = required_string(MSG);
        assert!(v(Some("")).is_err());
    }

    #[test]
    fn test_required_string_blank_returns_error() {
        let v = required_string(MSG);
        assert!(v(Some("   ")).is_err());
    }

    #[test]
    fn test_required_string_trims() {
        let v = required_string(MSG);
        assert_eq!(v(Some("  c1 ")), Ok("c1".to_string()));
    }

    // === positive_number() ===

    #[test]
    fn test_positive_number_decimal_string() {
        let v = positive_number(MSG);
        assert_eq!(v(Some("15.50")), Ok(15.5));
    }

    #[test]
    fn test_positive_number_integer_string() {
        let v = positive_number(MSG);
        assert_eq!(v(Some("10")), Ok(10.0));
    }

    #[test]
    fn test_positive_number_zero_returns_error() {
        let v = positive_number(MSG);
        assert!(v(Some("0")).is_err());
    }

    #[test]
    fn test_positive_number_negative_returns_error() {
        let v = positive_number(MSG);
        assert!(v(Some("-5")).is_err());
    }

    #[test]
    fn test_positive_number_absent_returns_error() {
        let v = positive_number(MSG);
        assert!(v(None).is_err());
        assert!(v(Some("")).is_err());
    }

    #[test]
    fn test_positive_number_not_a_number_returns_error() {
        let v = positive_number(MSG);
        assert!(v(Some("abc")).is_err());
        assert!(v(Some("NaN")).is_err());
        assert!(v(Some("inf")).is_err());
    }

    #[test]
    fn test_positive_number_surrounding_whitespace() {
        let v = positive_number(MSG);
        assert_eq!(v(Some(" 2.5 ")), Ok(2.5));
    }

    // === positive_cents() ===

    #[test]
    fn test_positive_cents_converts_to_minor_units() {
        let v = positive_cents(MSG);
        assert_eq!(v(Some("15.50")), Ok(1550));
        assert_eq!(v(Some("0.29")), Ok(29));
        assert_eq!(v(Some("0.01")), Ok(1));
    }

    #[test]
    fn test_positive_cents_below_one_cent_returns_error() {
        let v = positive_cents(MSG);
        assert_eq!(v(Some("0.001")), Err(MSG.to_string()));
        assert_eq!(v(Some("0.004")), Err(MSG.to_string()));
    }

    #[test]
    fn test_positive_cents_overflow_returns_error() {
        let v = positive_cents(MSG);
        assert_eq!(v(Some("1e20")), Err(MSG.to_string()));
        assert_eq!(v(Some("92233720368547758.08")), Err(MSG.to_string()));
        assert_eq!(
            v(Some("90000000000000000")),
            Ok(9_000_000_000_000_000_000)
        );
    }

    #[test]
    fn test_positive_cents_keeps_number_rules() {
        let v = positive_cents(MSG);
        assert!(v(None).is_err());
        assert!(v(Some("0")).is_err());
        assert!(v(Some("-1")).is_err());
        assert!(v(Some("inf")).is_err());
    }

    // === one_of() ===

    #[test]
    fn test_one_of_accepts_known_values() {
        let v = one_of::<InvoiceStatus>(MSG);
        assert_eq!(v(Some("pending")), Ok(InvoiceStatus::Pending));
        assert_eq!(v(Some("paid")), Ok(InvoiceStatus::Paid));
    }

    #[test]
    fn test_one_of_rejects_unknown_value() {
        let v = one_of::<InvoiceStatus>(MSG);
        assert_eq!(v(Some("overdue")), Err(MSG.to_string()));
    }

    #[test]
    fn test_one_of_rejects_absent() {
        let v = one_of::<InvoiceStatus>(MSG);
        assert!(v(None).is_err());
    }
}
