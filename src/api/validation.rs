use std::str::FromStr;

use super::ApiError;

/// Trimmed value of a required text field.
pub fn require<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

pub fn require_value<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation(format!("{field} is required")))
}

/// Parses an enumerated field case-insensitively.
pub fn parse_category<T: FromStr>(value: &str, field: &str) -> Result<T, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::validation(format!("Invalid {field}: {value}")))
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ApiError::validation("Invalid email address")),
    }
}

/// Empty strings count as absent.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BodyType, InquiryStatus};

    #[test]
    fn test_require() {
        assert_eq!(require(Some("  Toyota "), "make").unwrap(), "Toyota");
        assert!(require(Some("   "), "make").is_err());
        assert!(require(None, "make").is_err());

        let err = require(None, "color").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: color is required");
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(
            parse_category::<BodyType>("suv", "bodyType").unwrap(),
            BodyType::Suv
        );
        assert_eq!(
            parse_category::<InquiryStatus>("Contacted", "status").unwrap(),
            InquiryStatus::Contacted
        );
        assert!(parse_category::<BodyType>("Minivan", "bodyType").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jane@localhost").is_err());
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional(Some(" 555 ".into())).as_deref(), Some("555"));
        assert_eq!(optional(Some(String::new())), None);
        assert_eq!(optional(None), None);
    }
}
