//! Field-level checks shared by every insert and update path.
//!
//! Each check returns the normalised value so callers can assign it straight
//! into an `ActiveModel`.

use sea_orm::ActiveEnum;

use crate::error::ConstraintViolation;

/// Trimmed, non-empty, at most `max` characters.
pub fn text(field: &'static str, value: &str, max: usize) -> Result<String, ConstraintViolation> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConstraintViolation::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ConstraintViolation::TooLong { field, max });
    }
    Ok(value.to_string())
}

/// Parse a raw choice string into its enum, rejecting anything outside the domain.
pub fn choice<E>(field: &'static str, raw: &str) -> Result<E, ConstraintViolation>
where
    E: ActiveEnum<Value = String>,
{
    E::try_from_value(&raw.trim().to_string()).map_err(|_| ConstraintViolation::Choice {
        field,
        value: raw.to_string(),
        allowed: E::values(),
    })
}

pub fn range(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, ConstraintViolation> {
    if value < min || value > max {
        return Err(ConstraintViolation::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

pub fn email(field: &'static str, value: &str) -> Result<String, ConstraintViolation> {
    let value = text(field, value, 254)?.to_lowercase();
    let invalid = |reason: &str| ConstraintViolation::Invalid {
        field,
        reason: reason.to_string(),
    };

    let (local, domain) = value
        .split_once('@')
        .ok_or_else(|| invalid("missing '@'"))?;
    if local.is_empty() || domain.contains('@') || value.contains(char::is_whitespace) {
        return Err(invalid("malformed address"));
    }
    match domain.split_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !domain.ends_with('.') => {
            Ok(value)
        }
        _ => Err(invalid("malformed domain")),
    }
}

/// Digits only, at most `max` of them.
pub fn phone(field: &'static str, value: &str, max: usize) -> Result<String, ConstraintViolation> {
    let value = text(field, value, max)?;
    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConstraintViolation::Invalid {
            field,
            reason: "must contain digits only".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::lost_found::YesNo;
    use crate::entities::service::ServiceType;

    #[test]
    fn test_text_trims_and_bounds() {
        assert_eq!(text("name", "  Rahim  ", 100).unwrap(), "Rahim");
        assert_eq!(
            text("name", "   ", 100),
            Err(ConstraintViolation::Empty { field: "name" })
        );
        assert_eq!(
            text("user_id", "abcdefghi", 8),
            Err(ConstraintViolation::TooLong {
                field: "user_id",
                max: 8
            })
        );
        // Length is counted in characters, not bytes
        assert!(text("name", "ইমরান", 5).is_ok());
    }

    #[test]
    fn test_choice_accepts_domain_values_only() {
        let parsed: ServiceType = choice("service_type", "Public Transport").unwrap();
        assert_eq!(parsed, ServiceType::PublicTransport);

        let err = choice::<ServiceType>("service_type", "Ferry").unwrap_err();
        match err {
            ConstraintViolation::Choice { field, value, allowed } => {
                assert_eq!(field, "service_type");
                assert_eq!(value, "Ferry");
                assert_eq!(allowed, vec!["Bus", "Carpool", "Public Transport"]);
            }
            other => panic!("unexpected violation: {other:?}"),
        }

        // Choices are case sensitive
        assert!(choice::<YesNo>("found", "yes").is_err());
    }

    #[test]
    fn test_range_rejects_instead_of_clamping() {
        assert_eq!(range("ratings", 5, 1, 5), Ok(5));
        assert_eq!(range("ratings", 1, 1, 5), Ok(1));
        assert!(matches!(
            range("ratings", 6, 1, 5),
            Err(ConstraintViolation::OutOfRange { value: 6, .. })
        ));
        assert!(range("ratings", 0, 1, 5).is_err());
    }

    #[test]
    fn test_email() {
        assert_eq!(email("email", "Ana@Example.com").unwrap(), "ana@example.com");
        assert!(email("email", "ana.example.com").is_err());
        assert!(email("email", "@example.com").is_err());
        assert!(email("email", "ana@example").is_err());
        assert!(email("email", "ana@@example.com").is_err());
        assert!(email("email", "a na@example.com").is_err());
    }

    #[test]
    fn test_phone() {
        assert_eq!(phone("phone", "01711000000", 11).unwrap(), "01711000000");
        assert!(phone("phone", "0171-100000", 11).is_err());
        assert!(phone("phone", "017110000001", 11).is_err());
    }
}
