//! # Validation Module
//!
//! Field-level validation for materials and suppliers.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP gateway (apps/api)                                      │
//! │  ├── JSON shape (deserialization, price parsing)                       │
//! │  └── Query parameters                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Drafts and patches (matreg-core)                             │
//! │  └── THIS MODULE: presence, shape, enum membership, price floor        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Registries (matreg-db)                                       │
//! │  ├── Code / name uniqueness                                            │
//! │  ├── Supplier resolution                                               │
//! │  └── Delete guard                                                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 4: SQLite constraints (UNIQUE, FOREIGN KEY ... RESTRICT)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators that accept text return the normalized (trimmed) value so the
//! caller stores exactly what was checked.
//!
//! ## Usage
//! ```rust
//! use matreg_core::validation::{validate_code, validate_email};
//!
//! assert_eq!(validate_code("  M1 ").unwrap(), "M1");
//! assert_eq!(validate_email(Some("")).unwrap(), None);
//! assert!(validate_email(Some("not-an-email")).is_err());
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{MaterialType, Page};
use crate::MIN_BUY_PRICE_CENTS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_CODE_LEN: usize = 64;
const MAX_NAME_LEN: usize = 200;
const MAX_EMAIL_LEN: usize = 254;
const MAX_QUERY_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a material code.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 64 characters
///
/// ## Example
/// ```rust
/// use matreg_core::validation::validate_code;
///
/// assert!(validate_code("FAB-001").is_ok());
/// assert!(validate_code("   ").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<String> {
    required_text(code, "material_code", MAX_CODE_LEN)
}

/// Validates a material name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_material_name(name: &str) -> ValidationResult<String> {
    required_text(name, "material_name", MAX_NAME_LEN)
}

/// Validates a supplier name. Same rules as a material name.
pub fn validate_supplier_name(name: &str) -> ValidationResult<String> {
    required_text(name, "name", MAX_NAME_LEN)
}

/// Validates an optional supplier email.
///
/// ## Rules
/// - Absent or blank means "no email"
/// - Otherwise must contain '@'
///
/// Nothing beyond the '@' is checked; deliverability is not our problem.
pub fn validate_email(email: Option<&str>) -> ValidationResult<Option<String>> {
    let email = match email.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(e) => e,
    };

    if !email.contains('@') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "Please enter a valid email address".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    Ok(Some(email.to_string()))
}

/// Normalizes free text (phone, address): trimmed, blank becomes `None`.
pub fn validate_optional_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Validates a search query.
///
/// ## Rules
/// - Blank means "no search" and yields `None`
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: Option<&str>) -> ValidationResult<Option<String>> {
    let query = match query.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(q) => q,
    };

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_QUERY_LEN,
        });
    }

    Ok(Some(query.to_string()))
}

fn required_text(value: &str, field: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Enum / Numeric Validators
// =============================================================================

/// Parses a material type from its wire value.
///
/// ## Example
/// ```rust
/// use matreg_core::types::MaterialType;
/// use matreg_core::validation::parse_material_type;
///
/// assert_eq!(parse_material_type("jeans").unwrap(), MaterialType::Jeans);
/// assert_eq!(
///     parse_material_type("silk").unwrap_err().to_string(),
///     "material_type must be one of: fabric, jeans, cotton"
/// );
/// ```
pub fn parse_material_type(value: &str) -> ValidationResult<MaterialType> {
    value.parse()
}

/// Validates a buy price against the 100.00 floor.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  POST /api/materials  { "material_buy_price": 99.99, ... }              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_buy_price(99.99) ← THIS FUNCTION                             │
/// │       │                                                                 │
/// │       ├── < 100.00 → "material_buy_price must be at least 100.00.      │
/// │       │               Current price: 99.99"                             │
/// │       │                                                                 │
/// │       └── OK → categorize() → insert                                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_buy_price(price: Money) -> ValidationResult<Money> {
    let min = Money::from_cents(MIN_BUY_PRICE_CENTS);

    if price < min {
        return Err(ValidationError::BelowMinimum {
            field: "material_buy_price".to_string(),
            min,
            actual: price,
        });
    }

    Ok(price)
}

/// Validates limit/offset list parameters.
///
/// ## Rules
/// - `limit` defaults to `default_limit`, must be within `1..=max_limit`
/// - `offset` defaults to 0, must not be negative
pub fn validate_pagination(
    limit: Option<i64>,
    offset: Option<i64>,
    default_limit: u32,
    max_limit: u32,
) -> ValidationResult<Page> {
    let limit = limit.unwrap_or(i64::from(default_limit));
    if limit < 1 || limit > i64::from(max_limit) {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: i64::from(max_limit),
        });
    }

    let offset = offset.unwrap_or(0);
    let offset = u32::try_from(offset).map_err(|_| ValidationError::OutOfRange {
        field: "offset".to_string(),
        min: 0,
        max: i64::from(u32::MAX),
    })?;

    Ok(Page {
        // In range 1..=max_limit, checked above.
        limit: limit as u32,
        offset,
    })
}

// =============================================================================
// Business Rules
// =============================================================================

/// Refuses to delete a supplier that materials still reference.
///
/// ## Example
/// ```rust
/// use matreg_core::validation::ensure_supplier_deletable;
///
/// assert!(ensure_supplier_deletable("Acme", 0).is_ok());
/// assert!(ensure_supplier_deletable("Acme", 2).is_err());
/// ```
pub fn ensure_supplier_deletable(name: &str, material_count: i64) -> CoreResult<()> {
    if material_count > 0 {
        return Err(CoreError::SupplierInUse {
            name: name.to_string(),
            material_count,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert_eq!(validate_code("M1").unwrap(), "M1");
        assert_eq!(validate_code(" FAB-01 ").unwrap(), "FAB-01");

        assert_eq!(
            validate_code("").unwrap_err(),
            ValidationError::required("material_code")
        );
        assert!(validate_code("\t ").is_err());
        assert!(validate_code(&"A".repeat(65)).is_err());
        assert!(validate_code(&"A".repeat(64)).is_ok());
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_material_name("Denim Roll").is_ok());
        assert!(validate_material_name(&"n".repeat(201)).is_err());
        assert_eq!(
            validate_supplier_name("  ").unwrap_err(),
            ValidationError::required("name")
        );
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(None).unwrap(), None);
        assert_eq!(validate_email(Some("   ")).unwrap(), None);
        assert_eq!(
            validate_email(Some(" a@x.com ")).unwrap().as_deref(),
            Some("a@x.com")
        );
        // Only the '@' is required.
        assert!(validate_email(Some("@")).is_ok());

        let err = validate_email(Some("acme.example.com")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "email has invalid format: Please enter a valid email address"
        );
    }

    #[test]
    fn test_validate_optional_text() {
        assert_eq!(validate_optional_text(None), None);
        assert_eq!(validate_optional_text(Some("  ")), None);
        assert_eq!(
            validate_optional_text(Some(" 555-0100 ")).as_deref(),
            Some("555-0100")
        );
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query(None).unwrap(), None);
        assert_eq!(validate_search_query(Some(" ")).unwrap(), None);
        assert_eq!(
            validate_search_query(Some(" acme ")).unwrap().as_deref(),
            Some("acme")
        );
        assert!(validate_search_query(Some(&"q".repeat(101))).is_err());
    }

    #[test]
    fn test_validate_buy_price() {
        assert!(validate_buy_price(Money::from_cents(10_000)).is_ok());
        assert!(validate_buy_price(Money::from_cents(1_000_000)).is_ok());
        assert!(validate_buy_price(Money::from_cents(9_999)).is_err());
        assert!(validate_buy_price(Money::from_cents(-10_000)).is_err());
    }

    #[test]
    fn test_parse_material_type() {
        for t in MaterialType::ALL {
            assert_eq!(parse_material_type(t.as_str()).unwrap(), t);
        }
        assert!(parse_material_type("").is_err());
        assert!(parse_material_type("FABRIC").is_err());
    }

    #[test]
    fn test_validate_pagination() {
        let page = validate_pagination(None, None, 100, 1000).unwrap();
        assert_eq!(page, Page { limit: 100, offset: 0 });

        let page = validate_pagination(Some(10), Some(20), 100, 1000).unwrap();
        assert_eq!(page, Page { limit: 10, offset: 20 });

        assert!(validate_pagination(Some(0), None, 100, 1000).is_err());
        assert!(validate_pagination(Some(1001), None, 100, 1000).is_err());
        assert!(validate_pagination(Some(-1), None, 100, 1000).is_err());
        assert!(validate_pagination(None, Some(-5), 100, 1000).is_err());
    }

    #[test]
    fn test_ensure_supplier_deletable() {
        assert!(ensure_supplier_deletable("Acme", 0).is_ok());

        let err = ensure_supplier_deletable("Acme", 3).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SupplierInUse {
                material_count: 3,
                ..
            }
        ));
    }
}
