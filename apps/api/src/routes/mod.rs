//! HTTP routes, one module per resource.

pub mod health;
pub mod materials;
pub mod suppliers;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use matreg_core::ValidationError;

/// ISO-8601 rendering used for `create_date` / `write_date`.
pub(crate) fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Reads a record id sent either as a JSON string or a JSON number.
pub(crate) fn parse_reference(
    field: &str,
    value: Option<Value>,
) -> Result<Option<String>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a string or a number".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_iso_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(iso_timestamp(&at), "2024-03-01T09:30:00Z");
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("x", Some(json!("abc"))).unwrap().as_deref(), Some("abc"));
        assert_eq!(parse_reference("x", Some(json!(7))).unwrap().as_deref(), Some("7"));
        assert_eq!(parse_reference("x", Some(json!(null))).unwrap(), None);
        assert!(parse_reference("x", Some(json!({}))).is_err());
    }
}
