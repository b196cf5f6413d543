//! Common types shared across Megaplan models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::utils;

/// A reference to another entity by id and name.
///
/// Megaplan embeds these for owners, responsibles, parent tasks and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Entity id; Megaplan sends it as a number or a string.
    #[serde(default, deserialize_with = "deserialize_optional_string_or_int")]
    pub id: Option<String>,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedEntity {
    /// Returns the name if present, otherwise a placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

/// The credential pair issued by the authorization endpoint.
///
/// The secret key signs every later request. It is omitted from `Debug`
/// output.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Public half of the pair, sent with every signed request.
    pub access_id: String,

    /// HMAC key. Never log this value.
    pub secret_key: String,

    /// The authenticated user.
    #[serde(default, deserialize_with = "deserialize_optional_string_or_int")]
    pub user_id: Option<String>,

    /// The employee record of the authenticated user.
    #[serde(default, deserialize_with = "deserialize_optional_string_or_int")]
    pub employee_id: Option<String>,
}

impl Credentials {
    /// Creates a credential pair without user information.
    pub fn new(access_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_id: access_id.into(),
            secret_key: secret_key.into(),
            user_id: None,
            employee_id: None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_id", &self.access_id)
            .field("user_id", &self.user_id)
            .field("employee_id", &self.employee_id)
            .finish_non_exhaustive()
    }
}

/// Deserializes an id that can be either a string or an integer.
pub(crate) fn deserialize_string_or_int<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(StringOrIntVisitor)
}

/// Deserializes an optional id that can be null, a string or an integer.
pub(crate) fn deserialize_optional_string_or_int<'de, D>(
    deserializer: D,
) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_option(OptionalStringOrIntVisitor)
}

/// Deserializes a timestamp that Megaplan may send in an unusable form.
///
/// Anything that is not a parseable date string (`0000-00-00 00:00:00`,
/// numbers, objects) yields `None`.
pub(crate) fn deserialize_lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => utils::parse_temporal(&s),
        _ => None,
    })
}

struct StringOrIntVisitor;

impl<'de> serde::de::Visitor<'de> for StringOrIntVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string or an integer")
    }

    fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(value)
    }

    fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }
}

struct OptionalStringOrIntVisitor;

impl<'de> serde::de::Visitor<'de> for OptionalStringOrIntVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("null, a string, or an integer")
    }

    fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(StringOrIntVisitor).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_entity_accepts_numeric_id() {
        let entity: NamedEntity =
            serde_json::from_value(json!({"id": 1000002, "name": "Ivan"})).unwrap();
        assert_eq!(entity.id.as_deref(), Some("1000002"));
        assert_eq!(entity.display_name(), "Ivan");
    }

    #[test]
    fn test_named_entity_accepts_null_id() {
        let entity: NamedEntity = serde_json::from_value(json!({"id": null})).unwrap();
        assert_eq!(entity.id, None);
        assert_eq!(entity.display_name(), "Unknown");
    }

    #[test]
    fn test_credentials_from_auth_payload() {
        let creds: Credentials = serde_json::from_value(json!({
            "access_id": "a1",
            "secret_key": "s1",
            "user_id": 1000001,
            "employee_id": "1000005"
        }))
        .unwrap();
        assert_eq!(creds.access_id, "a1");
        assert_eq!(creds.user_id.as_deref(), Some("1000001"));
        assert_eq!(creds.employee_id.as_deref(), Some("1000005"));
    }

    #[derive(Debug, Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_lenient_timestamp() {
        let parse = |v: Value| serde_json::from_value::<Stamped>(v).unwrap().at;
        assert_eq!(
            parse(json!({"at": "2020-01-01T00:00:00"})).map(|t| t.to_rfc3339()),
            Some("2020-01-01T00:00:00+00:00".to_string())
        );
        assert_eq!(parse(json!({"at": "0000-00-00 00:00:00"})), None);
        assert_eq!(parse(json!({"at": 1577836800})), None);
        assert_eq!(parse(json!({"at": null})), None);
        assert_eq!(parse(json!({})), None);
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = Credentials::new("a1", "top-secret");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("a1"));
        assert!(!rendered.contains("top-secret"));
    }
}
