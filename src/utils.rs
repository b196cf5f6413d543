//! Stateless helpers shared by requests and the client.
//!
//! Key-case conversion between the API's PascalCase and local snake_case,
//! temporal value coercion, null filtering, the vendor's ID offset rule,
//! URI shortcut substitution, request signing and form encoding.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use sha1::Sha1;

use crate::dicts;
use crate::error::MegaplanError;

type HmacSha1 = Hmac<Sha1>;

/// Response fields that carry dates or timestamps.
pub const TEMPORAL_KEYS: &[&str] = &[
    "time_created",
    "time_updated",
    "fire_day",
    "start_time",
    "activity",
    "appearance_day",
    "birthday",
];

/// IDs below this value are shifted up by it.
pub const ID_OFFSET: u64 = 1_000_000;

/// Converts `abc_def` to `AbcDef`.
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }

    while let Some(c) = chars.next() {
        match chars.peek() {
            Some(next) if c == '_' && next.is_ascii_alphabetic() => {
                out.push(next.to_ascii_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }

    out
}

/// Converts `AbcDef` to `abc_def`.
pub fn to_underscore(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    match out.strip_prefix('_') {
        Some(stripped) => stripped.to_string(),
        None => out,
    }
}

/// Rebuilds `value`, applying `converter` to every object key at every depth.
///
/// Arrays keep their shape; objects inside them are converted too.
/// Scalars pass through untouched.
pub fn convert_keys<F>(value: Value, converter: &F) -> Value
where
    F: Fn(&str) -> String,
{
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (converter(&key), convert_keys(value, converter)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| convert_keys(item, converter))
                .collect(),
        ),
        other => other,
    }
}

/// Converts an object with snake_case keys to one with PascalCase keys.
pub fn convert_keys_to_pascal_case(value: Value) -> Value {
    convert_keys(value, &to_pascal_case)
}

/// Converts an object with PascalCase keys to one with snake_case keys.
pub fn convert_keys_to_underscore(value: Value) -> Value {
    convert_keys(value, &to_underscore)
}

/// Parses the date formats Megaplan emits.
///
/// Timestamps without an offset are read as UTC. Fractional seconds are
/// accepted and kept.
pub fn parse_temporal(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    None
}

fn coerce_temporal(key: &str, raw: String) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    match parse_temporal(&raw) {
        Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => {
            tracing::debug!(key = key, value = %raw, "Leaving unparseable date as received");
            Value::String(raw)
        }
    }
}

/// Coerces temporal fields of a snake_case payload.
///
/// String values under a [`TEMPORAL_KEYS`] key become RFC 3339 UTC strings,
/// or null when empty. Everything else is left as received.
pub fn convert_values_to_natives(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) if TEMPORAL_KEYS.contains(&key.as_str()) => {
                            coerce_temporal(&key, s)
                        }
                        other => convert_values_to_natives(other),
                    };
                    (key, value)
                })
                .collect(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(convert_values_to_natives).collect())
        }
        other => other,
    }
}

/// Returns a map holding only the entries for which `reject` is false.
pub fn object_filter<F>(map: Map<String, Value>, reject: F) -> Map<String, Value>
where
    F: Fn(&str, &Value) -> bool,
{
    map.into_iter()
        .filter(|(key, value)| !reject(key, value))
        .collect()
}

/// Drops null entries so unset parameters never reach the wire.
pub fn drop_nulls(map: Map<String, Value>) -> Map<String, Value> {
    object_filter(map, |_, value| value.is_null())
}

/// An entity id in Megaplan's addressing scheme.
///
/// Project ids carry a `p` prefix on the wire (`p1000005`); everything else
/// is a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// A plain numeric id.
    Plain(u64),
    /// A `p`-prefixed project id.
    Project(u64),
}

impl EntityId {
    /// Returns the numeric part.
    pub fn value(&self) -> u64 {
        match self {
            EntityId::Plain(n) | EntityId::Project(n) => *n,
        }
    }

    /// Returns true for `p`-prefixed ids.
    pub fn is_project(&self) -> bool {
        matches!(self, EntityId::Project(_))
    }

    /// Applies the offset rule: values below one million are shifted up by
    /// one million. The project prefix is preserved.
    #[must_use]
    pub fn normalize(self) -> Self {
        let shift = |n: u64| if n < ID_OFFSET { n + ID_OFFSET } else { n };
        match self {
            EntityId::Plain(n) => EntityId::Plain(shift(n)),
            EntityId::Project(n) => EntityId::Project(shift(n)),
        }
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        EntityId::Plain(n)
    }
}

impl From<u32> for EntityId {
    fn from(n: u32) -> Self {
        EntityId::Plain(u64::from(n))
    }
}

impl FromStr for EntityId {
    type Err = MegaplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, project) = match s.strip_prefix('p') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        let n = digits.parse::<u64>().map_err(|_| {
            MegaplanError::validation(format!(
                "id must be a number, optionally prefixed with 'p', got: {:?}",
                s.chars().take(50).collect::<String>()
            ))
        })?;
        Ok(if project {
            EntityId::Project(n)
        } else {
            EntityId::Plain(n)
        })
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Plain(n) => write!(f, "{}", n),
            EntityId::Project(n) => write!(f, "p{}", n),
        }
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntityId::Plain(n) => serializer.serialize_u64(*n),
            EntityId::Project(_) => serializer.collect_str(self),
        }
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(EntityId::Plain(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Normalizes an optional id; `None` passes through.
pub fn normalize_id(id: Option<EntityId>) -> Option<EntityId> {
    id.map(EntityId::normalize)
}

/// Replaces the shortcut prefix of `uri` with its API path.
///
/// `::resource` prefixes are resolved first, then `:namespace` prefixes.
/// Only a leading run of lowercase letters forms the prefix; the rest of
/// the string is kept as is.
///
/// # Errors
///
/// Returns `MegaplanError::UnknownShortcut` for a prefix that is not in the
/// shortcut tables.
pub fn subst_uri(uri: &str) -> Result<String, MegaplanError> {
    let resolved = replace_prefix(uri, "::")?;
    replace_prefix(&resolved, ":")
}

fn replace_prefix(uri: &str, marker: &str) -> Result<String, MegaplanError> {
    let Some(rest) = uri.strip_prefix(marker) else {
        return Ok(uri.to_string());
    };
    let name_len = rest.bytes().take_while(u8::is_ascii_lowercase).count();
    if name_len == 0 {
        return Ok(uri.to_string());
    }

    let (prefix, tail) = uri.split_at(marker.len() + name_len);
    let path =
        dicts::shortcut(prefix).ok_or_else(|| MegaplanError::UnknownShortcut(prefix.to_string()))?;
    Ok(format!("{}{}", path, tail))
}

/// Base64 of the given bytes.
pub fn b64encode(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Hex-encoded MD5 digest, used for the login password.
pub fn md5(text: &str) -> String {
    hex::encode(Md5::digest(text.as_bytes()))
}

/// Formats a timestamp as an RFC 1123 `Date` header value.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Builds the text that gets signed: method, an empty content digest,
/// content type, date and the host-qualified URI, one per line.
pub fn canonical_text(method: &str, content_type: &str, date: &str, url: &str) -> String {
    [method, "", content_type, date, url].join("\n")
}

/// Signs `text` with `key`: base64 of the hex HMAC-SHA1 digest.
///
/// # Errors
///
/// Returns `MegaplanError::Signature` if the HMAC rejects the key.
pub fn make_signature(key: &str, text: &str) -> Result<String, MegaplanError> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| MegaplanError::Signature(e.to_string()))?;
    mac.update(text.as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());
    Ok(b64encode(digest))
}

/// Encodes a JSON object as an `application/x-www-form-urlencoded` body.
///
/// Nested objects and arrays use bracket notation (`Model[Name]`,
/// `Auditors[0]`), nulls are sent as empty values and empty containers
/// are omitted.
pub fn encode_form(data: &Value) -> String {
    let mut pairs = Vec::new();
    if let Value::Object(map) = data {
        for (key, value) in map {
            push_pairs(key.clone(), value, &mut pairs);
        }
    }
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}

fn push_pairs(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    let scalar = match value {
        Value::Object(map) => {
            for (k, v) in map {
                push_pairs(format!("{}[{}]", key, k), v, pairs);
            }
            return;
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                push_pairs(format!("{}[{}]", key, i), v, pairs);
            }
            return;
        }
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
    };
    pairs.push((key, scalar));
}
