//! Parameter structures for Megaplan operations.
//!
//! Each operation with a fixed argument set gets a struct with named
//! optional fields and `with_*` builder methods. Unset fields are never
//! serialized, so they never reach the wire. Free-form operations accept
//! any `Serialize` value through [`to_params`].

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::dicts::SubjectType;
use crate::error::MegaplanError;
use crate::utils::{self, EntityId};

mod task;

pub use task::*;

/// A parameter mapping as sent to the API, before key conversion.
pub type Params = Map<String, Value>;

/// Serializes `value` into a parameter mapping and drops null entries.
///
/// `()` and `None` produce an empty mapping.
///
/// # Errors
///
/// Returns `MegaplanError::Validation` if the value is not a map or
/// struct, or `MegaplanError::Serialization` if serialization fails.
pub fn to_params<T: Serialize + ?Sized>(value: &T) -> Result<Params, MegaplanError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(utils::drop_nulls(map)),
        Value::Null => Ok(Params::new()),
        other => Err(MegaplanError::validation(format!(
            "parameters must be an object, got: {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Serializes an optional flag the way Megaplan expects numeric flags.
pub(crate) fn serialize_flag<S: Serializer>(
    flag: &Option<bool>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match flag {
        Some(true) => serializer.serialize_u8(1),
        Some(false) => serializer.serialize_u8(0),
        None => serializer.serialize_none(),
    }
}

/// Credentials for the authorization endpoint.
#[derive(Clone)]
pub enum AuthParams {
    /// Login and plain password. The password is MD5-hashed before it is
    /// sent.
    Password {
        /// Megaplan login.
        login: String,
        /// Plain password.
        password: String,
    },
    /// A one-time key issued by Megaplan.
    OneTimeKey(String),
}

impl AuthParams {
    /// Login with a user name and password.
    pub fn password(login: impl Into<String>, password: impl Into<String>) -> Self {
        AuthParams::Password {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Login with a one-time key.
    pub fn one_time_key(key: impl Into<String>) -> Self {
        AuthParams::OneTimeKey(key.into())
    }

    /// Builds the wire parameters.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Validation` when the login, password or key
    /// is empty.
    pub fn to_params(&self) -> Result<Params, MegaplanError> {
        let mut params = Params::new();
        match self {
            AuthParams::Password { login, password } => {
                if login.trim().is_empty() || password.is_empty() {
                    return Err(MegaplanError::validation(
                        "no login/password information provided to auth method",
                    ));
                }
                params.insert("login".to_string(), Value::String(login.clone()));
                params.insert("password".to_string(), Value::String(utils::md5(password)));
            }
            AuthParams::OneTimeKey(key) => {
                if key.trim().is_empty() {
                    return Err(MegaplanError::validation("one-time key is empty"));
                }
                params.insert("one_time_key".to_string(), Value::String(key.clone()));
            }
        }
        Ok(params)
    }

    /// The secret part, scrubbed from failure messages.
    pub(crate) fn secret(&self) -> &str {
        match self {
            AuthParams::Password { password, .. } => password,
            AuthParams::OneTimeKey(key) => key,
        }
    }
}

impl std::fmt::Debug for AuthParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthParams::Password { login, .. } => f
                .debug_struct("Password")
                .field("login", login)
                .finish_non_exhaustive(),
            AuthParams::OneTimeKey(_) => f.write_str("OneTimeKey(..)"),
        }
    }
}

/// Parameters for the history endpoints.
///
/// With a subject id the history of that subject is listed; without one,
/// the history of everything visible.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryParams {
    /// Kind of subject.
    pub subject_type: SubjectType,

    /// Subject id; normalized before sending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<EntityId>,
}

impl Default for HistoryParams {
    fn default() -> Self {
        Self::all()
    }
}

impl HistoryParams {
    /// History across all task subjects.
    pub fn all() -> Self {
        Self {
            subject_type: SubjectType::Task,
            subject_id: None,
        }
    }

    /// History of a single task.
    pub fn task(id: impl Into<EntityId>) -> Self {
        Self::subject(SubjectType::Task, id)
    }

    /// History of a single subject.
    pub fn subject(subject_type: SubjectType, id: impl Into<EntityId>) -> Self {
        Self {
            subject_type,
            subject_id: Some(id.into()),
        }
    }

    /// Returns the URI suffix: `/list.api` for one subject, `/all.api` otherwise.
    pub fn endpoint(&self) -> &'static str {
        if self.subject_id.is_some() {
            "/list.api"
        } else {
            "/all.api"
        }
    }

    /// Builds the wire parameters with the subject id normalized.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Serialization` if serialization fails.
    pub fn to_params(&self) -> Result<Params, MegaplanError> {
        let normalized = Self {
            subject_type: self.subject_type,
            subject_id: utils::normalize_id(self.subject_id),
        };
        to_params(&normalized)
    }
}

/// Parameters for listing contractors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContractorListParams {
    /// Saved filter id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_id: Option<String>,

    /// Quick-search text.
    #[serde(rename = "qs", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Maximum number of results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Results to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl ContractorListParams {
    /// Creates empty parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a saved filter.
    pub fn with_filter(mut self, filter_id: impl Into<String>) -> Self {
        self.filter_id = Some(filter_id.into());
        self
    }

    /// Searches by text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the maximum number of results.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the pagination offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_to_params_drops_nulls() {
        let params = to_params(&json!({"a": 1, "b": null})).unwrap();
        assert_eq!(Value::Object(params), json!({"a": 1}));
    }

    #[test]
    fn test_to_params_accepts_unit() {
        assert!(to_params(&()).unwrap().is_empty());
    }

    #[test]
    fn test_to_params_rejects_scalars() {
        let err = to_params(&"text").unwrap_err();
        assert!(err.to_string().contains("string"));
        assert!(to_params(&[1, 2]).is_err());
    }

    #[test]
    fn test_auth_params_hash_password() {
        let params = AuthParams::password("ivan", "password").to_params().unwrap();
        assert_eq!(
            Value::Object(params),
            json!({"login": "ivan", "password": "5f4dcc3b5aa765d61d8327deb882cf99"})
        );
    }

    #[test]
    fn test_auth_params_one_time_key() {
        let params = AuthParams::one_time_key("otk").to_params().unwrap();
        assert_eq!(Value::Object(params), json!({"one_time_key": "otk"}));
    }

    #[test]
    fn test_auth_params_require_credentials() {
        assert!(AuthParams::password("", "pw").to_params().is_err());
        assert!(AuthParams::password("ivan", "").to_params().is_err());
        assert!(AuthParams::one_time_key(" ").to_params().is_err());
    }

    #[test]
    fn test_auth_params_debug_hides_password() {
        let rendered = format!("{:?}", AuthParams::password("ivan", "hunter2"));
        assert!(rendered.contains("ivan"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_history_params_endpoint_and_normalization() {
        let all = HistoryParams::all();
        assert_eq!(all.endpoint(), "/all.api");
        assert_eq!(
            Value::Object(all.to_params().unwrap()),
            json!({"subject_type": "task"})
        );

        let one = HistoryParams::task(1u32);
        assert_eq!(one.endpoint(), "/list.api");
        assert_eq!(
            Value::Object(one.to_params().unwrap()),
            json!({"subject_type": "task", "subject_id": 1000001})
        );
    }

    #[test]
    fn test_contractor_list_params_renames_search() {
        let params = ContractorListParams::new()
            .with_search("Acme")
            .with_limit(10);
        assert_eq!(
            Value::Object(to_params(&params).unwrap()),
            json!({"qs": "Acme", "limit": 10})
        );
    }
}
