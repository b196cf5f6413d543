//! Configuration for the Megaplan client.
//!
//! `ServerConfig` describes the Megaplan host a client talks to. `Config`
//! loads the server plus login or session credentials from environment
//! variables, with validation to ensure required values are present.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use url::Url;

use crate::error::MegaplanError;

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 443;

/// Transport scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP.
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// Returns the scheme as used in URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = MegaplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            other => Err(MegaplanError::invalid_config(format!(
                "scheme must be http or https, got: {:?}",
                other
            ))),
        }
    }
}

/// Structured server settings, as they appear in a config file.
///
/// `hostname` (or its alias `host`) is required; everything else is
/// optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerOptions {
    /// Megaplan hostname, e.g. `example.megaplan.ru`.
    #[serde(default, alias = "host")]
    pub hostname: Option<String>,

    /// TCP port (default 443).
    #[serde(default)]
    pub port: Option<u16>,

    /// Requested scheme. `https` is always used on port 443.
    #[serde(default)]
    pub scheme: Option<Scheme>,

    /// Basic-auth credentials as a single `user:pass` string.
    #[serde(default)]
    pub auth: Option<String>,

    /// Basic-auth user, combined with `pass` when `auth` is absent.
    #[serde(default)]
    pub user: Option<String>,

    /// Basic-auth password.
    #[serde(default)]
    pub pass: Option<String>,
}

impl ServerOptions {
    /// Creates options for a hostname.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            ..Self::default()
        }
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the scheme.
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Sets basic-auth as a `user:pass` string.
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Sets basic-auth user and password.
    pub fn with_user(mut self, user: impl Into<String>, pass: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.pass = Some(pass.into());
        self
    }
}

/// The Megaplan server a client talks to. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    hostname: String,
    port: u16,
    scheme: Scheme,
    basic_auth: Option<String>,
}

impl ServerConfig {
    /// Creates a config for a hostname on the default HTTPS port.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Config` if the hostname is empty or invalid.
    pub fn new(hostname: impl Into<String>) -> Result<Self, MegaplanError> {
        Self::from_options(ServerOptions::new(hostname))
    }

    /// Builds a config from structured options.
    ///
    /// The scheme is `https` whenever the port is 443 or `https` was
    /// requested, `http` otherwise. When no `auth` string is given, `user`
    /// and `pass` are joined as `user:pass`.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Config` if no hostname is present.
    pub fn from_options(options: ServerOptions) -> Result<Self, MegaplanError> {
        let hostname = options
            .hostname
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| MegaplanError::invalid_config("no required property `host` provided"))?;

        let port = options.port.unwrap_or(DEFAULT_PORT);
        let scheme = if port == DEFAULT_PORT || options.scheme == Some(Scheme::Https) {
            Scheme::Https
        } else {
            Scheme::Http
        };

        let basic_auth = options
            .auth
            .filter(|a| !a.is_empty())
            .or_else(|| Self::join_user_pass(options.user, options.pass));

        let config = Self {
            hostname,
            port,
            scheme,
            basic_auth,
        };
        config.base_url()?;

        Ok(config)
    }

    fn join_user_pass(user: Option<String>, pass: Option<String>) -> Option<String> {
        let joined = format!(
            "{}:{}",
            user.unwrap_or_default(),
            pass.unwrap_or_default()
        );
        let joined = joined.strip_prefix(':').unwrap_or(&joined).to_string();
        Some(joined).filter(|j| !j.is_empty())
    }

    /// The hostname.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// The TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The derived scheme.
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Basic-auth credentials, `user:pass`.
    pub fn basic_auth(&self) -> Option<&str> {
        self.basic_auth.as_deref()
    }

    /// Basic-auth credentials split into user and optional password.
    pub fn basic_auth_parts(&self) -> Option<(&str, Option<&str>)> {
        self.basic_auth.as_deref().map(|auth| match auth.split_once(':') {
            Some((user, pass)) => (user, Some(pass)),
            None => (auth, None),
        })
    }

    /// Returns `{scheme}://{hostname}:{port}/`.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Config` if the hostname does not form a URL.
    pub fn base_url(&self) -> Result<Url, MegaplanError> {
        let raw = format!("{}://{}:{}/", self.scheme, self.hostname, self.port);
        let url = Url::parse(&raw)
            .map_err(|e| MegaplanError::invalid_config(format!("invalid hostname: {}", e)))?;
        if url.host_str().is_none() || url.path() != "/" {
            return Err(MegaplanError::invalid_config(
                "hostname must be a bare host name",
            ));
        }
        Ok(url)
    }

    /// Returns the full URL for an already-resolved API path.
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Config` if the path does not join onto the
    /// base URL.
    pub fn url_for(&self, uri: &str) -> Result<Url, MegaplanError> {
        self.base_url()?
            .join(uri.trim_start_matches('/'))
            .map_err(|e| MegaplanError::invalid_config(format!("invalid request path: {}", e)))
    }
}

impl FromStr for ServerConfig {
    type Err = MegaplanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// How the demo binary obtains credentials.
#[derive(Clone)]
pub enum Login {
    /// Log in with a user name and password.
    Password {
        /// Megaplan login.
        login: String,
        /// Plain password; hashed before it is sent.
        password: String,
    },
    /// Resume a session with an existing credential pair.
    Session {
        /// Access id issued at login.
        access_id: String,
        /// Secret key issued at login. Never log this value.
        secret_key: String,
    },
}

impl fmt::Debug for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Login::Password { login, .. } => f
                .debug_struct("Password")
                .field("login", login)
                .finish_non_exhaustive(),
            Login::Session { access_id, .. } => f
                .debug_struct("Session")
                .field("access_id", access_id)
                .finish_non_exhaustive(),
        }
    }
}

/// Environment configuration for the demo binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server to talk to.
    pub server: ServerConfig,

    /// Credentials source.
    pub login: Login,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MEGAPLAN_HOST` (required): Megaplan hostname
    /// - `MEGAPLAN_PORT`, `MEGAPLAN_SCHEME`, `MEGAPLAN_BASIC_AUTH` (optional)
    /// - `MEGAPLAN_ACCESS_ID` + `MEGAPLAN_SECRET_KEY` to resume a session, or
    /// - `MEGAPLAN_LOGIN` + `MEGAPLAN_PASSWORD` to log in
    ///
    /// # Errors
    ///
    /// Returns `MegaplanError::Config` if a required variable is missing
    /// or a value fails validation.
    pub fn from_env() -> Result<Self, MegaplanError> {
        let mut options = ServerOptions::new(Self::get_required_env("MEGAPLAN_HOST")?);

        if let Some(port) = Self::get_optional_env("MEGAPLAN_PORT") {
            let port = port.parse::<u16>().map_err(|_| {
                MegaplanError::invalid_config("MEGAPLAN_PORT must be a port number")
            })?;
            options = options.with_port(port);
        }
        if let Some(scheme) = Self::get_optional_env("MEGAPLAN_SCHEME") {
            options = options.with_scheme(scheme.parse()?);
        }
        if let Some(auth) = Self::get_optional_env("MEGAPLAN_BASIC_AUTH") {
            options = options.with_auth(auth);
        }

        let server = ServerConfig::from_options(options)?;

        let login = match (
            Self::get_optional_env("MEGAPLAN_ACCESS_ID"),
            Self::get_optional_env("MEGAPLAN_SECRET_KEY"),
        ) {
            (Some(access_id), Some(secret_key)) => Login::Session {
                access_id,
                secret_key,
            },
            _ => {
                let login = Self::get_required_env("MEGAPLAN_LOGIN")?;
                let password = Self::get_required_env("MEGAPLAN_PASSWORD")?;
                Self::validate_password(&password)?;
                Login::Password { login, password }
            }
        };

        Ok(Config { server, login })
    }

    /// Gets a required environment variable, returning an error if missing or empty.
    fn get_required_env(name: &str) -> Result<String, MegaplanError> {
        Self::get_optional_env(name).ok_or_else(|| MegaplanError::missing_env(name))
    }

    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Validates the password is not a placeholder value.
    fn validate_password(password: &str) -> Result<(), MegaplanError> {
        let lower = password.to_lowercase();
        let placeholder_patterns = ["your_password", "placeholder", "changeme", "xxx"];

        for pattern in placeholder_patterns {
            if lower.contains(pattern) {
                return Err(MegaplanError::invalid_config(
                    "MEGAPLAN_PASSWORD appears to be a placeholder value",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_defaults_to_https_443() {
        let server = ServerConfig::new("example.megaplan.ru").unwrap();
        assert_eq!(server.hostname(), "example.megaplan.ru");
        assert_eq!(server.port(), 443);
        assert_eq!(server.scheme(), Scheme::Https);
        assert_eq!(server.basic_auth(), None);
    }

    #[test]
    fn test_non_443_port_is_http_unless_requested() {
        let server =
            ServerConfig::from_options(ServerOptions::new("localhost").with_port(8080)).unwrap();
        assert_eq!(server.scheme(), Scheme::Http);

        let server = ServerConfig::from_options(
            ServerOptions::new("localhost")
                .with_port(8443)
                .with_scheme(Scheme::Https),
        )
        .unwrap();
        assert_eq!(server.scheme(), Scheme::Https);
    }

    #[test]
    fn test_port_443_forces_https() {
        let server = ServerConfig::from_options(
            ServerOptions::new("example.megaplan.ru").with_scheme(Scheme::Http),
        )
        .unwrap();
        assert_eq!(server.scheme(), Scheme::Https);
    }

    #[test]
    fn test_missing_hostname_is_config_error() {
        let err = ServerConfig::from_options(ServerOptions::default()).unwrap_err();
        assert!(matches!(err, MegaplanError::Config(_)));
        assert!(ServerConfig::new("   ").is_err());
    }

    #[test]
    fn test_host_alias_in_structured_config() {
        let options: ServerOptions =
            serde_json::from_str(r#"{"host": "a.megaplan.ru", "port": 8080, "scheme": "http"}"#)
                .unwrap();
        let server = ServerConfig::from_options(options).unwrap();
        assert_eq!(server.hostname(), "a.megaplan.ru");
        assert_eq!(server.port(), 8080);
        assert_eq!(server.scheme(), Scheme::Http);
    }

    #[test]
    fn test_basic_auth_from_user_and_pass() {
        let server = ServerConfig::from_options(
            ServerOptions::new("example.megaplan.ru").with_user("bob", "secret"),
        )
        .unwrap();
        assert_eq!(server.basic_auth(), Some("bob:secret"));
        assert_eq!(server.basic_auth_parts(), Some(("bob", Some("secret"))));
    }

    #[test]
    fn test_basic_auth_prefers_explicit_string() {
        let server = ServerConfig::from_options(
            ServerOptions::new("example.megaplan.ru")
                .with_auth("alice:pw")
                .with_user("bob", "secret"),
        )
        .unwrap();
        assert_eq!(server.basic_auth(), Some("alice:pw"));
    }

    #[test]
    fn test_basic_auth_password_only_drops_colon() {
        let options = ServerOptions {
            pass: Some("pw".to_string()),
            ..ServerOptions::new("example.megaplan.ru")
        };
        let server = ServerConfig::from_options(options).unwrap();
        assert_eq!(server.basic_auth(), Some("pw"));
    }

    #[test]
    fn test_url_for_resolved_path() {
        let server =
            ServerConfig::from_options(ServerOptions::new("127.0.0.1").with_port(9000)).unwrap();
        let url = server.url_for("BumsTaskApiV01/Task/list.api").unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/BumsTaskApiV01/Task/list.api"
        );
    }

    #[test]
    fn test_hostname_with_path_is_rejected() {
        assert!(ServerConfig::new("example.megaplan.ru/api").is_err());
    }

    #[test]
    fn test_validate_password_rejects_placeholder() {
        assert!(Config::validate_password("changeme").is_err());
        assert!(Config::validate_password("s0me-Real-pass").is_ok());
    }

    #[test]
    fn test_login_debug_hides_secrets() {
        let login = Login::Session {
            access_id: "abc".to_string(),
            secret_key: "very-secret".to_string(),
        };
        let rendered = format!("{:?}", login);
        assert!(rendered.contains("abc"));
        assert!(!rendered.contains("very-secret"));
    }
}
