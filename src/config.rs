//! Configuration for the SysAid client.
//!
//! This module handles credential and connection configuration, either
//! built explicitly or loaded from environment variables, with validation
//! to ensure all required values are present.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::error::SysaidError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for connecting to a SysAid tenant.
///
/// Credentials are immutable after construction and are never persisted
/// to disk. The password must never be logged or exposed in error
/// messages.
#[derive(Clone)]
pub struct Config {
    /// Account username. Also keys the on-disk cookie file.
    pub username: String,

    /// Account password.
    /// SECURITY: Never log this value!
    pub(crate) password: String,

    /// Fully resolved API base URL, always ending in `/api/v1/`.
    pub base_url: String,

    /// Directory holding the cookie file. Defaults to the working directory.
    pub cookie_dir: PathBuf,

    /// Cookie file name override. Defaults to `<username>_cookies.json`.
    pub cookie_file: Option<String>,

    /// Request timeout for every HTTP call.
    pub timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("base_url", &self.base_url)
            .field("cookie_dir", &self.cookie_dir)
            .field("cookie_file", &self.cookie_file)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Creates a configuration for a hosted SysAid environment.
    ///
    /// The environment name is the tenant subdomain: `acme` resolves to
    /// `https://acme.sysaidit.com/api/v1/`.
    ///
    /// # Errors
    ///
    /// Returns `SysaidError::Config` if any field is empty or the
    /// environment name contains characters that are not valid in a
    /// subdomain.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        environment: &str,
    ) -> Result<Self, SysaidError> {
        let environment = environment.trim();
        Self::validate_environment(environment)?;
        let base_url = format!("https://{}.sysaidit.com/api/v1/", environment);
        Self::build(username.into(), password.into(), base_url)
    }

    /// Creates a configuration for a self-hosted or test instance.
    ///
    /// The URL must carry an `http://` or `https://` scheme; the `/api/v1/`
    /// path is appended automatically.
    ///
    /// # Errors
    ///
    /// Returns `SysaidError::Config` if any field is empty or the URL does
    /// not parse.
    pub fn with_base_url(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, SysaidError> {
        let base_url = Self::validate_base_url(base_url)?;
        Self::build(username.into(), password.into(), base_url)
    }

    /// Loads configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Environment Variables
    ///
    /// - `SYSAID_USERNAME`: account username (required)
    /// - `SYSAID_PASSWORD`: account password (required)
    /// - `SYSAID_ENVIRONMENT`: tenant subdomain, or
    /// - `SYSAID_BASE_URL`: explicit instance URL
    ///
    /// Exactly one of `SYSAID_ENVIRONMENT` and `SYSAID_BASE_URL` must be
    /// set.
    ///
    /// # Errors
    ///
    /// Returns `SysaidError::Config` if a required variable is missing or
    /// a value fails validation.
    pub fn from_env() -> Result<Self, SysaidError> {
        dotenvy::dotenv().ok();

        let username = Self::get_required_env("SYSAID_USERNAME")?;
        let password = Self::get_required_env("SYSAID_PASSWORD")?;

        let environment = Self::get_optional_env("SYSAID_ENVIRONMENT");
        let base_url = Self::get_optional_env("SYSAID_BASE_URL");

        match (environment, base_url) {
            (Some(env_name), None) => Self::new(username, password, &env_name),
            (None, Some(url)) => Self::with_base_url(username, password, &url),
            (Some(_), Some(_)) => Err(SysaidError::config(
                "set either SYSAID_ENVIRONMENT or SYSAID_BASE_URL, not both",
            )),
            (None, None) => Err(SysaidError::config(
                "set SYSAID_ENVIRONMENT or SYSAID_BASE_URL",
            )),
        }
    }

    /// Sets the directory the cookie file is written to.
    #[must_use]
    pub fn with_cookie_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cookie_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Overrides the cookie file name.
    #[must_use]
    pub fn with_cookie_file(mut self, name: impl Into<String>) -> Self {
        self.cookie_file = Some(name.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the path of the per-username cookie file.
    pub fn cookie_path(&self) -> PathBuf {
        let file_name = match &self.cookie_file {
            Some(name) => name.clone(),
            None => format!("{}_cookies.json", self.username),
        };
        self.cookie_dir.join(file_name)
    }

    /// Returns the account password.
    ///
    /// This should ONLY be used for the login payload and for sanitizing
    /// error messages, never for logging.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }

    fn build(username: String, password: String, base_url: String) -> Result<Self, SysaidError> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(SysaidError::config("username must not be empty"));
        }
        if password.is_empty() {
            return Err(SysaidError::config("password must not be empty"));
        }

        Ok(Config {
            username,
            password,
            base_url,
            cookie_dir: PathBuf::from("."),
            cookie_file: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Gets a required environment variable, erroring if missing or empty.
    fn get_required_env(name: &str) -> Result<String, SysaidError> {
        env::var(name)
            .map_err(|_| SysaidError::missing_env(name))
            .and_then(|value| {
                if value.trim().is_empty() {
                    Err(SysaidError::missing_env(name))
                } else {
                    Ok(value)
                }
            })
    }

    /// Gets an optional environment variable, treating empty as unset.
    fn get_optional_env(name: &str) -> Option<String> {
        env::var(name).ok().filter(|v| !v.trim().is_empty())
    }

    /// Validates the environment name is usable as a tenant subdomain.
    fn validate_environment(environment: &str) -> Result<(), SysaidError> {
        if environment.is_empty() {
            return Err(SysaidError::config("environment must not be empty"));
        }
        if !environment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        {
            return Err(SysaidError::config(format!(
                "environment must be a valid subdomain label, got: {:?}",
                environment.chars().take(50).collect::<String>()
            )));
        }
        Ok(())
    }

    /// Validates and normalizes an explicit base URL.
    fn validate_base_url(url: &str) -> Result<String, SysaidError> {
        let url = url.trim().trim_end_matches('/');
        if url.is_empty() {
            return Err(SysaidError::config("base_url must not be empty"));
        }

        let parsed = Url::parse(url)
            .map_err(|e| SysaidError::config(format!("base_url does not parse: {}", e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(SysaidError::config(
                "base_url must start with http:// or https://",
            ));
        }

        Ok(format!("{}/api/v1/", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: from_env reads process-global state, so these tests exercise
    // the constructors and validation helpers instead of the environment.

    #[test]
    fn test_new_builds_tenant_url() {
        let config = Config::new("alice", "secret", "acme").unwrap();
        assert_eq!(config.base_url, "https://acme.sysaidit.com/api/v1/");
        assert_eq!(config.username, "alice");
    }

    #[test]
    fn test_new_trims_environment() {
        let config = Config::new("alice", "secret", " acme ").unwrap();
        assert_eq!(config.base_url, "https://acme.sysaidit.com/api/v1/");
    }

    #[test]
    fn test_new_rejects_empty_username() {
        assert!(Config::new("  ", "secret", "acme").is_err());
    }

    #[test]
    fn test_new_rejects_empty_password() {
        assert!(Config::new("alice", "", "acme").is_err());
    }

    #[test]
    fn test_new_rejects_bad_environment() {
        assert!(Config::new("alice", "secret", "").is_err());
        assert!(Config::new("alice", "secret", "acme.evil.com/x").is_err());
        assert!(Config::new("alice", "secret", "a b").is_err());
    }

    #[test]
    fn test_with_base_url_appends_api_path() {
        let config =
            Config::with_base_url("alice", "secret", "https://helpdesk.example.com/").unwrap();
        assert_eq!(config.base_url, "https://helpdesk.example.com/api/v1/");
    }

    #[test]
    fn test_with_base_url_requires_scheme() {
        assert!(Config::with_base_url("alice", "secret", "helpdesk.example.com").is_err());
        assert!(Config::with_base_url("alice", "secret", "ftp://example.com").is_err());
    }

    #[test]
    fn test_cookie_path_defaults_to_username_file() {
        let config = Config::new("alice", "secret", "acme").unwrap();
        assert_eq!(config.cookie_path(), PathBuf::from("./alice_cookies.json"));
    }

    #[test]
    fn test_cookie_path_overrides() {
        let config = Config::new("alice", "secret", "acme")
            .unwrap()
            .with_cookie_dir("/var/cache/sysaid")
            .with_cookie_file("shared.json");
        assert_eq!(
            config.cookie_path(),
            PathBuf::from("/var/cache/sysaid/shared.json")
        );
    }

    #[test]
    fn test_debug_does_not_expose_password() {
        let config = Config::new("alice", "hunter2hunter2", "acme").unwrap();
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("hunter2hunter2"));
    }
}
