//! Configuration for the session layer
//!
//! The flash layer itself takes no configuration. The session cookie that
//! hosts flash messages is configured from the `[session]` table of
//! `config/default.toml` and `config/local.toml`, then from
//! `ACTON_SESSION__*` environment variables.
//!
//! ```toml
//! [session]
//! cookie_name = "acton_session"
//! same_site = "strict"
//! max_age_secs = 3600
//! ```

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "acton_session";

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Sources could not be read or did not match the expected shape
    #[error("Invalid session configuration: {0}")]
    Figment(#[from] figment::Error),
}

/// Session configuration for middleware
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie name for session ID
    pub cookie_name: String,
    /// Cookie path
    pub cookie_path: String,
    /// HTTP-only cookie (recommended: true)
    pub http_only: bool,
    /// Secure cookie (HTTPS only)
    pub secure: bool,
    /// SameSite policy
    pub same_site: SameSite,
    /// Session TTL in seconds
    pub max_age_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            cookie_path: "/".to_string(),
            http_only: true,
            secure: !cfg!(debug_assertions),
            same_site: SameSite::Lax,
            max_age_secs: 86400, // 24 hours
        }
    }
}

impl SessionConfig {
    /// Load configuration from files and environment
    ///
    /// # Errors
    ///
    /// Returns error if configuration cannot be loaded or parsed
    pub fn load() -> Result<Self, ConfigError> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Toml::file("config/local.toml"))
            .merge(Env::prefixed("ACTON_").split("__"));

        Self::from_figment(&figment)
    }

    /// Extract the `session` table from an existing figment
    ///
    /// # Errors
    ///
    /// Returns error if the table does not match the expected shape
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        Ok(figment.focus("session").extract()?)
    }

    /// Session lifetime as a duration
    #[must_use]
    pub fn ttl(&self) -> chrono::Duration {
        i64::try_from(self.max_age_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_else(|| chrono::Duration::hours(24))
    }
}

/// SameSite cookie policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Strict same-site policy
    Strict,
    /// Lax same-site policy (recommended)
    #[default]
    Lax,
    /// No same-site restriction (requires Secure)
    None,
}

impl SameSite {
    /// Convert to cookie attribute string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.cookie_name, SESSION_COOKIE_NAME);
        assert!(config.http_only);
        assert_eq!(config.max_age_secs, 86400);
        assert_eq!(config.ttl(), chrono::Duration::hours(24));
    }

    #[test]
    fn test_same_site_as_str() {
        assert_eq!(SameSite::Strict.as_str(), "Strict");
        assert_eq!(SameSite::Lax.as_str(), "Lax");
        assert_eq!(SameSite::None.as_str(), "None");
    }

    #[test]
    fn test_from_figment_overrides() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [session]
            cookie_name = "app_sid"
            same_site = "strict"
            max_age_secs = 60
            "#,
        ));

        let config = SessionConfig::from_figment(&figment).expect("valid config");
        assert_eq!(config.cookie_name, "app_sid");
        assert_eq!(config.same_site, SameSite::Strict);
        assert_eq!(config.ttl(), chrono::Duration::seconds(60));
        assert_eq!(config.cookie_path, "/");
    }

    #[test]
    fn test_from_empty_figment_uses_defaults() {
        let config = SessionConfig::from_figment(&Figment::new()).expect("defaults");
        assert_eq!(config.cookie_name, SESSION_COOKIE_NAME);
        assert_eq!(config.same_site, SameSite::Lax);
    }

    #[test]
    fn test_from_figment_rejects_bad_types() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [session]
            max_age_secs = "forever"
            "#,
        ));

        assert!(SessionConfig::from_figment(&figment).is_err());
    }

    #[test]
    fn test_huge_max_age_falls_back() {
        let config = SessionConfig {
            max_age_secs: u64::MAX,
            ..SessionConfig::default()
        };
        assert_eq!(config.ttl(), chrono::Duration::hours(24));
    }
}
