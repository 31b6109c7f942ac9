//! Application configuration loaded from environment variables.
//!
//! Connection parameters (API key, project identifier) are never compiled
//! into the binary; they come from the environment or a local `.env` file.

use std::env;

/// How Firestore requests are authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsMode {
    /// Use the ID token of the signed-in (possibly anonymous) user.
    User,
    /// Use Google application default credentials (admin tooling).
    ServiceAccount,
}

impl std::str::FromStr for CredentialsMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "user" => Ok(Self::User),
            "service-account" | "service_account" => Ok(Self::ServiceAccount),
            other => Err(ConfigError::Invalid {
                name: "JOURNAL_CREDENTIALS",
                reason: format!("unknown credentials mode '{}'", other),
            }),
        }
    }
}

/// Connection configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    /// Firebase web API key (used by the auth REST endpoints)
    pub api_key: String,
    /// Firebase / GCP project ID
    pub project_id: String,
    /// Firestore emulator `host:port`, if any
    pub firestore_emulator_host: Option<String>,
    /// Auth emulator `host:port`, if any
    pub auth_emulator_host: Option<String>,
    /// How Firestore requests are authorized
    pub credentials: CredentialsMode,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("firestore_emulator_host", &self.firestore_emulator_host)
            .field("auth_emulator_host", &self.auth_emulator_host)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let config = Self {
            api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            project_id: env::var("FIREBASE_PROJECT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_PROJECT_ID"))?,
            firestore_emulator_host: non_empty_var("FIRESTORE_EMULATOR_HOST"),
            auth_emulator_host: non_empty_var("FIREBASE_AUTH_EMULATOR_HOST"),
            credentials: env::var("JOURNAL_CREDENTIALS")
                .unwrap_or_default()
                .parse()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Check that the required connection parameters are present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("FIREBASE_API_KEY"));
        }
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::Missing("FIREBASE_PROJECT_ID"));
        }
        Ok(())
    }

    /// Whether Firestore calls go to a local emulator.
    pub fn uses_firestore_emulator(&self) -> bool {
        self.firestore_emulator_host.is_some()
    }

    /// Config for tests only (points at local emulators).
    pub fn test_default() -> Self {
        Self {
            api_key: "test-api-key".to_string(),
            project_id: "test-project".to_string(),
            firestore_emulator_host: Some("localhost:8080".to_string()),
            auth_emulator_host: Some("localhost:9099".to_string()),
            credentials: CredentialsMode::User,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("FIREBASE_API_KEY", " test_key ");
        env::set_var("FIREBASE_PROJECT_ID", "journal-test");
        env::set_var("JOURNAL_CREDENTIALS", "service-account");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_key, "test_key");
        assert_eq!(config.project_id, "journal-test");
        assert_eq!(config.credentials, CredentialsMode::ServiceAccount);
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let mut config = Config::test_default();
        config.api_key = "   ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("FIREBASE_API_KEY"))
        ));

        let mut config = Config::test_default();
        config.project_id = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing("FIREBASE_PROJECT_ID"))
        ));
    }

    #[test]
    fn test_credentials_mode_parsing() {
        assert_eq!("".parse::<CredentialsMode>().unwrap(), CredentialsMode::User);
        assert_eq!(
            "Service_Account".parse::<CredentialsMode>().unwrap(),
            CredentialsMode::ServiceAccount
        );
        assert!("root".parse::<CredentialsMode>().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", Config::test_default());
        assert!(!rendered.contains("test-api-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
