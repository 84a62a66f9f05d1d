//! Environment-driven application settings.
//!
//! Reads go through [`mockable::Env`] so parsing is testable without
//! touching the process environment.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use mockable::Env;
use tracing::warn;

const DATABASE_URL_ENV: &str = "DATABASE_URL";
const APP_ENV_ENV: &str = "APP_ENV";

/// Address the HTTP server listens on.
pub const BIND_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 5000));

/// Deployment mode selected by `APP_ENV`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeploymentMode {
    /// `APP_ENV=production`: no `.env` loading.
    Production,
    /// Anything else, including an unset variable.
    Development,
}

impl DeploymentMode {
    /// Read the mode from `APP_ENV`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mockable::MockEnv;
    /// use range_forecast::config::DeploymentMode;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string()
    ///     .returning(|_| Some("production".to_owned()));
    /// assert_eq!(DeploymentMode::from_env(&env), DeploymentMode::Production);
    /// ```
    #[must_use]
    pub fn from_env<E: Env>(env: &E) -> Self {
        match env.string(APP_ENV_ENV) {
            Some(value) if value.trim().eq_ignore_ascii_case("production") => Self::Production,
            _ => Self::Development,
        }
    }

    /// Whether `.env` files should be loaded.
    #[must_use]
    pub const fn loads_dotenv(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Errors raised while reading settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv {
        /// Name of the missing variable.
        name: &'static str,
    },
}

/// Settings the server needs at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSettings {
    /// Connection string for the PostgreSQL store.
    pub database_url: String,
    /// Deployment mode.
    pub mode: DeploymentMode,
    /// Listen address.
    pub bind_addr: SocketAddr,
}

impl AppSettings {
    /// Build settings from the environment.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingEnv`] when `DATABASE_URL` is unset or
    /// blank.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, ConfigError> {
        let mode = DeploymentMode::from_env(env);
        let database_url = env
            .string(DATABASE_URL_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::MissingEnv {
                name: DATABASE_URL_ENV,
            })?;
        if mode == DeploymentMode::Production && database_url.contains("localhost") {
            warn!("production deployment is using a localhost database");
        }
        Ok(Self {
            database_url,
            mode,
            bind_addr: BIND_ADDR,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mockable::MockEnv;
    use rstest::rstest;

    use super::*;

    fn mock_env(vars: &[(&str, &str)]) -> MockEnv {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        env
    }

    #[rstest]
    fn reads_database_url_and_defaults_to_development() {
        let env = mock_env(&[("DATABASE_URL", "postgres://db/range")]);

        let settings = AppSettings::from_env(&env).expect("settings parse");

        assert_eq!(settings.database_url, "postgres://db/range");
        assert_eq!(settings.mode, DeploymentMode::Development);
        assert_eq!(settings.bind_addr.port(), 5000);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_database_url_is_rejected(#[case] value: &str) {
        let env = mock_env(&[("DATABASE_URL", value)]);
        assert_eq!(
            AppSettings::from_env(&env),
            Err(ConfigError::MissingEnv {
                name: "DATABASE_URL"
            })
        );
    }

    #[rstest]
    fn missing_database_url_is_rejected() {
        let env = mock_env(&[("APP_ENV", "production")]);
        assert!(AppSettings::from_env(&env).is_err());
    }

    #[rstest]
    #[case(Some("production"), DeploymentMode::Production)]
    #[case(Some("PRODUCTION"), DeploymentMode::Production)]
    #[case(Some("development"), DeploymentMode::Development)]
    #[case(Some("staging"), DeploymentMode::Development)]
    #[case(None, DeploymentMode::Development)]
    fn app_env_selects_mode(#[case] value: Option<&str>, #[case] expected: DeploymentMode) {
        let env = match value {
            Some(v) => mock_env(&[("APP_ENV", v)]),
            None => mock_env(&[]),
        };
        let mode = DeploymentMode::from_env(&env);
        assert_eq!(mode, expected);
        assert_eq!(mode.loads_dotenv(), expected == DeploymentMode::Development);
    }
}
