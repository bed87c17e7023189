//! Store configuration
//!
//! Development mode turns on the checks that cost time on every dispatch
//! (slow reducer warnings, unexpected-key warnings in combined state, the
//! serializable check). Production mode turns them off.
//!
//! # Example
//!
//! ```no_run
//! use rudux_runtime::StoreConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // RUDUX_ENV=production RUDUX_WARN_AFTER_MS=50
//! let config = StoreConfig::from_env()?;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;
use thiserror::Error;

/// Variable naming the environment (`development` or `production`)
pub const ENV_VAR: &str = "RUDUX_ENV";

/// Variable overriding [`StoreConfig::warn_after`], in milliseconds
pub const WARN_AFTER_VAR: &str = "RUDUX_WARN_AFTER_MS";

const DEFAULT_WARN_AFTER: Duration = Duration::from_millis(32);

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown environment name
    #[error("Invalid environment: {0}")]
    InvalidEnvironment(String),

    /// A numeric variable could not be parsed
    #[error("Invalid value for {var}: {value:?}")]
    InvalidNumber {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Development checks enabled
    Development,
    /// Development checks disabled
    Production,
}

impl Environment {
    /// Parse an environment name
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvironment`] for anything other than
    /// `dev`, `development`, `prod` or `production` (case-insensitive).
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }

    /// Check if this is the production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if this is the development environment
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl Default for Environment {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Development
        } else {
            Self::Production
        }
    }
}

/// Configuration for a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Environment the store runs in
    pub environment: Environment,
    /// Run development checks (defaults to `environment.is_development()`)
    pub dev_checks: bool,
    /// Reducers and checks slower than this log a warning
    pub warn_after: Duration,
}

impl StoreConfig {
    /// Configuration for an environment, with its default checks
    #[must_use]
    pub const fn new(environment: Environment) -> Self {
        Self {
            environment,
            dev_checks: environment.is_development(),
            warn_after: DEFAULT_WARN_AFTER,
        }
    }

    /// Development configuration
    #[must_use]
    pub const fn development() -> Self {
        Self::new(Environment::Development)
    }

    /// Production configuration
    #[must_use]
    pub const fn production() -> Self {
        Self::new(Environment::Production)
    }

    /// Enable or disable development checks
    #[must_use]
    pub const fn with_dev_checks(mut self, enabled: bool) -> Self {
        self.dev_checks = enabled;
        self
    }

    /// Set the slow-reducer warning threshold
    #[must_use]
    pub const fn with_warn_after(mut self, threshold: Duration) -> Self {
        self.warn_after = threshold;
        self
    }

    /// Load configuration from `RUDUX_ENV` and `RUDUX_WARN_AFTER_MS`
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup(ENV_VAR) {
            Some(name) => Environment::parse(&name)?,
            None => Environment::default(),
        };

        let mut config = Self::new(environment);

        if let Some(raw) = lookup(WARN_AFTER_VAR) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber {
                    var: WARN_AFTER_VAR,
                    value: raw.clone(),
                })?;
            config.warn_after = Duration::from_millis(millis);
        }

        Ok(config)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(Environment::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::parse("dev").unwrap(), Environment::Development);
        assert_eq!(Environment::parse("PRODUCTION").unwrap(), Environment::Production);
        assert!(matches!(
            Environment::parse("staging"),
            Err(ConfigError::InvalidEnvironment(_))
        ));
    }

    #[test]
    fn test_production_disables_checks() {
        let config = StoreConfig::production();
        assert!(!config.dev_checks);
        assert!(StoreConfig::development().dev_checks);
        assert!(StoreConfig::production().with_dev_checks(true).dev_checks);
    }

    #[test]
    fn test_from_lookup() {
        let config =
            StoreConfig::from_lookup(lookup(&[("RUDUX_ENV", "prod"), ("RUDUX_WARN_AFTER_MS", "50")]))
                .unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert!(!config.dev_checks);
        assert_eq!(config.warn_after, Duration::from_millis(50));

        let defaults = StoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(defaults, StoreConfig::default());
    }

    #[test]
    fn test_from_lookup_rejects_bad_numbers() {
        let err = StoreConfig::from_lookup(lookup(&[("RUDUX_WARN_AFTER_MS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: WARN_AFTER_VAR,
                value: "soon".to_string()
            }
        );
    }
}
