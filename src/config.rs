use std::env;

use thiserror::Error;

/// Lowest and highest cost factors accepted by bcrypt.
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Secrets and cost parameters shared by the token service and password hasher.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub bcrypt_cost: u32,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, bcrypt_cost: u32) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            bcrypt_cost,
        }
    }
}

pub struct Config {
    /// Postgres connection string. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves every setting through `lookup`, applying the same defaults as `from_env`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let bcrypt_cost = match lookup("BCRYPT_COST") {
            Some(raw) => {
                let cost: u32 = raw.parse().map_err(|_| ConfigError::Invalid {
                    name: "BCRYPT_COST",
                    reason: format!("'{}' is not a number", raw),
                })?;
                if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
                    return Err(ConfigError::Invalid {
                        name: "BCRYPT_COST",
                        reason: format!(
                            "must be between {} and {}",
                            MIN_BCRYPT_COST, MAX_BCRYPT_COST
                        ),
                    });
                }
                cost
            }
            None => bcrypt::DEFAULT_COST,
        };

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_PORT",
                reason: format!("'{}' is not a port number", raw),
            })?,
            None => 8080,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            auth: AuthConfig::new(jwt_secret, bcrypt_cost),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.server_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://test"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("BCRYPT_COST", "10"),
        ]))
        .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://test"));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.auth.bcrypt_cost, 10);
    }

    #[test]
    fn test_config_requires_secret() {
        let missing = Config::from_lookup(lookup_from(&[])).err();
        assert_eq!(missing, Some(ConfigError::Missing("JWT_SECRET")));

        let empty = Config::from_lookup(lookup_from(&[("JWT_SECRET", "")])).err();
        assert_eq!(empty, Some(ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        let bad_cost =
            Config::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("BCRYPT_COST", "2")]));
        assert!(matches!(
            bad_cost,
            Err(ConfigError::Invalid { name: "BCRYPT_COST", .. })
        ));

        let bad_port =
            Config::from_lookup(lookup_from(&[("JWT_SECRET", "x"), ("SERVER_PORT", "http")]));
        assert!(matches!(
            bad_port,
            Err(ConfigError::Invalid { name: "SERVER_PORT", .. })
        ));
    }
}
