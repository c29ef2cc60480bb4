use std::env;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub bind_address: String,
    pub seed_items: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let required = |name| lookup(name).ok_or(ConfigError::Missing(name));

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| "ecommerce".to_string()),
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours: parse_or(&lookup, "JWT_TTL_HOURS", 1)?,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            seed_items: parse_or(&lookup, "SEED_ITEMS", true)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Option<String> {
        let vars: HashMap<&'static str, String> =
            vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://localhost:27017"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.database_name, "ecommerce");
        assert_eq!(config.jwt_ttl_hours, 1);
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert!(config.seed_items);
    }

    #[test]
    fn missing_secret_is_reported_by_name() {
        let result = Config::from_lookup(lookup_from(&[("DATABASE_URL", "mongodb://db")]));

        assert!(matches!(result, Err(ConfigError::Missing("JWT_SECRET"))));
    }

    #[test]
    fn invalid_ttl_is_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://db"),
            ("JWT_SECRET", "secret"),
            ("JWT_TTL_HOURS", "soon"),
        ]));

        assert!(matches!(
            result,
            Err(ConfigError::Invalid { name: "JWT_TTL_HOURS", .. })
        ));
    }

    #[test]
    fn seed_flag_can_be_disabled() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://db"),
            ("JWT_SECRET", "secret"),
            ("SEED_ITEMS", "false"),
        ]))
        .unwrap();

        assert!(!config.seed_items);
    }
}
