use std::env;
use thiserror::Error;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env` when present)
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub oidc_audience: Option<String>,
    pub bind_address: String,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let run_migrations = match lookup("RUN_MIGRATIONS") {
            None => true,
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                name: "RUN_MIGRATIONS",
                value,
            })?,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            oidc_audience: lookup("OIDC_AUDIENCE").filter(|value| !value.trim().is_empty()),
            bind_address: lookup("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_owned()),
            run_migrations,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
