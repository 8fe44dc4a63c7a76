use std::env;
use std::fmt;

use thiserror::Error;

use crate::auth::password::{MAX_COST, MIN_COST};
use crate::auth::token::{DEFAULT_TTL_SECS, MIN_SECRET_LEN};

const DEFAULT_BCRYPT_COST: u32 = 12;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("JWT_SECRET must be at least {} bytes, got {0}", MIN_SECRET_LEN)]
    WeakSecret(usize),
}

pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub token_ttl_secs: u64,
    pub bcrypt_cost: u32,
    pub cors_origins: Vec<String>,
    pub database_max_connections: u32,
}

impl Config {
    /// Reads the configuration from the process environment (after `.env` has been
    /// loaded by the caller).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret(jwt_secret.len()));
        }

        let server_port = parse_or(get("SERVER_PORT"), "SERVER_PORT", 8080, "must be a port number")?;
        let token_ttl_secs = parse_or(
            get("JWT_ACCESS_TOKEN_EXPIRES"),
            "JWT_ACCESS_TOKEN_EXPIRES",
            DEFAULT_TTL_SECS,
            "must be a whole number of seconds",
        )?;
        let bcrypt_cost = parse_or(
            get("BCRYPT_COST"),
            "BCRYPT_COST",
            DEFAULT_BCRYPT_COST,
            "must be a number",
        )?;
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
                reason: "must be between 4 and 31",
            });
        }
        let database_max_connections = parse_or(
            get("DATABASE_MAX_CONNECTIONS"),
            "DATABASE_MAX_CONNECTIONS",
            5,
            "must be a number",
        )?;

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            server_port,
            server_host: get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            token_ttl_secs,
            bcrypt_cost,
            cors_origins,
            database_max_connections,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("cors_origins", &self.cors_origins)
            .field("database_max_connections", &self.database_max_connections)
            .finish_non_exhaustive()
    }
}

fn parse_or<T: std::str::FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
    reason: &'static str,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value, reason }),
    }
}
