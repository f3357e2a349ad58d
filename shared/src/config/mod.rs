//! Environment-driven settings.
//!
//! Connection strings are kept optional here: a missing `DB_URI` only becomes
//! an error when a connection is requested, and a missing `POSTGRES_URI` only
//! when the schema initializer runs.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::{Result, ServiceError};

pub const DB_URI_VAR: &str = "DB_URI";
pub const POSTGRES_URI_VAR: &str = "POSTGRES_URI";
pub const DB_DATABASE_VAR: &str = "DB_DATABASE";
pub const DEFAULT_DATABASE: &str = "db";

pub const HOST_VAR: &str = "HOST";
pub const PORT_VAR: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection string for the target database.
    pub db_uri: Option<String>,
    /// Administrative connection string, used only during initialization.
    pub postgres_uri: Option<String>,
    /// Name of the database the initializer ensures exists.
    pub database: String,
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        Self {
            db_uri: non_empty_var(DB_URI_VAR),
            postgres_uri: non_empty_var(POSTGRES_URI_VAR),
            database: non_empty_var(DB_DATABASE_VAR)
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        }
    }

    pub fn db_uri(&self) -> Result<&str> {
        self.db_uri
            .as_deref()
            .ok_or_else(|| ServiceError::missing_setting(DB_URI_VAR))
    }

    pub fn postgres_uri(&self) -> Result<&str> {
        self.postgres_uri
            .as_deref()
            .ok_or_else(|| ServiceError::missing_setting(POSTGRES_URI_VAR))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let host = match non_empty_var(HOST_VAR) {
            Some(raw) => raw.parse::<IpAddr>().map_err(|e| {
                ServiceError::Configuration(format!("{} is not a valid address: {}", HOST_VAR, e))
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match non_empty_var(PORT_VAR) {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                ServiceError::Configuration(format!("{} is not a valid port: {}", PORT_VAR, e))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            addr: SocketAddr::new(host, port),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
