// src/dbconfig.rs
//! `DatabaseConfig` — the decrypted credential record
//!
//! Field names follow the on-disk JSON (camelCase). Older provisioners
//! wrote `dbPort` as a string, so both representations deserialize.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::dialect::Dialect;
use crate::error::{Error, Result};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub db_host: String,
    #[serde(deserialize_with = "port_from_number_or_string")]
    pub db_port: u32,
    pub db_dialect: String,
}

impl DatabaseConfig {
    /// Check every invariant the registry relies on before a connection
    /// attempt: required fields present, port in range, dialect allowed.
    pub fn validate(&self) -> Result<Dialect> {
        for (field, value) in [
            ("dbName", &self.db_name),
            ("dbUser", &self.db_user),
            ("dbPassword", &self.db_password),
            ("dbHost", &self.db_host),
        ] {
            if value.is_empty() {
                return Err(Error::MissingField(field));
            }
        }
        if self.db_dialect.is_empty() {
            return Err(Error::MissingField("dbDialect"));
        }
        if self.db_port == 0 || self.db_port > 65535 {
            return Err(Error::InvalidPort(self.db_port));
        }
        self.db_dialect.parse::<Dialect>()
    }
}

// Manual Debug so a dumped config never exposes the password
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"[REDACTED]")
            .field("db_host", &self.db_host)
            .field("db_port", &self.db_port)
            .field("db_dialect", &self.db_dialect)
            .finish()
    }
}

fn port_from_number_or_string<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u32),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(n) => Ok(n),
        Port::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
