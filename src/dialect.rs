// src/dialect.rs
//! Closed set of supported relational dialects
//!
//! One table of per-dialect connection options instead of scattered
//! conditionals; supporting a new engine means adding a variant here.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::CONNECT_TIMEOUT_SECS;
use crate::error::Error;

/// Relational engines the registry will open connections to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Postgres,
    Mysql,
    Mariadb,
    Mssql,
    Db2,
}

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Postgres,
        Dialect::Mysql,
        Dialect::Mariadb,
        Dialect::Mssql,
        Dialect::Db2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
            Dialect::Mariadb => "mariadb",
            Dialect::Mssql => "mssql",
            Dialect::Db2 => "db2",
        }
    }

    /// Connection options handed to the driver for this dialect.
    pub fn connect_options(self, production: bool) -> DialectOptions {
        let base = DialectOptions {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            tls: TlsMode::Disabled,
        };
        match self {
            // TLS with certificate verification, in production only
            Dialect::Postgres if production => DialectOptions {
                tls: TlsMode::Required {
                    verify_certificate: true,
                },
                ..base
            },
            Dialect::Postgres => base,
            // encryption always on; the server certificate is only
            // verified in production
            Dialect::Mssql => DialectOptions {
                tls: TlsMode::Required {
                    verify_certificate: production,
                },
                ..base
            },
            Dialect::Mysql | Dialect::Mariadb | Dialect::Db2 => base,
        }
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Error> {
        match s {
            "postgres" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::Mysql),
            "mariadb" => Ok(Dialect::Mariadb),
            "mssql" => Ok(Dialect::Mssql),
            "db2" => Ok(Dialect::Db2),
            other => Err(Error::UnsupportedDialect(other.to_string())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TLS requirement a driver must honor when opening a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    Disabled,
    Required { verify_certificate: bool },
}

/// Per-dialect options resolved before a connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectOptions {
    pub connect_timeout: Duration,
    pub tls: TlsMode,
}
