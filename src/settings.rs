// src/settings.rs
//! Process-environment resolution
//!
//! Every deployment knob arrives as an environment variable; nothing
//! here reads config files.

use std::env;
use std::fmt;

use crate::codec;
use crate::consts::DEFAULT_ENVIRONMENT;
use crate::error::{Error, Result};

pub const ENV_ENVIRONMENT: &str = "NODE_ENV";
pub const ENV_MASTER_KEY: &str = "CONFIG_MASTER_KEY";
pub const ENV_ADDITIONAL_KEY: &str = "CONFIG_ADDITIONAL_KEY";
pub const ENV_AUX_KEY: &str = "ENCRYPTION_ENV_KEY";
pub const ENV_DEFAULT_DB: &str = "DB_NAME";

/// Deployment environment name ("development" when unset).
pub fn environment() -> String {
    env::var(ENV_ENVIRONMENT).unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

/// Logical key used by single-database deployments.
pub fn default_db_key() -> Option<String> {
    env::var(ENV_DEFAULT_DB).ok()
}

/// The two secrets combined into the file-encryption master key.
#[derive(Clone)]
pub struct Secrets {
    master: String,
    additional: String,
}

impl Secrets {
    pub fn new(master: impl Into<String>, additional: impl Into<String>) -> Self {
        Self {
            master: master.into(),
            additional: additional.into(),
        }
    }

    /// Errors name the missing variable, never echo a value.
    pub fn from_env() -> Result<Self> {
        let master = env::var(ENV_MASTER_KEY).map_err(|_| Error::MissingEnv(ENV_MASTER_KEY))?;
        let additional =
            env::var(ENV_ADDITIONAL_KEY).map_err(|_| Error::MissingEnv(ENV_ADDITIONAL_KEY))?;
        Ok(Self::new(master, additional))
    }

    /// Hex SHA-256 digest handed to the cipher as the master key.
    pub fn combined_key(&self) -> String {
        codec::combined_key(&self.master, &self.additional)
    }
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("master", &"[REDACTED]")
            .field("additional", &"[REDACTED]")
            .finish()
    }
}
