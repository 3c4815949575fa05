// src/registry.rs
//! Connection registry — one pooled handle per logical database key
//!
//! Lifecycle per key: load + decrypt config, validate, open a pooled
//! connection, liveness-check it, cache. Concurrent cold connects for
//! the same key serialize on a per-key cell so exactly one connection
//! is ever built.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::OnceCell;

use crate::codec;
use crate::consts::{
    POOL_ACQUIRE_TIMEOUT_SECS, POOL_IDLE_TIMEOUT_SECS, POOL_MAX, POOL_MIN_IDLE,
};
use crate::crypto::ConfigCipher;
use crate::dbconfig::DatabaseConfig;
use crate::dialect::DialectOptions;
use crate::error::{Error, Result};
use crate::settings::{self, Secrets};

/// Pool bounds passed to the driver when a connection is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_size: u32,
    pub min_idle: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_size: POOL_MAX,
            min_idle: POOL_MIN_IDLE,
            acquire_timeout: Duration::from_secs(POOL_ACQUIRE_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(POOL_IDLE_TIMEOUT_SECS),
        }
    }
}

/// Transaction isolation levels exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IsolationLevel {
    ReadUncommitted,
    #[default]
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

/// Caller-supplied transaction overrides, merged over the defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionOptions {
    pub isolation: Option<IsolationLevel>,
}

impl TransactionOptions {
    /// Effective isolation level: read-committed unless overridden.
    pub fn effective_isolation(&self) -> IsolationLevel {
        self.isolation.unwrap_or_default()
    }
}

/// Everything a driver needs besides the credentials themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    pub dialect: DialectOptions,
    pub pool: PoolOptions,
}

/// Seam to the actual database driver / ORM layer.
///
/// The registry owns the lifecycle (open → ping → cache → close); the
/// driver owns pooling and query execution. A `Handle` is a cheap clone
/// of a shared pool. Drivers are expected to report executed statements
/// through [`logging::log_query`](crate::logging::log_query).
pub trait Connector: Send + Sync {
    type Handle: Clone + Send + Sync;
    type Transaction;

    fn open(&self, config: &DatabaseConfig, options: &ConnectOptions) -> Result<Self::Handle>;

    /// Liveness check run once, right after `open`.
    fn ping(&self, handle: &Self::Handle) -> Result<()>;

    fn begin(&self, handle: &Self::Handle, isolation: IsolationLevel)
        -> Result<Self::Transaction>;

    fn close(&self, handle: Self::Handle) -> Result<()>;
}

struct Entry<H> {
    handle: H,
    config: DatabaseConfig,
}

/// Process-scoped cache of pooled connections, one per logical key.
///
/// Constructed once at application bootstrap and passed by reference to
/// consumers — there is no implicit global instance.
pub struct ConnectionRegistry<C: Connector> {
    connector: C,
    cipher: ConfigCipher,
    root: PathBuf,
    environment: String,
    master_key: String,
    entries: Mutex<HashMap<String, Arc<OnceCell<Entry<C::Handle>>>>>,
}

impl<C: Connector> ConnectionRegistry<C> {
    pub fn new(
        connector: C,
        cipher: ConfigCipher,
        root: impl Into<PathBuf>,
        environment: impl Into<String>,
        master_key: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            cipher,
            root: root.into(),
            environment: environment.into(),
            master_key: master_key.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the environment name, secrets, and auxiliary key from the
    /// process environment (`NODE_ENV`, `CONFIG_MASTER_KEY`,
    /// `CONFIG_ADDITIONAL_KEY`, `ENCRYPTION_ENV_KEY`).
    pub fn from_env(connector: C, root: impl Into<PathBuf>) -> Result<Self> {
        let secrets = Secrets::from_env()?;
        Ok(Self::new(
            connector,
            ConfigCipher::from_env(),
            root,
            settings::environment(),
            secrets.combined_key(),
        ))
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Return the pooled handle for `db_key`, establishing it on first use.
    ///
    /// A cached key returns its handle without touching the driver.
    /// Concurrent calls for the same cold key serialize on a per-key cell:
    /// exactly one connection is opened and every caller receives it. A
    /// failed attempt leaves the cell empty so the next call retries.
    pub fn connect(&self, db_key: &str) -> Result<C::Handle> {
        let cell = {
            let mut entries = self.entries.lock().unwrap();
            entries
                .entry(db_key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        let entry = cell.get_or_try_init(|| self.establish(db_key))?;
        Ok(entry.handle.clone())
    }

    /// Connect the default logical key of a single-database deployment
    /// (the `DB_NAME` environment variable).
    pub fn connect_default(&self) -> Result<C::Handle> {
        let db_key =
            settings::default_db_key().ok_or(Error::MissingEnv(settings::ENV_DEFAULT_DB))?;
        self.connect(&db_key)
    }

    fn establish(&self, db_key: &str) -> Result<Entry<C::Handle>> {
        let path = codec::config_path(&self.root, &self.environment, db_key);
        let config = codec::read_decrypted(&self.cipher, &path, &self.master_key)
            .map_err(|source| Error::ConfigLoad {
                db_key: db_key.to_string(),
                source: Box::new(source),
            })?;
        let dialect = config.validate().map_err(|source| Error::ConfigLoad {
            db_key: db_key.to_string(),
            source: Box::new(source),
        })?;

        let production = self.environment == "production";
        let options = ConnectOptions {
            dialect: dialect.connect_options(production),
            pool: PoolOptions::default(),
        };

        let handle = self
            .connector
            .open(&config, &options)
            .map_err(|source| Error::Connection {
                db_key: db_key.to_string(),
                source: Box::new(source),
            })?;

        if let Err(source) = self.connector.ping(&handle) {
            // a handle that failed its liveness check is never cached
            let _ = self.connector.close(handle);
            tracing::warn!(db_key, "database liveness check failed");
            return Err(Error::Connection {
                db_key: db_key.to_string(),
                source: Box::new(source),
            });
        }

        tracing::info!(db_key, dialect = %dialect, "database connected");
        Ok(Entry { handle, config })
    }

    /// Begin a transaction on an already-connected key.
    ///
    /// Fails with [`Error::NotEstablished`] if `connect(db_key)` has not
    /// succeeded yet — the registry never connects implicitly here.
    pub fn transaction(&self, db_key: &str, options: TransactionOptions) -> Result<C::Transaction> {
        let handle = {
            let entries = self.entries.lock().unwrap();
            entries
                .get(db_key)
                .and_then(|cell| cell.get())
                .map(|entry| entry.handle.clone())
        }
        .ok_or_else(|| Error::NotEstablished(db_key.to_string()))?;

        self.connector
            .begin(&handle, options.effective_isolation())
            .map_err(|source| Error::Connection {
                db_key: db_key.to_string(),
                source: Box::new(source),
            })
    }

    /// Resolved configuration for a connected key.
    pub fn config(&self, db_key: &str) -> Option<DatabaseConfig> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(db_key)
            .and_then(|cell| cell.get())
            .map(|entry| entry.config.clone())
    }

    /// True once `connect(db_key)` has succeeded and the key is still cached.
    pub fn is_connected(&self, db_key: &str) -> bool {
        let entries = self.entries.lock().unwrap();
        entries
            .get(db_key)
            .map(|cell| cell.get().is_some())
            .unwrap_or(false)
    }

    /// Close and evict one key. No-op if the key was never connected.
    pub fn close(&self, db_key: &str) -> Result<()> {
        let cell = self.entries.lock().unwrap().remove(db_key);
        if let Some(cell) = cell {
            if let Some(entry) = cell.get() {
                self.connector.close(entry.handle.clone())?;
                tracing::info!(db_key, "database connection closed");
            }
        }
        Ok(())
    }

    /// Close and evict every cached connection.
    pub fn close_all(&self) -> Result<()> {
        let drained: Vec<_> = self.entries.lock().unwrap().drain().collect();
        for (db_key, cell) in drained {
            if let Some(entry) = cell.get() {
                self.connector.close(entry.handle.clone())?;
                tracing::info!(db_key = %db_key, "database connection closed");
            }
        }
        Ok(())
    }
}
