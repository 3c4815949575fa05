// tests/support.rs
//! Shared test fixtures — encrypted config files + a counting mock driver

// Each test binary pulls in this module and uses a different subset of it
#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use encrypted_db_registry::codec;
use encrypted_db_registry::crypto::ConfigCipher;
use encrypted_db_registry::dbconfig::DatabaseConfig;
use encrypted_db_registry::error::{Error, Result};
use encrypted_db_registry::registry::{
    ConnectOptions, ConnectionRegistry, Connector, IsolationLevel,
};

pub const MASTER_KEY: &str = "test-combined-key-digest";
pub const AUX_KEY: &str = "test-aux-key";

/// Install a test-friendly tracing subscriber; safe to call repeatedly.
pub fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

pub fn sample_config(dialect: &str, port: u32) -> DatabaseConfig {
    DatabaseConfig {
        db_name: "samsatnew".into(),
        db_user: "svc_account".into(),
        db_password: "hunter2".into(),
        db_host: "127.0.0.1".into(),
        db_port: port,
        db_dialect: dialect.into(),
    }
}

/// Encrypt and place a config file where the registry will look for it.
pub fn write_config(root: &Path, environment: &str, db_key: &str, config: &DatabaseConfig) {
    let cipher = ConfigCipher::new(AUX_KEY);
    let path = codec::config_path(root, environment, db_key);
    let json = serde_json::to_vec(config).unwrap();
    codec::write_encrypted(&cipher, &path, &json, MASTER_KEY).unwrap();
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockHandle {
    pub id: usize,
}

/// Driver stand-in that counts every lifecycle call.
#[derive(Default)]
pub struct MockConnector {
    pub opens: AtomicUsize,
    pub pings: AtomicUsize,
    pub begins: AtomicUsize,
    pub closes: AtomicUsize,
    pub fail_ping: AtomicBool,
    /// Widens the race window for the cold-connect concurrency test
    pub open_delay: Option<Duration>,
}

impl Connector for MockConnector {
    type Handle = Arc<MockHandle>;
    type Transaction = IsolationLevel;

    fn open(&self, _config: &DatabaseConfig, _options: &ConnectOptions) -> Result<Self::Handle> {
        if let Some(delay) = self.open_delay {
            std::thread::sleep(delay);
        }
        let id = self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockHandle { id }))
    }

    fn ping(&self, _handle: &Self::Handle) -> Result<()> {
        self.pings.fetch_add(1, Ordering::SeqCst);
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(Error::driver("ping failed"));
        }
        Ok(())
    }

    fn begin(
        &self,
        _handle: &Self::Handle,
        isolation: IsolationLevel,
    ) -> Result<Self::Transaction> {
        self.begins.fetch_add(1, Ordering::SeqCst);
        Ok(isolation)
    }

    fn close(&self, _handle: Self::Handle) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Registry wired to a mock connector over a temp config root.
pub fn mock_registry(
    root: &Path,
    environment: &str,
    connector: MockConnector,
) -> ConnectionRegistry<MockConnector> {
    ConnectionRegistry::new(
        connector,
        ConfigCipher::new(AUX_KEY),
        root,
        environment,
        MASTER_KEY,
    )
}
