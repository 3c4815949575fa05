// src/bin/provision.rs
//! Interactive provisioning of encrypted database config files
//!
//! Collects a DatabaseConfig on the terminal, encrypts it with the
//! combined key from the environment, and writes
//! `databases/<environment>_<dbName>.enc.ini` under the current
//! directory. Run once per database; rerun to replace credentials.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};

use encrypted_db_registry::codec;
use encrypted_db_registry::crypto::ConfigCipher;
use encrypted_db_registry::dbconfig::DatabaseConfig;
use encrypted_db_registry::dialect::Dialect;
use encrypted_db_registry::settings::{self, Secrets};

fn prompt(message: &str) -> Result<String> {
    loop {
        print!("{message}");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            bail!("input closed");
        }
        let input = line.trim().to_string();
        if input.is_empty() {
            println!("Input must not be empty");
            continue;
        }
        return Ok(input);
    }
}

fn prompt_password(message: &str) -> Result<String> {
    loop {
        let input = rpassword::prompt_password(message)?;
        if input.is_empty() {
            println!("Input must not be empty");
            continue;
        }
        return Ok(input);
    }
}

fn prompt_port() -> Result<u32> {
    loop {
        let input = prompt("Database port: ")?;
        match input.parse::<u32>() {
            Ok(port) if (1..=65535).contains(&port) => return Ok(port),
            _ => println!("Error: port must be a number between 1-65535"),
        }
    }
}

fn prompt_dialect() -> Result<Dialect> {
    loop {
        let input = prompt("Database dialect (postgres/mysql/mariadb/mssql/db2): ")?;
        match input.to_lowercase().parse::<Dialect>() {
            Ok(dialect) => return Ok(dialect),
            Err(_) => println!(
                "Error: dialect must be one of {}",
                Dialect::ALL.map(|d| d.as_str()).join(", ")
            ),
        }
    }
}

fn collect() -> Result<DatabaseConfig> {
    println!("\n=== Database configuration ===\n");
    Ok(DatabaseConfig {
        db_name: prompt("Database name: ")?,
        db_user: prompt("Database user: ")?,
        db_password: prompt_password("Database password: ")?,
        db_host: prompt("Database host: ")?,
        db_port: prompt_port()?,
        db_dialect: prompt_dialect()?.to_string(),
    })
}

fn confirm(config: &DatabaseConfig) -> Result<bool> {
    println!("\n=== Confirm configuration ===");
    println!("dbName: {}", config.db_name);
    println!("dbUser: {}", config.db_user);
    println!("dbPassword: {}", "*".repeat(config.db_password.len()));
    println!("dbHost: {}", config.db_host);
    println!("dbPort: {}", config.db_port);
    println!("dbDialect: {}", config.db_dialect);
    let answer = prompt("\nIs this correct? (y/n): ")?;
    Ok(answer.eq_ignore_ascii_case("y"))
}

fn main() -> Result<()> {
    let secrets = Secrets::from_env()
        .context("CONFIG_MASTER_KEY and CONFIG_ADDITIONAL_KEY must be set")?;
    let environment = settings::environment();

    let config = collect()?;
    if !confirm(&config)? {
        println!("\nConfiguration cancelled.");
        return Ok(());
    }

    let cipher = ConfigCipher::from_env();
    let master_key = secrets.combined_key();
    let root = std::env::current_dir()?;
    let path = codec::config_path(&root, &environment, &config.db_name);
    let json = serde_json::to_vec(&config)?;
    codec::write_encrypted(&cipher, &path, &json, &master_key)
        .with_context(|| format!("writing {}", path.display()))?;

    println!("\n=== Encryption complete ===");
    println!("Output: {}", path.display());
    println!("Environment: {environment}");
    println!("Database: {}", config.db_name);
    println!("\nSet these before starting the server:");
    println!("export NODE_ENV={environment}");
    println!("export DB_NAME={}", config.db_name);
    Ok(())
}
