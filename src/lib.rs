use anyhow::Context;

pub mod access;
pub mod commands;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod keys;
pub mod models;
pub mod password;
pub mod types;

pub use error::{AppError, AppResult};

use config::Config;
use db::Database;
use password::CredentialHasher;

/// Everything a request needs, cheap to clone.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub database: Database,
    pub hasher: CredentialHasher,
}

impl App {
    /// Connect to the configured database. The schema is not touched.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let database = Database::connect(&config.database.url, config.database.max_connections)
            .await
            .context("failed to connect to database")?;
        let hasher = CredentialHasher::new(config.hashing.cost);
        Ok(App {
            config,
            database,
            hasher,
        })
    }
}
