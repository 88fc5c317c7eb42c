use std::path::{Path, PathBuf};

use anyhow::{ensure, Context};
use directories_next::ProjectDirs;
use serde::Deserialize;

use crate::password::{MAX_COST, MIN_COST};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Public prefix of the links handed back on create, ending in `/`.
    pub base_url: String,
    pub port: u16,
    pub database: Database,
    pub hashing: Hashing,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Hashing {
    /// bcrypt work factor.
    pub cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://127.0.0.1:8080/".to_owned(),
            port: 8080,
            database: Database::default(),
            hashing: Hashing::default(),
        }
    }
}

impl Default for Database {
    fn default() -> Self {
        Database {
            url: "sqlite://lockbin.db?mode=rwc".to_owned(),
            max_connections: 5,
        }
    }
}

impl Default for Hashing {
    fn default() -> Self {
        Hashing {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl Config {
    /// Load from an explicit path, else from the platform config directory,
    /// else fall back to defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Config::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (MIN_COST..=MAX_COST).contains(&self.hashing.cost),
            "hashing.cost must be between {MIN_COST} and {MAX_COST}, got {}",
            self.hashing.cost
        );
        ensure!(
            self.database.max_connections > 0,
            "database.max_connections must be at least 1"
        );
        ensure!(self.base_url.ends_with('/'), "base_url must end with '/'");
        Ok(())
    }
}

fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lockbin").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            port = 9000

            [database]
            url = "sqlite::memory:"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.hashing.cost, bcrypt::DEFAULT_COST);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_cost() {
        let config = Config::from_toml("[hashing]\ncost = 2").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_base_url_without_slash() {
        let config = Config::from_toml("base_url = \"http://example.com\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[hashing]\ncost = 4\n").unwrap();
        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.hashing.cost, 4);
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(dir.path().join("nope.toml").as_path())).is_err());
    }
}
