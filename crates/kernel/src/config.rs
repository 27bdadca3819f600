//! Configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result, bail};

/// Where categories and conventions are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => bail!("unknown storage backend '{other}', expected postgres or memory"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL. Required for the postgres backend.
    pub database_url: Option<String>,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Storage backend (default: postgres).
    pub storage_backend: StorageBackend,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Listing page size when the request names none (default: 50).
    pub default_page_limit: u32,

    /// Cap on the listing page size. Unset means unbounded.
    pub max_page_limit: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let storage_backend: StorageBackend = var("STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_string())
            .parse()
            .context("STORAGE_BACKEND is invalid")?;

        let database_url = var("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL environment variable is required for the postgres backend");
        }

        let database_max_connections = var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        let default_page_limit: u32 = var("DEFAULT_PAGE_LIMIT")
            .unwrap_or_else(|| "50".to_string())
            .parse()
            .context("DEFAULT_PAGE_LIMIT must be a valid u32")?;
        if default_page_limit == 0 {
            bail!("DEFAULT_PAGE_LIMIT must be at least 1");
        }

        let max_page_limit = var("MAX_PAGE_LIMIT")
            .map(|v| v.parse::<u32>())
            .transpose()
            .context("MAX_PAGE_LIMIT must be a valid u32")?;
        if max_page_limit == Some(0) {
            bail!("MAX_PAGE_LIMIT must be at least 1");
        }

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            storage_backend,
            cors_allowed_origins,
            default_page_limit,
            max_page_limit,
        })
    }

    /// The database URL, or an error when none is configured.
    pub fn require_database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL environment variable is required")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_memory_backend() {
        let config = load(&[("STORAGE_BACKEND", "memory")]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.cors_allowed_origins, vec!["*"]);
        assert_eq!(config.default_page_limit, 50);
        assert_eq!(config.max_page_limit, None);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn postgres_requires_database_url() {
        assert!(load(&[]).is_err());

        let config = load(&[("DATABASE_URL", "postgres://localhost/conventions")]).unwrap();
        assert_eq!(config.storage_backend, StorageBackend::Postgres);
        assert_eq!(config.database_max_connections, 10);
    }

    #[test]
    fn parses_limits_and_origins() {
        let config = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("MAX_PAGE_LIMIT", "100"),
            ("DEFAULT_PAGE_LIMIT", "20"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ])
        .unwrap();

        assert_eq!(config.max_page_limit, Some(100));
        assert_eq!(config.default_page_limit, 20);
        assert_eq!(config.cors_allowed_origins.len(), 2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(load(&[("STORAGE_BACKEND", "redis")]).is_err());
        assert!(load(&[("STORAGE_BACKEND", "memory"), ("PORT", "http")]).is_err());
        assert!(load(&[("STORAGE_BACKEND", "memory"), ("DEFAULT_PAGE_LIMIT", "0")]).is_err());
        assert!(load(&[("STORAGE_BACKEND", "memory"), ("MAX_PAGE_LIMIT", "0")]).is_err());
    }
}
