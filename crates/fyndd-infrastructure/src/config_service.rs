//! Configuration service implementation.
//!
//! Loads [`ClientConfig`] from `~/.config/fyndd/config.toml`, writing the
//! defaults on first run, and caches it for the lifetime of the process.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use fyndd_core::Result;
use fyndd_core::config::ClientConfig;

use crate::paths::FynddPaths;
use crate::storage::{read_if_present, write_atomic};

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "FYNDD_API_URL";

/// Loads and caches the client configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file location; `None` means the default path.
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<ClientConfig>>>,
}

impl ConfigService {
    /// Uses the default `config.toml` location.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Uses the given config file instead of the default one.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it from disk on first access.
    ///
    /// `FYNDD_API_URL` overrides the file's `api_base_url`.
    pub async fn get_config(&self) -> Result<ClientConfig> {
        {
            let cached = self.config.read().await;
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let mut config = self.load_or_create().await?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("[ConfigService] Using {} override", API_URL_ENV);
                config.api_base_url = url.trim().to_string();
            }
        }

        *self.config.write().await = Some(config.clone());
        Ok(config)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub async fn invalidate_cache(&self) {
        *self.config.write().await = None;
    }

    /// Resolves the config file path.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(FynddPaths::config_file()?),
        }
    }

    async fn load_or_create(&self) -> Result<ClientConfig> {
        let path = self.config_path()?;
        tokio::task::spawn_blocking(move || -> Result<ClientConfig> {
            match read_if_present(&path)? {
                Some(content) => Ok(toml::from_str(&content)?),
                None => {
                    let config = ClientConfig::default();
                    let encoded = toml::to_string_pretty(&config)?;
                    write_atomic(&path, encoded.as_bytes())?;
                    tracing::info!("[ConfigService] Wrote default config to {}", path.display());
                    Ok(config)
                }
            }
        })
        .await
        .map_err(|e| fyndd_core::FynddError::internal(format!("config task failed: {}", e)))?
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_default_config_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::with_path(&path);

        let config = service.get_config().await.unwrap();

        assert_eq!(config.reconcile_interval_secs, 30);
        assert!(path.exists());
        let written: ClientConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.pending_request_ttl_secs, 86_400);
    }

    #[tokio::test]
    async fn test_reads_existing_file_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "reconcile_interval_secs = 5\n").unwrap();
        let service = ConfigService::with_path(&path);

        assert_eq!(service.get_config().await.unwrap().reconcile_interval_secs, 5);

        std::fs::write(&path, "reconcile_interval_secs = 7\n").unwrap();
        assert_eq!(service.get_config().await.unwrap().reconcile_interval_secs, 5);

        service.invalidate_cache().await;
        assert_eq!(service.get_config().await.unwrap().reconcile_interval_secs, 7);
    }

    #[tokio::test]
    async fn test_invalid_toml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "reconcile_interval_secs = [").unwrap();

        let err = ConfigService::with_path(&path).get_config().await.unwrap_err();
        assert!(matches!(err, fyndd_core::FynddError::Serialization { .. }));
    }
}
