//! Runtime configuration.
//!
//! Loaded from a JSON file; a default file is written on first run so
//! operators have something concrete to edit.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Minimum interval between two discovery runs, in seconds. Calls
    /// inside this window are served from the cached snapshot.
    pub scan_debounce_secs: u64,

    /// When true, a merged record keeps the capability reading from the
    /// previous snapshot instead of the fresh probe result.
    pub keep_previous_capability: bool,

    pub snmp: SnmpConfig,
    pub enrichment: EnrichmentConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnmpConfig {
    pub community: String,
    pub v3_username: String,
    pub v3_auth_key: String,
    pub v3_auth_protocol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Upper bound on concurrently running enrichment tasks.
    pub workers: usize,
    /// Per-task timeout, seconds.
    pub task_timeout_secs: u64,
    /// Attempts per device before giving up and keeping prior values.
    pub retries: u32,
    /// Fixed delay between attempts, milliseconds.
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// "json" or "memory".
    pub backend: String,
    pub json_path: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            scan_debounce_secs: 15,
            keep_previous_capability: false,
            snmp: SnmpConfig::default(),
            enrichment: EnrichmentConfig::default(),
            registry: RegistryConfig::default(),
        }
    }
}

impl Default for SnmpConfig {
    fn default() -> Self {
        Self {
            community: "public".into(),
            v3_username: "admin".into(),
            v3_auth_key: "admin123".into(),
            v3_auth_protocol: "SHA".into(),
        }
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            task_timeout_secs: 30,
            retries: 3,
            retry_backoff_ms: 2000,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            backend: "json".into(),
            json_path: "data/devices.json".into(),
        }
    }
}

impl InventoryConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_secs(self.scan_debounce_secs)
    }

    /// Reads the config file, creating it with defaults when missing or
    /// empty.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() || path.metadata().map(|m| m.len() == 0).unwrap_or(true) {
            let config = Self::default();
            config.store(path)?;
            return Ok(config);
        }
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| InventoryError::storage(format!("parsing config {}", path.display()), e))
    }

    pub fn store(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| InventoryError::storage("serializing config", e))?;
        std::fs::write(path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensible_defaults() {
        let cfg = InventoryConfig::default();
        assert_eq!(cfg.scan_debounce_secs, 15);
        assert!(!cfg.keep_previous_capability);
        assert_eq!(cfg.enrichment.workers, 10);
        assert_eq!(cfg.enrichment.retries, 3);
        assert_eq!(cfg.snmp.community, "public");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: InventoryConfig = serde_json::from_str(r#"{"scan_debounce_secs": 60}"#).unwrap();
        assert_eq!(cfg.scan_debounce_secs, 60);
        assert_eq!(cfg.enrichment.workers, 10);
    }
}
