//! Severity weight table loading.
//!
//! The table is read once at startup. A missing or malformed table is fatal:
//! only the per-entry lookups fall back to defaults, never the table itself.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::loader::ConfigError;
use crate::domain::models::SeverityWeightTable;

/// Loads and validates [`SeverityWeightTable`] JSON files.
pub struct WeightTableLoader;

impl WeightTableLoader {
    /// Load the table at `path`, ready to share between sessions.
    pub fn load(path: impl AsRef<Path>) -> Result<Arc<SeverityWeightTable>> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read weight table {}", path.display()))?;
        let table = Self::from_json_str(&raw)
            .with_context(|| format!("Failed to load weight table {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            severities = table.severities.len(),
            domains = table.domain_adj.len(),
            "weight table loaded"
        );
        Ok(Arc::new(table))
    }

    /// Parse and validate a table from a JSON document.
    pub fn from_json_str(raw: &str) -> Result<SeverityWeightTable, ConfigError> {
        let table: SeverityWeightTable = serde_json::from_str(raw)
            .map_err(|e| ConfigError::InvalidWeightTable(e.to_string()))?;
        table.check().map_err(ConfigError::InvalidWeightTable)?;
        Ok(table)
    }
}
