//! Engine configuration
//!
//! All tunables live in one value threaded through construction; there is no
//! process-level state. Every field has a default so a config file may set
//! only what it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{EngineError, EngineResult};

/// Cost constants of the scoring model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostModel {
    /// Cost of scanning one index key
    #[serde(default = "default_ixscan_cost")]
    pub ixscan_cost: f64,

    /// Additional per-key cost for each index field beyond the first
    #[serde(default = "default_index_field_cost")]
    pub index_field_cost: f64,

    /// Cost of fetching one document after an index scan
    #[serde(default = "default_fetch_cost")]
    pub fetch_cost: f64,

    /// Weight of the eliminated in-memory sort, per comparison
    #[serde(default = "default_sort_cost")]
    pub sort_cost: f64,
}

fn default_ixscan_cost() -> f64 {
    0.4
}
fn default_index_field_cost() -> f64 {
    0.05
}
fn default_fetch_cost() -> f64 {
    9.5
}
fn default_sort_cost() -> f64 {
    10.0
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            ixscan_cost: default_ixscan_cost(),
            index_field_cost: default_index_field_cost(),
            fetch_cost: default_fetch_cost(),
            sort_cost: default_sort_cost(),
        }
    }
}

/// Engine tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fraction of the collection to sample, in (0, 1)
    #[serde(default = "default_sample_ratio")]
    pub sample_ratio: f64,

    /// Explicit sample size; overrides the ratio when set
    #[serde(default)]
    pub sample_size: Option<u64>,

    /// Database holding persisted samples; must differ from the source
    #[serde(default = "default_sample_db")]
    pub sample_db: String,

    /// Maximum number of fields per candidate index
    #[serde(default = "default_max_index_fields")]
    pub max_index_fields: usize,

    /// Maximum number of recommended indexes; 0 means unlimited
    #[serde(default)]
    pub max_indexes: usize,

    /// Sample-size floor for small collections
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: u64,

    /// Cost constants
    #[serde(default)]
    pub cost: CostModel,
}

fn default_sample_ratio() -> f64 {
    0.001
}
fn default_sample_db() -> String {
    "mindexer_samples".to_string()
}
fn default_max_index_fields() -> usize {
    3
}
fn default_min_sample_size() -> u64 {
    1000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_ratio: default_sample_ratio(),
            sample_size: None,
            sample_db: default_sample_db(),
            max_index_fields: default_max_index_fields(),
            max_indexes: 0,
            min_sample_size: default_min_sample_size(),
            cost: CostModel::default(),
        }
    }
}

impl EngineConfig {
    /// Loads and validates a configuration file
    pub fn load(path: &Path) -> EngineResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EngineError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;

        let config: EngineConfig = serde_json::from_str(&content).map_err(|e| {
            EngineError::InvalidConfig(format!("invalid config JSON: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates field ranges
    pub fn validate(&self) -> EngineResult<()> {
        if !self.sample_ratio.is_finite() || self.sample_ratio <= 0.0 || self.sample_ratio >= 1.0 {
            return Err(EngineError::InvalidConfig(
                "sample_ratio must be in (0, 1)".to_string(),
            ));
        }

        if self.sample_size == Some(0) {
            return Err(EngineError::InvalidConfig(
                "sample_size must be positive".to_string(),
            ));
        }

        if self.sample_db.is_empty() {
            return Err(EngineError::InvalidConfig(
                "sample_db must not be empty".to_string(),
            ));
        }

        if self.max_index_fields == 0 {
            return Err(EngineError::InvalidConfig(
                "max_index_fields must be positive".to_string(),
            ));
        }

        if self.min_sample_size == 0 {
            return Err(EngineError::InvalidConfig(
                "min_sample_size must be positive".to_string(),
            ));
        }

        let costs = [
            ("ixscan_cost", self.cost.ixscan_cost),
            ("index_field_cost", self.cost.index_field_cost),
            ("fetch_cost", self.cost.fetch_cost),
            ("sort_cost", self.cost.sort_cost),
        ];
        for (name, value) in costs {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be a non-negative number",
                    name
                )));
            }
        }

        Ok(())
    }
}
