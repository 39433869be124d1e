//! Engine configuration
//!
//! Environment-style knobs with working defaults. Loaded once at startup via
//! the `config` crate (`SPIKEFORGE_*` variables); every field has a default
//! so an empty environment is a valid configuration.

use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Tunable limits and toggles for the catalog and selection engines
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ceiling on generated identifiers visited by any single listing walk
    pub generation_ceiling: usize,
    /// Hard cap on results returned by discovery/listing, whatever the caller asks for
    pub list_cap: usize,
    /// Batch window auto-selection evaluates
    pub auto_batch: usize,
    /// Top-N cutoff for auto-selection scoring
    pub auto_top_n: usize,
    /// Whether alias-based ranking boosts are applied
    pub alias_boost_enabled: bool,
    /// Score added when an alias maps a query term to a candidate
    pub alias_boost: f64,
    /// Capacity of the generated-spec LRU cache (0 disables caching)
    pub spec_cache_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generation_ceiling: 5000,
            list_cap: 100,
            auto_batch: 50,
            auto_top_n: 5,
            alias_boost_enabled: true,
            alias_boost: 5.0,
            spec_cache_size: 256,
        }
    }
}

impl EngineConfig {
    /// Load configuration from `SPIKEFORGE_*` environment variables
    ///
    /// Unset variables fall back to defaults; a set-but-malformed variable is
    /// a configuration error.
    pub fn from_env() -> Result<Self, CatalogError> {
        let cfg = Config::builder()
            .add_source(Environment::with_prefix("SPIKEFORGE"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}
