//! Merged catalog over static and generated specs
//!
//! One namespace, two sources: the immutable static store answers first (so
//! hand-authored specs always win on id collision), then the enumerator
//! synthesizes. Listing walks both sides lazily and never runs past the
//! configured caps.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use spikeforge_specs::models::SpikeSpec;
use spikeforge_specs::store::SpecStore;

use crate::config::EngineConfig;
use crate::enumerator::{parse_id, IdSpace};
use crate::error::CatalogError;
use crate::synth::{summary, synthesize_spec};

/// Lightweight listing entry: enough metadata to rank, no file bodies
#[derive(Debug, Clone, serde::Serialize)]
pub struct CatalogEntry {
    /// Spec identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Stack tags
    pub stack: Vec<String>,
    /// Discovery tags
    pub tags: Vec<String>,
    /// One-line description
    pub description: String,
}

impl CatalogEntry {
    fn from_spec(spec: &SpikeSpec) -> Self {
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            stack: spec.stack.clone(),
            tags: spec.tags.clone(),
            description: spec.description.clone(),
        }
    }
}

/// Result of a bounded listing
#[derive(Debug, Clone)]
pub struct ListOutcome {
    /// Entries that matched, in listing order
    pub entries: Vec<CatalogEntry>,
    /// Whether the walk was cut short by a cap rather than exhausted
    pub truncated: bool,
}

/// The merged spike namespace
pub struct Catalog {
    store: SpecStore,
    config: EngineConfig,
    /// Generated specs are pure functions of their id; the cache only saves
    /// recomputation, never correctness.
    generated: Option<Mutex<LruCache<String, Arc<SpikeSpec>>>>,
}

impl Catalog {
    /// Create a catalog over a spec store
    pub fn new(store: SpecStore, config: EngineConfig) -> Self {
        let generated = NonZeroUsize::new(config.spec_cache_size)
            .map(|cap| Mutex::new(LruCache::new(cap)));
        Self {
            store,
            config,
            generated,
        }
    }

    /// Catalog over the built-in pack with default configuration
    pub fn builtin() -> Result<Self, CatalogError> {
        Ok(Self::new(SpecStore::builtin()?, EngineConfig::default()))
    }

    /// The engine configuration this catalog runs under
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve an identifier to a spec
    ///
    /// Static store first, then the generation grammar. Unknown identifiers
    /// are [`CatalogError::NotFound`].
    pub fn get(&self, id: &str) -> Result<Arc<SpikeSpec>, CatalogError> {
        if let Some(spec) = self.store.get(id) {
            return Ok(spec);
        }

        let Some(tuple) = parse_id(id) else {
            return Err(CatalogError::NotFound(format!("unknown spike id '{id}'")));
        };

        if let Some(cache) = &self.generated {
            if let Some(spec) = cache.lock().get(id) {
                return Ok(spec.clone());
            }
        }

        let spec = Arc::new(synthesize_spec(&tuple));
        if let Some(cache) = &self.generated {
            cache.lock().put(id.to_string(), spec.clone());
        }
        debug!(id, "synthesized generated spec");
        Ok(spec)
    }

    /// List entries matching a predicate, capped at `limit`
    ///
    /// Static entries come first in id order, then generated entries in axis
    /// order. The walk terminates as soon as the cap is reached and never
    /// visits more of the generated space than the configured ceiling;
    /// oversized requests are truncated, not rejected.
    pub fn list<F>(&self, filter: F, limit: usize) -> ListOutcome
    where
        F: Fn(&CatalogEntry) -> bool,
    {
        let cap = limit.min(self.config.list_cap);
        let mut truncated = limit > self.config.list_cap;
        let mut entries = Vec::new();

        for spec in self.store.iter() {
            if entries.len() >= cap {
                truncated = true;
                return ListOutcome { entries, truncated };
            }
            let entry = CatalogEntry::from_spec(spec);
            if filter(&entry) {
                entries.push(entry);
            }
        }

        let mut space = IdSpace::all();
        let total = space.total();
        let ceiling = self.config.generation_ceiling;
        let mut visited = 0usize;

        while entries.len() < cap {
            if visited >= ceiling {
                // Ceiling hit with space left unexplored.
                truncated = truncated || ceiling < total;
                break;
            }
            let Some(tuple) = space.next() else { break };
            visited += 1;

            let meta = summary(&tuple);
            // Static specs shadow generated ids, so skip anything the store owns.
            if self.store.get(&meta.id).is_some() {
                continue;
            }
            let entry = CatalogEntry {
                id: meta.id,
                name: meta.name,
                stack: meta.stack,
                tags: meta.tags,
                description: meta.description,
            };
            if filter(&entry) {
                entries.push(entry);
            }
        }

        if entries.len() >= cap && visited < total {
            // Cap filled before the walk ran out.
            truncated = true;
        }

        ListOutcome { entries, truncated }
    }

    /// Number of static specs in the catalog
    pub fn static_len(&self) -> usize {
        self.store.len()
    }
}
