//! High-level operation surface
//!
//! One `SpikeManager` per process is the expected shape: it owns the catalog
//! (immutable after load), the discovery and auto-selection engines, and the
//! applier, and exposes the six operations the host's protocol layer maps
//! its calls onto. Everything here is safe to call concurrently; only apply
//! commits serialize, per target root, inside the applier.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use spikeforge_catalog::{
    AutoSelector, Catalog, Discovery, DiscoverOutcome, EngineConfig, Selection,
};
use spikeforge_specs::store::SpecStore;

use crate::applier::Applier;
use crate::error::SpikeError;
use crate::explain::explain;
use crate::models::{ApplyRequest, ApplyResult, RenderedSpike};
use crate::renderer::render;
use crate::validation::{validate_rendered, SpikeAnalyzer, ValidationReport};

/// The spike engine's operation surface
pub struct SpikeManager {
    catalog: Catalog,
    discovery: Discovery,
    selector: AutoSelector,
    applier: Applier,
    analyzer: Option<Arc<dyn SpikeAnalyzer>>,
}

impl SpikeManager {
    /// Manager over the built-in spec pack with default configuration
    pub fn builtin() -> Result<Self, SpikeError> {
        let store = SpecStore::builtin().map_err(spikeforge_catalog::CatalogError::from)?;
        Ok(Self::new(store, EngineConfig::default()))
    }

    /// Manager over a prepared store and configuration
    pub fn new(store: SpecStore, config: EngineConfig) -> Self {
        Self {
            catalog: Catalog::new(store, config.clone()),
            discovery: Discovery::new(config.clone()),
            selector: AutoSelector::new(config),
            applier: Applier::new(),
            analyzer: None,
        }
    }

    /// Attach the external static-analysis collaborator
    pub fn with_analyzer(mut self, analyzer: Arc<dyn SpikeAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// The catalog this manager serves
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// `discover-spikes`: rank the catalog against a free-text query
    pub fn discover(&self, query: &str, limit: usize) -> DiscoverOutcome {
        self.discovery.discover(&self.catalog, query, limit)
    }

    /// `auto-spike`: best candidate for a task, or `None` for no match
    pub fn auto_select(
        &self,
        task: &str,
        constraints: &BTreeMap<String, String>,
    ) -> Option<Selection> {
        self.selector
            .select(&self.catalog, &self.discovery, task, constraints)
    }

    /// `preview-spike`: render without touching disk
    pub fn preview(
        &self,
        id: &str,
        params: &HashMap<String, String>,
    ) -> Result<RenderedSpike, SpikeError> {
        let spec = self.catalog.get(id)?;
        Ok(render(&spec, params)?)
    }

    /// `apply-spike`: render and reconcile against the target tree
    pub fn apply(
        &self,
        request: &ApplyRequest,
        target_root: &Path,
    ) -> Result<ApplyResult, SpikeError> {
        let spec = self.catalog.get(&request.id)?;
        let rendered = render(&spec, &request.params)?;
        info!(id = %request.id, strategy = ?request.strategy, root = %target_root.display(), "applying spike");
        Ok(self
            .applier
            .apply(&rendered, target_root, request.strategy)?)
    }

    /// `validate-spike`: re-render and check structure against the tree
    pub fn validate(
        &self,
        id: &str,
        params: &HashMap<String, String>,
        target_root: &Path,
    ) -> Result<ValidationReport, SpikeError> {
        let spec = self.catalog.get(id)?;
        let rendered = render(&spec, params)?;
        let framework = spec.stack.first().map(|s| s.as_str());
        Ok(validate_rendered(
            &rendered,
            target_root,
            framework,
            self.analyzer.as_deref(),
        ))
    }

    /// `explain-spike`: documentation text, no disk access
    pub fn explain(&self, id: &str) -> Result<String, SpikeError> {
        let spec = self.catalog.get(id)?;
        Ok(explain(&spec))
    }
}
