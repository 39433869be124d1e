//! Static spec store
//!
//! Holds the hand-authored side of the catalog: the built-in pack embedded in
//! the binary plus any spec documents loaded from disk. Loaded once at
//! startup and immutable afterwards; lookups hand out shared references.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::SpecError;
use crate::models::SpikeSpec;
use crate::validation::validate_spec;

/// Identifier prefix reserved for specs synthesized from the axis grammar
///
/// Static specs must never use it; the catalog resolves anything under this
/// prefix through the enumerator when no static spec shadows it.
pub const GENERATED_PREFIX: &str = "gen-";

/// Built-in spec documents shipped with the engine
const BUILTIN_DOCS: &[(&str, &str)] = &[
    (
        "nextjs-minimal.yaml",
        include_str!("../specs/nextjs-minimal.yaml"),
    ),
    (
        "express-jwt-auth.yaml",
        include_str!("../specs/express-jwt-auth.yaml"),
    ),
    (
        "react-component.yaml",
        include_str!("../specs/react-component.yaml"),
    ),
    (
        "fastapi-crud.yaml",
        include_str!("../specs/fastapi-crud.yaml"),
    ),
    ("node-dotenv.yaml", include_str!("../specs/node-dotenv.yaml")),
];

/// Immutable store of hand-authored spike specs
///
/// Specs are keyed by id in a `BTreeMap` so iteration order (and therefore
/// listing order) is lexicographic and reproducible.
#[derive(Debug, Default)]
pub struct SpecStore {
    specs: BTreeMap<String, Arc<SpikeSpec>>,
}

impl SpecStore {
    /// Create an empty store
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a store holding the built-in pack
    ///
    /// The built-in documents are part of the binary; a parse or validation
    /// failure here is a build defect, not a runtime condition, so it is
    /// still surfaced as an error rather than a panic.
    pub fn builtin() -> Result<Self, SpecError> {
        let mut store = Self::empty();
        for (label, doc) in BUILTIN_DOCS {
            let spec = parse_document(label, doc)?;
            store.insert(spec)?;
        }
        debug!(count = store.len(), "loaded built-in spec pack");
        Ok(store)
    }

    /// Load additional spec documents from a directory
    ///
    /// Reads every `.yaml`/`.yml` file directly under `dir`. Files that fail
    /// to parse or validate abort the load; a missing directory is not an
    /// error (there is simply nothing to add).
    ///
    /// # Returns
    /// Number of specs added.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, SpecError> {
        if !dir.is_dir() {
            warn!(path = %dir.display(), "spec directory does not exist, skipping");
            return Ok(0);
        }

        let mut loaded = 0;
        let mut entries: Vec<_> = fs::read_dir(dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|e| e.path())
            .collect();
        // Deterministic load order regardless of readdir order.
        entries.sort();

        for path in entries {
            let is_yaml = path
                .extension()
                .map(|e| e == "yaml" || e == "yml")
                .unwrap_or(false);
            if !path.is_file() || !is_yaml {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            let spec = parse_document(&path.display().to_string(), &content)?;
            debug!(id = %spec.id, path = %path.display(), "loaded spec document");
            self.insert(spec)?;
            loaded += 1;
        }

        Ok(loaded)
    }

    /// Insert a spec, validating it and enforcing id uniqueness
    pub fn insert(&mut self, spec: SpikeSpec) -> Result<(), SpecError> {
        validate_spec(&spec)?;
        if spec.id.starts_with(GENERATED_PREFIX) {
            return Err(SpecError::ReservedPrefix(spec.id));
        }
        if self.specs.contains_key(&spec.id) {
            return Err(SpecError::DuplicateId(spec.id));
        }
        self.specs.insert(spec.id.clone(), Arc::new(spec));
        Ok(())
    }

    /// Look up a spec by id
    pub fn get(&self, id: &str) -> Option<Arc<SpikeSpec>> {
        self.specs.get(id).cloned()
    }

    /// Iterate all specs in id order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SpikeSpec>> {
        self.specs.values()
    }

    /// Number of specs in the store
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the store holds no specs
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn parse_document(label: &str, content: &str) -> Result<SpikeSpec, SpecError> {
    serde_yaml::from_str(content).map_err(|source| SpecError::ParseError {
        path: label.to_string(),
        source,
    })
}
