//! Auto-selection of the best spike for a task description
//!
//! Discovery finds candidates; this module filters them by hard constraints
//! and turns the winner into a selection with a confidence figure and a
//! rationale a calling assistant can act on. Constraints are never relaxed
//! silently: an empty filtered set is `None`, and the caller decides whether
//! to retry without constraints.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::discovery::{tokenize, Discovery, RankedSpike};
use crate::resolver::{Catalog, CatalogEntry};

/// A winning candidate with supporting evidence
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    /// Identifier of the selected spike
    pub id: String,
    /// Winner's score normalized against the query's maximum achievable score
    pub confidence: f64,
    /// Which keyword and constraint matches contributed
    pub rationale: Vec<String>,
}

/// Constraint-aware selection over discovery results
pub struct AutoSelector {
    config: EngineConfig,
}

impl AutoSelector {
    /// Create a selector under the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Pick the best spike for a task, or `None` when nothing qualifies
    ///
    /// Constraints are hard filters: every constraint value must appear in
    /// the candidate's stack or tags (case-insensitive). The keys are only
    /// used for the rationale text.
    pub fn select(
        &self,
        catalog: &Catalog,
        discovery: &Discovery,
        task: &str,
        constraints: &BTreeMap<String, String>,
    ) -> Option<Selection> {
        let batch = discovery.discover(catalog, task, self.config.auto_batch);

        let mut qualified: Vec<&RankedSpike> = batch
            .results
            .iter()
            .filter(|candidate| satisfies_all(candidate, constraints))
            .collect();
        qualified.truncate(self.config.auto_top_n);

        let winner = match qualified.first() {
            Some(w) => *w,
            None => {
                debug!(task, "auto-selection found no qualifying candidate");
                return None;
            }
        };

        let tokens = tokenize(task);
        let max = discovery.max_achievable(&tokens);
        let confidence = if max > 0.0 {
            (winner.score / max).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let entry = CatalogEntry {
            id: winner.id.clone(),
            name: winner.name.clone(),
            stack: winner.stack.clone(),
            tags: winner.tags.clone(),
            description: winner.description.clone(),
        };
        let mut rationale = discovery.explain_match(&entry, &tokens);
        for (key, value) in constraints {
            rationale.push(format!(
                "constraint {key}={value} satisfied by the candidate's stack/tags"
            ));
        }

        debug!(task, id = %winner.id, confidence, "auto-selected spike");
        Some(Selection {
            id: winner.id.clone(),
            confidence,
            rationale,
        })
    }
}

fn satisfies_all(candidate: &RankedSpike, constraints: &BTreeMap<String, String>) -> bool {
    constraints.values().all(|value| {
        candidate
            .stack
            .iter()
            .chain(candidate.tags.iter())
            .any(|item| item.eq_ignore_ascii_case(value))
    })
}
