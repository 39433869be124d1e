//! Free-text discovery over the catalog
//!
//! Turns a query into a scored, capped list of candidates. Scoring is
//! deliberately simple and fully deterministic; the weights are fixed here
//! rather than configurable so results are reproducible across processes.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::resolver::{Catalog, CatalogEntry};

/// Score for a query term matching an identifier token exactly
pub const WEIGHT_ID_TOKEN: f64 = 10.0;
/// Score for a query term matching a tag exactly
pub const WEIGHT_TAG: f64 = 5.0;
/// Score for a query term appearing in the stack or description
pub const WEIGHT_TEXT: f64 = 2.0;

/// One ranked discovery result
#[derive(Debug, Clone, Serialize)]
pub struct RankedSpike {
    /// Spec identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Rank score (see the weight constants)
    pub score: f64,
    /// Stack tags
    pub stack: Vec<String>,
    /// Discovery tags
    pub tags: Vec<String>,
    /// One-line description
    pub description: String,
}

/// Result of a discovery call
#[derive(Debug, Clone)]
pub struct DiscoverOutcome {
    /// Ranked results, best first
    pub results: Vec<RankedSpike>,
    /// Whether the candidate walk was cut short by a cap
    pub truncated: bool,
}

/// Discovery engine with an optional alias table
pub struct Discovery {
    config: EngineConfig,
    /// term -> canonical identifier whose score the term boosts
    aliases: HashMap<String, String>,
}

impl Discovery {
    /// Discovery with the default alias table
    pub fn new(config: EngineConfig) -> Self {
        Self::with_aliases(config, default_aliases())
    }

    /// Discovery with a caller-provided alias table
    pub fn with_aliases(config: EngineConfig, aliases: HashMap<String, String>) -> Self {
        Self { config, aliases }
    }

    /// Rank catalog entries against a free-text query
    ///
    /// Candidates come from the catalog's bounded `list`, so cost stays
    /// independent of the generated space's theoretical size. Ties break by
    /// lexicographic identifier for reproducibility.
    pub fn discover(&self, catalog: &Catalog, query: &str, limit: usize) -> DiscoverOutcome {
        let tokens = tokenize(query);
        if tokens.is_empty() {
            return DiscoverOutcome {
                results: Vec::new(),
                truncated: false,
            };
        }

        let pool = catalog.list(|entry| self.score(entry, &tokens) > 0.0, self.config.list_cap);

        let mut results: Vec<RankedSpike> = pool
            .entries
            .into_iter()
            .map(|entry| {
                let score = self.score(&entry, &tokens);
                RankedSpike {
                    id: entry.id,
                    name: entry.name,
                    score,
                    stack: entry.stack,
                    tags: entry.tags,
                    description: entry.description,
                }
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        let truncated = pool.truncated || results.len() > limit;
        results.truncate(limit);
        debug!(query, returned = results.len(), truncated, "discovery ranked");

        DiscoverOutcome { results, truncated }
    }

    /// Score one entry against pre-tokenized query terms
    pub fn score(&self, entry: &CatalogEntry, tokens: &[String]) -> f64 {
        let id_tokens: Vec<&str> = entry.id.split('-').collect();
        let description = entry.description.to_lowercase();
        let mut score = 0.0;

        for token in tokens {
            if id_tokens.iter().any(|t| t == token) {
                score += WEIGHT_ID_TOKEN;
            } else if entry.tags.iter().any(|t| t.eq_ignore_ascii_case(token)) {
                score += WEIGHT_TAG;
            } else if entry.stack.iter().any(|s| s.eq_ignore_ascii_case(token))
                || description.contains(token.as_str())
            {
                score += WEIGHT_TEXT;
            }

            if self.config.alias_boost_enabled {
                if let Some(target) = self.aliases.get(token) {
                    if *target == entry.id {
                        score += self.config.alias_boost;
                    }
                }
            }
        }

        score
    }

    /// Human-readable breakdown of why an entry matched
    pub fn explain_match(&self, entry: &CatalogEntry, tokens: &[String]) -> Vec<String> {
        let id_tokens: Vec<&str> = entry.id.split('-').collect();
        let description = entry.description.to_lowercase();
        let mut reasons = Vec::new();

        for token in tokens {
            if id_tokens.iter().any(|t| t == token) {
                reasons.push(format!("keyword '{token}' matched the identifier"));
            } else if entry.tags.iter().any(|t| t.eq_ignore_ascii_case(token)) {
                reasons.push(format!("keyword '{token}' matched a tag"));
            } else if entry.stack.iter().any(|s| s.eq_ignore_ascii_case(token)) {
                reasons.push(format!("keyword '{token}' matched the stack"));
            } else if description.contains(token.as_str()) {
                reasons.push(format!("keyword '{token}' matched the description"));
            }
            if self.config.alias_boost_enabled {
                if let Some(target) = self.aliases.get(token) {
                    if *target == entry.id {
                        reasons.push(format!("alias '{token}' points at this spike"));
                    }
                }
            }
        }

        reasons
    }

    /// Best score a query could possibly reach, for confidence normalization
    pub fn max_achievable(&self, tokens: &[String]) -> f64 {
        let mut max = tokens.len() as f64 * WEIGHT_ID_TOKEN;
        if self.config.alias_boost_enabled {
            max += tokens
                .iter()
                .filter(|t| self.aliases.contains_key(t.as_str()))
                .count() as f64
                * self.config.alias_boost;
        }
        max
    }
}

/// Lowercase a query into scoring terms
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

/// Built-in aliases mapping common shorthands to canonical spikes
pub fn default_aliases() -> HashMap<String, String> {
    [
        ("next", "nextjs-minimal"),
        ("jwt", "express-jwt-auth"),
        ("auth", "express-jwt-auth"),
        ("crud", "fastapi-crud"),
        ("env", "node-dotenv"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
