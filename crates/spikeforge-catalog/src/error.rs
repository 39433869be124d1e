//! Error types for catalog operations

use thiserror::Error;

/// Errors that can occur while resolving or listing the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Identifier or axis value outside the known space
    ///
    /// Recoverable: callers probe speculative identifiers and should retry
    /// with a different one.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A spec document failed to load or validate
    #[error(transparent)]
    Spec(#[from] spikeforge_specs::SpecError),

    /// Engine configuration could not be read
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
