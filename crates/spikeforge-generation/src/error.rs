//! Error types for rendering and application

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving parameters or substituting templates
///
/// All of these are recoverable: the caller corrects its parameters (or the
/// spec author fixes the template) and retries. Nothing here ever leaves
/// partial output behind.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A required parameter has neither a caller value nor a default
    #[error("Missing required parameter: {0}")]
    MissingParam(String),

    /// A supplied value violates the parameter's declared type or rules
    #[error("Invalid value for parameter '{name}': {rule}")]
    InvalidParam {
        /// Offending parameter name
        name: String,
        /// The violated rule, in words
        rule: String,
    },

    /// Template syntax error
    #[error("Template syntax error at line {line}: {message}")]
    Syntax {
        /// Line within the template
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A placeholder survived substitution
    #[error("Unresolved placeholder '{{{{{0}}}}}'")]
    UnresolvedPlaceholder(String),

    /// A rendered path escaped the target root or was empty
    #[error("Rendered path '{0}' is not a safe relative path")]
    InvalidPath(String),

    /// Two file templates rendered to the same path
    #[error("Duplicate rendered path: {0}")]
    DuplicateRenderedPath(String),
}

/// Errors raised while applying a rendered spike to disk
#[derive(Debug, Error)]
pub enum ApplyError {
    /// A patch targets a file that does not exist
    ///
    /// A misconfigured spec, not a legitimate merge situation; the whole
    /// operation aborts before any disk mutation.
    #[error("Patch target missing: {}", .0.display())]
    PatchTargetMissing(PathBuf),

    /// The commit phase failed partway and cleanup could not restore every path
    #[error("Commit failed at {}: {source}; indeterminate paths: {indeterminate:?}", .path.display())]
    CommitFailed {
        /// Path whose write failed
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
        /// Paths best-effort cleanup could not restore
        indeterminate: Vec<PathBuf>,
    },

    /// Filesystem failure outside the commit phase
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Top-level error for the operation surface
#[derive(Debug, Error)]
pub enum SpikeError {
    /// Catalog lookup failed
    #[error(transparent)]
    Catalog(#[from] spikeforge_catalog::CatalogError),

    /// Rendering failed
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Application failed
    #[error(transparent)]
    Apply(#[from] ApplyError),
}
