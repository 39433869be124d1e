//! Error types for spec loading and validation

use thiserror::Error;

/// Errors that can occur while loading or validating spike specs
#[derive(Debug, Error)]
pub enum SpecError {
    /// Spec document could not be parsed
    #[error("Failed to parse spec document {path}: {source}")]
    ParseError {
        /// Path or label of the offending document
        path: String,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// Spec id is already taken by another static spec
    #[error("Duplicate spec id: {0}")]
    DuplicateId(String),

    /// Static spec ids must not use the generated-identifier prefix
    #[error("Spec id '{0}' uses the reserved 'gen-' prefix")]
    ReservedPrefix(String),

    /// Two file templates in one spec render to the same path template
    #[error("Spec '{spec}' declares duplicate file path: {path}")]
    DuplicateFilePath {
        /// Spec id
        spec: String,
        /// The duplicated path template
        path: String,
    },

    /// A template references a parameter the spec never declares
    #[error("Spec '{spec}' references undeclared parameter '{param}'")]
    UndeclaredParam {
        /// Spec id
        spec: String,
        /// The undeclared parameter name
        param: String,
    },

    /// Two parameters share a name
    #[error("Spec '{spec}' declares parameter '{param}' more than once")]
    DuplicateParam {
        /// Spec id
        spec: String,
        /// The duplicated parameter name
        param: String,
    },

    /// A structural rule of the spec format is violated
    #[error("Spec '{spec}' is invalid: {reason}")]
    InvalidSpec {
        /// Spec id
        spec: String,
        /// What is wrong with it
        reason: String,
    },

    /// IO error while reading spec documents
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
