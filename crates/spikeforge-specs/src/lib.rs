#![warn(missing_docs)]

//! Spike definitions for spikeforge
//!
//! Provides the spike data model (specs, parameters, file templates, patches),
//! the YAML document format hand-authored specs are stored in, structural
//! validation of loaded documents, and the static spec store that merges the
//! built-in pack with specs discovered on disk.

pub mod error;
pub mod models;
pub mod store;
pub mod validation;

pub use error::SpecError;
pub use models::{
    FileTemplate, Param, ParamRules, ParamType, PatchOp, PatchSpec, SpikeSpec,
};
pub use store::SpecStore;
pub use validation::validate_spec;
