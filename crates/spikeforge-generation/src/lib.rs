#![warn(missing_docs)]

//! Spike rendering and application for spikeforge
//!
//! Takes a resolved spec plus caller parameters through the two render
//! phases (parameter resolution, substitution), stages the result against a
//! real file tree, and commits it atomically under the caller's conflict
//! strategy. Also hosts the validation/explain façade and the `SpikeManager`
//! operation surface the host protocol layer calls into.

pub mod applier;
pub mod conflict;
pub mod error;
pub mod explain;
pub mod manager;
pub mod models;
pub mod params;
pub mod patch;
pub mod renderer;
pub mod templates;
pub mod validation;

pub use applier::Applier;
pub use error::{ApplyError, RenderError, SpikeError};
pub use manager::SpikeManager;
pub use models::{
    ApplyRequest, ApplyResult, ConflictStrategy, FileOutcome, FileStatus, PatchPayload,
    RenderedFile, RenderedPatch, RenderedSpike,
};
pub use params::{resolve_params, ParamValue};
pub use renderer::render;
pub use validation::{AnalyzerError, AnalyzerIssue, SpikeAnalyzer, ValidationCheck, ValidationReport};
