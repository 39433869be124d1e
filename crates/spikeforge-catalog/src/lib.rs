#![warn(missing_docs)]

//! Spike catalog for spikeforge
//!
//! Presents one merged namespace over hand-authored specs and the generated
//! identifier space. The generated side is a pure function of the identifier:
//! four closed axes (library, pattern, style, language) are crossed lazily
//! and synthesized into specs on demand, never materialized in bulk. On top
//! of the catalog sit free-text discovery with weighted ranking and the
//! auto-selection engine.

pub mod autoselect;
pub mod axes;
pub mod config;
pub mod discovery;
pub mod enumerator;
pub mod error;
pub mod resolver;
pub mod synth;

pub use autoselect::{AutoSelector, Selection};
pub use axes::{AxisKind, AxisTuple, PatternCategory, Style};
pub use config::EngineConfig;
pub use discovery::{Discovery, DiscoverOutcome, RankedSpike};
pub use enumerator::{parse_id, synthesize_ids, IdSpace};
pub use error::CatalogError;
pub use resolver::{Catalog, CatalogEntry, ListOutcome};
