//! Data models for rendering and application

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Caller-chosen policy for reconciling rendered output with existing files
///
/// Threaded explicitly through the applier's single commit path; there is no
/// ambient conflict configuration anywhere else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictStrategy {
    /// Replace existing files
    Overwrite,
    /// Attempt structural/line merges, flagging overlaps
    ThreeWayMerge,
    /// Any existing file is a conflict; the most conservative choice and the
    /// default
    #[default]
    Abort,
}

impl ConflictStrategy {
    /// Parse the wire spelling of a strategy
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "overwrite" => Some(ConflictStrategy::Overwrite),
            "three_way_merge" => Some(ConflictStrategy::ThreeWayMerge),
            "abort" => Some(ConflictStrategy::Abort),
            _ => None,
        }
    }
}

/// One invocation of apply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    /// Spec to apply
    pub id: String,
    /// Caller-supplied parameter values
    #[serde(default)]
    pub params: HashMap<String, String>,
    /// Conflict strategy; defaults to `abort`
    #[serde(default)]
    pub strategy: ConflictStrategy,
}

/// Per-file outcome status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// File did not exist and was written
    Created,
    /// Existing file was replaced
    Overwritten,
    /// Existing file was combined with rendered content or patched
    Merged,
    /// Not written (another outcome blocked the commit)
    Skipped,
    /// Existing state blocked this file under the chosen strategy
    Conflicted,
}

/// Outcome for one target path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    /// Path relative to the target root
    pub path: String,
    /// What happened to it
    pub status: FileStatus,
    /// Human-readable detail, mostly for conflicts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome of one apply invocation
///
/// When `success` is false no file on disk differs from its pre-apply state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyResult {
    /// Whether the commit ran
    pub success: bool,
    /// Per-path outcomes, files first, patches after
    pub files: Vec<FileOutcome>,
}

impl ApplyResult {
    /// Whether any outcome is a conflict
    pub fn has_conflicts(&self) -> bool {
        self.files
            .iter()
            .any(|f| f.status == FileStatus::Conflicted)
    }
}

/// One rendered file, ready to stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFile {
    /// Path relative to the target root, fully substituted
    pub path: String,
    /// Rendered content
    pub content: String,
}

/// Payload of a rendered patch, by operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "op")]
pub enum PatchPayload {
    /// Field-level JSON combination
    Merge {
        /// Rendered JSON document to fold in
        content: String,
    },
    /// Insert before existing content
    Prepend {
        /// Rendered text to insert
        content: String,
    },
    /// Insert after existing content
    Append {
        /// Rendered text to insert
        content: String,
    },
    /// Replace a literal search string
    Replace {
        /// Text that must exist in the target
        search: String,
        /// Replacement text
        replace: String,
    },
}

/// One rendered patch against a pre-existing file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPatch {
    /// Target path relative to the target root
    pub path: String,
    /// Operation and rendered payload
    pub payload: PatchPayload,
}

/// Everything a render produced, still entirely in memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSpike {
    /// Files to produce
    pub files: Vec<RenderedFile>,
    /// Patches against pre-existing files
    pub patches: Vec<RenderedPatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_defaults_to_abort() {
        assert_eq!(ConflictStrategy::default(), ConflictStrategy::Abort);
        let req: ApplyRequest = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert_eq!(req.strategy, ConflictStrategy::Abort);
    }

    #[test]
    fn test_strategy_wire_spellings() {
        assert_eq!(
            ConflictStrategy::parse("three_way_merge"),
            Some(ConflictStrategy::ThreeWayMerge)
        );
        assert_eq!(ConflictStrategy::parse("merge"), None);
    }

    #[test]
    fn test_file_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&FileStatus::Conflicted).unwrap(),
            "\"conflicted\""
        );
    }
}
