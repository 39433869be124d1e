//! Patch staging: compute what a patch does to existing content
//!
//! Patches never touch disk here; they transform the staged text of their
//! target, and the applier commits (or discards) the result. A `replace`
//! whose search text is absent is a conflict, resolved by the same
//! all-or-nothing rules as file conflicts.

use crate::conflict::{merge_json, MergeOutcome};
use crate::models::{PatchPayload, RenderedPatch};

/// Apply a rendered patch to the target's current (staged) content
pub fn stage_patch(existing: &str, patch: &RenderedPatch) -> MergeOutcome {
    match &patch.payload {
        PatchPayload::Prepend { content } => {
            MergeOutcome::Merged(format!("{content}{existing}"))
        }
        PatchPayload::Append { content } => {
            let mut out = existing.to_string();
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(content);
            MergeOutcome::Merged(out)
        }
        PatchPayload::Replace { search, replace } => {
            if existing.contains(search.as_str()) {
                MergeOutcome::Merged(existing.replacen(search.as_str(), replace, 1))
            } else {
                MergeOutcome::Conflict(format!("search text not found: '{search}'"))
            }
        }
        PatchPayload::Merge { content } => merge_json(existing, content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch(payload: PatchPayload) -> RenderedPatch {
        RenderedPatch {
            path: "target.txt".to_string(),
            payload,
        }
    }

    #[test]
    fn test_prepend() {
        let p = patch(PatchPayload::Prepend {
            content: "header\n".to_string(),
        });
        assert_eq!(
            stage_patch("body\n", &p),
            MergeOutcome::Merged("header\nbody\n".to_string())
        );
    }

    #[test]
    fn test_append_inserts_missing_newline() {
        let p = patch(PatchPayload::Append {
            content: ".env\n".to_string(),
        });
        assert_eq!(
            stage_patch("node_modules", &p),
            MergeOutcome::Merged("node_modules\n.env\n".to_string())
        );
    }

    #[test]
    fn test_append_to_empty() {
        let p = patch(PatchPayload::Append {
            content: "line\n".to_string(),
        });
        assert_eq!(stage_patch("", &p), MergeOutcome::Merged("line\n".to_string()));
    }

    #[test]
    fn test_replace_first_occurrence() {
        let p = patch(PatchPayload::Replace {
            search: "old".to_string(),
            replace: "new".to_string(),
        });
        assert_eq!(
            stage_patch("old old", &p),
            MergeOutcome::Merged("new old".to_string())
        );
    }

    #[test]
    fn test_replace_missing_search_is_conflict() {
        let p = patch(PatchPayload::Replace {
            search: "absent".to_string(),
            replace: "new".to_string(),
        });
        match stage_patch("content", &p) {
            MergeOutcome::Conflict(reason) => assert!(reason.contains("absent")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_patch_on_json() {
        let p = patch(PatchPayload::Merge {
            content: r#"{"dependencies":{"dotenv":"^16.0.0"}}"#.to_string(),
        });
        match stage_patch(r#"{"name":"app"}"#, &p) {
            MergeOutcome::Merged(text) => {
                assert!(text.contains("dotenv"));
                assert!(text.contains("\"name\""));
            }
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_patch_on_non_json_is_conflict() {
        let p = patch(PatchPayload::Merge {
            content: r#"{"a":1}"#.to_string(),
        });
        assert!(matches!(
            stage_patch("plain text", &p),
            MergeOutcome::Conflict(_)
        ));
    }
}
