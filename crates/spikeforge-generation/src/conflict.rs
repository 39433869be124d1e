//! Merge algorithms for the three-way-merge strategy
//!
//! Two shapes of content are merged, both deterministically:
//! - JSON documents get a field-level combination: existing fields are
//!   preserved, new fields are added, and a shared scalar field with a
//!   different value on each side is a conflict.
//! - Line-oriented text merges when one side's lines are an ordered
//!   subsequence of the other's (the superset wins); anything else is a
//!   conflict.
//! Content that is not valid UTF-8 is never merged and never guessed at.

use serde_json::Value;

/// Outcome of a merge attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Merge succeeded with this content
    Merged(String),
    /// Merge refused; the reason names the blocking field or shape
    Conflict(String),
}

/// Field-level combination of two JSON documents
pub fn merge_json(existing: &str, incoming: &str) -> MergeOutcome {
    let Ok(base) = serde_json::from_str::<Value>(existing) else {
        return MergeOutcome::Conflict("existing content is not valid JSON".to_string());
    };
    let Ok(overlay) = serde_json::from_str::<Value>(incoming) else {
        return MergeOutcome::Conflict("incoming content is not valid JSON".to_string());
    };

    let mut conflicts = Vec::new();
    let merged = merge_value("$", &base, &overlay, &mut conflicts);

    if let Some(first) = conflicts.first() {
        return MergeOutcome::Conflict(format!(
            "conflicting fields: {} ({} total)",
            first,
            conflicts.len()
        ));
    }

    // serde_json maps are key-ordered, so serialization is deterministic.
    match serde_json::to_string_pretty(&merged) {
        Ok(mut text) => {
            text.push('\n');
            MergeOutcome::Merged(text)
        }
        Err(e) => MergeOutcome::Conflict(format!("failed to serialize merged JSON: {e}")),
    }
}

fn merge_value(path: &str, base: &Value, overlay: &Value, conflicts: &mut Vec<String>) -> Value {
    match (base, overlay) {
        (Value::Object(b), Value::Object(o)) => {
            let mut merged = b.clone();
            for (key, incoming) in o {
                let child_path = format!("{path}.{key}");
                match b.get(key) {
                    Some(existing) => {
                        let value = merge_value(&child_path, existing, incoming, conflicts);
                        merged.insert(key.clone(), value);
                    }
                    None => {
                        merged.insert(key.clone(), incoming.clone());
                    }
                }
            }
            Value::Object(merged)
        }
        _ if base == overlay => base.clone(),
        // Differing scalars (or mismatched shapes) keep the existing value
        // and flag the field.
        _ => {
            conflicts.push(path.to_string());
            base.clone()
        }
    }
}

/// Line-oriented merge of two text contents
pub fn merge_lines(existing: &str, incoming: &str) -> MergeOutcome {
    if existing == incoming {
        return MergeOutcome::Merged(incoming.to_string());
    }

    let existing_lines: Vec<&str> = existing.lines().collect();
    let incoming_lines: Vec<&str> = incoming.lines().collect();

    if is_subsequence(&existing_lines, &incoming_lines) {
        return MergeOutcome::Merged(incoming.to_string());
    }
    if is_subsequence(&incoming_lines, &existing_lines) {
        return MergeOutcome::Merged(existing.to_string());
    }

    MergeOutcome::Conflict("overlapping line changes".to_string())
}

/// Whether `needle`'s lines appear in `haystack` in order
fn is_subsequence(needle: &[&str], haystack: &[&str]) -> bool {
    let mut position = 0;
    for line in needle {
        match haystack[position..].iter().position(|h| h == line) {
            Some(offset) => position += offset + 1,
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_merge_adds_new_fields() {
        let existing = r#"{"name":"app","scripts":{"dev":"next dev"}}"#;
        let incoming = r#"{"dependencies":{"dotenv":"^16.0.0"}}"#;
        match merge_json(existing, incoming) {
            MergeOutcome::Merged(text) => {
                assert!(text.contains("\"dotenv\""));
                assert!(text.contains("\"dev\""));
            }
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[test]
    fn test_json_merge_preserves_existing_on_equal() {
        let existing = r#"{"a":1,"b":{"c":2}}"#;
        let incoming = r#"{"b":{"c":2}}"#;
        assert!(matches!(
            merge_json(existing, incoming),
            MergeOutcome::Merged(_)
        ));
    }

    #[test]
    fn test_json_merge_flags_conflicting_scalar() {
        let existing = r#"{"version":"1.0.0"}"#;
        let incoming = r#"{"version":"2.0.0"}"#;
        match merge_json(existing, incoming) {
            MergeOutcome::Conflict(reason) => assert!(reason.contains("version")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_json_merge_nested_conflict_names_path() {
        let existing = r#"{"scripts":{"dev":"old"}}"#;
        let incoming = r#"{"scripts":{"dev":"new"}}"#;
        match merge_json(existing, incoming) {
            MergeOutcome::Conflict(reason) => assert!(reason.contains("scripts.dev")),
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_json_merge_rejects_non_json() {
        assert!(matches!(
            merge_json("not json", "{}"),
            MergeOutcome::Conflict(_)
        ));
        assert!(matches!(
            merge_json("{}", "not json"),
            MergeOutcome::Conflict(_)
        ));
    }

    #[test]
    fn test_json_merge_is_deterministic() {
        let existing = r#"{"z":1,"a":2}"#;
        let incoming = r#"{"m":3}"#;
        let a = merge_json(existing, incoming);
        let b = merge_json(existing, incoming);
        assert_eq!(a, b);
    }

    #[test]
    fn test_lines_identical() {
        assert_eq!(
            merge_lines("a\nb\n", "a\nb\n"),
            MergeOutcome::Merged("a\nb\n".to_string())
        );
    }

    #[test]
    fn test_lines_superset_wins() {
        let existing = "a\nb\n";
        let incoming = "a\nmiddle\nb\nend\n";
        assert_eq!(
            merge_lines(existing, incoming),
            MergeOutcome::Merged(incoming.to_string())
        );
        // Symmetric: existing may be the superset.
        assert_eq!(
            merge_lines(incoming, existing),
            MergeOutcome::Merged(incoming.to_string())
        );
    }

    #[test]
    fn test_lines_overlap_is_conflict() {
        let existing = "shared\nmine\n";
        let incoming = "shared\ntheirs\n";
        assert!(matches!(
            merge_lines(existing, incoming),
            MergeOutcome::Conflict(_)
        ));
    }

    #[test]
    fn test_subsequence_respects_order() {
        // Same lines, different order: not a subsequence.
        assert!(matches!(
            merge_lines("a\nb\n", "b\na\n"),
            MergeOutcome::Conflict(_)
        ));
    }
}
