//! Patch applier and conflict resolver
//!
//! The only module that touches the real file tree. Every apply runs in two
//! phases: staging evaluates all paths against the chosen strategy entirely
//! in memory, then commit writes everything or nothing. Any conflicted path
//! blocks the commit, so a failed apply leaves the tree byte-identical to
//! its pre-apply state. Commits for the same target root are serialized;
//! staging runs without coordination.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::conflict::{merge_json, merge_lines, MergeOutcome};
use crate::error::ApplyError;
use crate::models::{
    ApplyResult, ConflictStrategy, FileOutcome, FileStatus, RenderedSpike,
};
use crate::patch::stage_patch;

/// Commit locks per canonical target root, shared process-wide
static ROOT_LOCKS: Lazy<DashMap<PathBuf, Arc<Mutex<()>>>> = Lazy::new(DashMap::new);

/// Applies rendered spikes to a target file tree
#[derive(Debug, Default)]
pub struct Applier;

/// One staged operation, not yet on disk
struct StagedOp {
    rel: String,
    status: FileStatus,
    note: Option<String>,
}

impl Applier {
    /// Create an applier
    pub fn new() -> Self {
        Self
    }

    /// Apply a rendered spike under the given conflict strategy
    ///
    /// # Errors
    /// [`ApplyError::PatchTargetMissing`] when a patch targets a file that
    /// does not exist (a spec misconfiguration, aborted before any write);
    /// [`ApplyError::CommitFailed`] when the filesystem fails mid-commit and
    /// reports any paths cleanup could not restore.
    pub fn apply(
        &self,
        rendered: &RenderedSpike,
        target_root: &Path,
        strategy: ConflictStrategy,
    ) -> Result<ApplyResult, ApplyError> {
        let mut ops: Vec<StagedOp> = Vec::new();
        // Final bytes per absolute path, in deterministic path order.
        let mut writes: BTreeMap<PathBuf, Vec<u8>> = BTreeMap::new();
        // First-seen disk state per path; None means the path was absent.
        let mut pre_images: HashMap<PathBuf, Option<Vec<u8>>> = HashMap::new();
        // Staged text per path, so later patches see earlier results.
        let mut staged_text: HashMap<PathBuf, String> = HashMap::new();

        for file in &rendered.files {
            let abs = target_root.join(&file.path);
            let disk = read_optional(&abs)?;
            pre_images.entry(abs.clone()).or_insert_with(|| disk.clone());

            let op = match disk {
                None => {
                    writes.insert(abs.clone(), file.content.clone().into_bytes());
                    staged_text.insert(abs, file.content.clone());
                    StagedOp {
                        rel: file.path.clone(),
                        status: FileStatus::Created,
                        note: None,
                    }
                }
                Some(existing_bytes) => match strategy {
                    ConflictStrategy::Overwrite => {
                        writes.insert(abs.clone(), file.content.clone().into_bytes());
                        staged_text.insert(abs, file.content.clone());
                        StagedOp {
                            rel: file.path.clone(),
                            status: FileStatus::Overwritten,
                            note: None,
                        }
                    }
                    ConflictStrategy::Abort => StagedOp {
                        rel: file.path.clone(),
                        status: FileStatus::Conflicted,
                        note: Some("file already exists".to_string()),
                    },
                    ConflictStrategy::ThreeWayMerge => {
                        match String::from_utf8(existing_bytes) {
                            // Binary content is never merged.
                            Err(_) => StagedOp {
                                rel: file.path.clone(),
                                status: FileStatus::Conflicted,
                                note: Some("existing content is not UTF-8 text".to_string()),
                            },
                            Ok(existing) => {
                                let outcome = if is_json_path(&file.path) {
                                    merge_json(&existing, &file.content)
                                } else {
                                    merge_lines(&existing, &file.content)
                                };
                                match outcome {
                                    MergeOutcome::Merged(text) => {
                                        writes.insert(abs.clone(), text.clone().into_bytes());
                                        staged_text.insert(abs, text);
                                        StagedOp {
                                            rel: file.path.clone(),
                                            status: FileStatus::Merged,
                                            note: None,
                                        }
                                    }
                                    MergeOutcome::Conflict(reason) => StagedOp {
                                        rel: file.path.clone(),
                                        status: FileStatus::Conflicted,
                                        note: Some(reason),
                                    },
                                }
                            }
                        }
                    }
                },
            };
            ops.push(op);
        }

        for patch in &rendered.patches {
            let abs = target_root.join(&patch.path);

            let current = match staged_text.get(&abs) {
                Some(text) => text.clone(),
                None => {
                    let disk = read_optional(&abs)?;
                    pre_images.entry(abs.clone()).or_insert_with(|| disk.clone());
                    match disk {
                        // A patch against a missing target is a hard spec
                        // error, not a mergeable situation.
                        None => {
                            warn!(path = %abs.display(), "patch target missing, aborting");
                            return Err(ApplyError::PatchTargetMissing(abs));
                        }
                        Some(bytes) => match String::from_utf8(bytes) {
                            Ok(text) => text,
                            Err(_) => {
                                ops.push(StagedOp {
                                    rel: patch.path.clone(),
                                    status: FileStatus::Conflicted,
                                    note: Some("patch target is not UTF-8 text".to_string()),
                                });
                                continue;
                            }
                        },
                    }
                }
            };

            match stage_patch(&current, patch) {
                MergeOutcome::Merged(text) => {
                    writes.insert(abs.clone(), text.clone().into_bytes());
                    staged_text.insert(abs, text);
                    ops.push(StagedOp {
                        rel: patch.path.clone(),
                        status: FileStatus::Merged,
                        note: None,
                    });
                }
                MergeOutcome::Conflict(reason) => ops.push(StagedOp {
                    rel: patch.path.clone(),
                    status: FileStatus::Conflicted,
                    note: Some(reason),
                }),
            }
        }

        // Any conflicted path blocks the whole commit.
        if ops.iter().any(|op| op.status == FileStatus::Conflicted) {
            let files = ops
                .into_iter()
                .map(|op| FileOutcome {
                    path: op.rel,
                    status: if op.status == FileStatus::Conflicted {
                        FileStatus::Conflicted
                    } else {
                        FileStatus::Skipped
                    },
                    note: op.note,
                })
                .collect();
            info!(root = %target_root.display(), "apply blocked by conflicts, nothing written");
            return Ok(ApplyResult {
                success: false,
                files,
            });
        }

        self.commit(target_root, &writes, &pre_images)?;

        let files = ops
            .into_iter()
            .map(|op| FileOutcome {
                path: op.rel,
                status: op.status,
                note: op.note,
            })
            .collect();
        info!(root = %target_root.display(), written = writes.len(), "apply committed");
        Ok(ApplyResult {
            success: true,
            files,
        })
    }

    /// Write every staged path, rolling back on the first failure
    ///
    /// Holds the per-root lock for the duration, so overlapping commits
    /// against one root never interleave. Once started, the commit runs to
    /// completion or fails atomically; there is no cancellation.
    fn commit(
        &self,
        target_root: &Path,
        writes: &BTreeMap<PathBuf, Vec<u8>>,
        pre_images: &HashMap<PathBuf, Option<Vec<u8>>>,
    ) -> Result<(), ApplyError> {
        if writes.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(target_root)?;
        let root_key = target_root
            .canonicalize()
            .unwrap_or_else(|_| target_root.to_path_buf());
        let lock = ROOT_LOCKS
            .entry(root_key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock();

        let mut written: Vec<PathBuf> = Vec::new();
        for (abs, bytes) in writes {
            let result = abs
                .parent()
                .map(fs::create_dir_all)
                .unwrap_or(Ok(()))
                .and_then(|_| fs::write(abs, bytes));

            if let Err(source) = result {
                let indeterminate = rollback(&written, pre_images);
                warn!(
                    path = %abs.display(),
                    restored = written.len() - indeterminate.len(),
                    "commit failed, rolled back"
                );
                return Err(ApplyError::CommitFailed {
                    path: abs.clone(),
                    source,
                    indeterminate,
                });
            }
            written.push(abs.clone());
        }

        debug!(count = written.len(), "commit complete");
        Ok(())
    }
}

/// Read a file that may not exist
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, ApplyError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ApplyError::IoError(e)),
    }
}

fn is_json_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map(|e| e == "json")
        .unwrap_or(false)
}

/// Best-effort restore of already-written paths
///
/// Returns the paths whose state could not be restored; the caller reports
/// them as indeterminate instead of claiming success or clean failure.
fn rollback(written: &[PathBuf], pre_images: &HashMap<PathBuf, Option<Vec<u8>>>) -> Vec<PathBuf> {
    let mut indeterminate = Vec::new();
    for path in written {
        let restore: io::Result<()> = match pre_images.get(path) {
            Some(Some(bytes)) => fs::write(path, bytes),
            Some(None) => fs::remove_file(path),
            None => Err(io::Error::new(io::ErrorKind::Other, "no pre-image recorded")),
        };
        if restore.is_err() {
            indeterminate.push(path.clone());
        }
    }
    indeterminate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatchPayload, RenderedFile, RenderedPatch};
    use tempfile::TempDir;

    fn spike(files: Vec<(&str, &str)>, patches: Vec<RenderedPatch>) -> RenderedSpike {
        RenderedSpike {
            files: files
                .into_iter()
                .map(|(path, content)| RenderedFile {
                    path: path.to_string(),
                    content: content.to_string(),
                })
                .collect(),
            patches,
        }
    }

    fn tree(dir: &TempDir) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        collect(dir.path(), dir.path(), &mut entries);
        entries.sort();
        entries
    }

    fn collect(root: &Path, dir: &Path, out: &mut Vec<(String, String)>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                collect(root, &path, out);
            } else {
                out.push((
                    path.strip_prefix(root).unwrap().display().to_string(),
                    fs::read_to_string(&path).unwrap_or_default(),
                ));
            }
        }
    }

    #[test]
    fn test_create_on_empty_root() {
        let dir = TempDir::new().unwrap();
        let result = Applier::new()
            .apply(
                &spike(vec![("src/app.ts", "content")], vec![]),
                dir.path(),
                ConflictStrategy::Abort,
            )
            .unwrap();

        assert!(result.success);
        assert_eq!(result.files[0].status, FileStatus::Created);
        assert_eq!(
            fs::read_to_string(dir.path().join("src/app.ts")).unwrap(),
            "content"
        );
    }

    #[test]
    fn test_abort_leaves_tree_untouched() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.ts"), "precious").unwrap();
        let before = tree(&dir);

        let result = Applier::new()
            .apply(
                &spike(
                    vec![("src/app.ts", "new"), ("src/other.ts", "other")],
                    vec![],
                ),
                dir.path(),
                ConflictStrategy::Abort,
            )
            .unwrap();

        assert!(!result.success);
        assert_eq!(tree(&dir), before);
        let conflicted = result
            .files
            .iter()
            .find(|f| f.path == "src/app.ts")
            .unwrap();
        assert_eq!(conflicted.status, FileStatus::Conflicted);
        let skipped = result
            .files
            .iter()
            .find(|f| f.path == "src/other.ts")
            .unwrap();
        assert_eq!(skipped.status, FileStatus::Skipped);
    }

    #[test]
    fn test_overwrite_replaces() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.ts"), "old").unwrap();

        let result = Applier::new()
            .apply(
                &spike(vec![("app.ts", "new")], vec![]),
                dir.path(),
                ConflictStrategy::Overwrite,
            )
            .unwrap();

        assert!(result.success);
        assert_eq!(result.files[0].status, FileStatus::Overwritten);
        assert_eq!(fs::read_to_string(dir.path().join("app.ts")).unwrap(), "new");
    }

    #[test]
    fn test_overwrite_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let spike = spike(vec![("a.txt", "alpha"), ("b/b.txt", "beta")], vec![]);
        let applier = Applier::new();

        applier
            .apply(&spike, dir.path(), ConflictStrategy::Overwrite)
            .unwrap();
        let first = tree(&dir);
        let result = applier
            .apply(&spike, dir.path(), ConflictStrategy::Overwrite)
            .unwrap();

        assert!(result.success);
        assert_eq!(tree(&dir), first);
        assert!(result
            .files
            .iter()
            .all(|f| f.status == FileStatus::Overwritten));
    }

    #[test]
    fn test_three_way_merge_superset() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "a\nb\n").unwrap();

        let result = Applier::new()
            .apply(
                &spike(vec![("notes.txt", "a\nmiddle\nb\n")], vec![]),
                dir.path(),
                ConflictStrategy::ThreeWayMerge,
            )
            .unwrap();

        assert!(result.success);
        assert_eq!(result.files[0].status, FileStatus::Merged);
        assert_eq!(
            fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
            "a\nmiddle\nb\n"
        );
    }

    #[test]
    fn test_three_way_merge_conflict_rolls_back_everything() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("conflict.txt"), "mine\n").unwrap();
        let before = tree(&dir);

        let result = Applier::new()
            .apply(
                &spike(
                    vec![("conflict.txt", "theirs\n"), ("fresh.txt", "fresh")],
                    vec![],
                ),
                dir.path(),
                ConflictStrategy::ThreeWayMerge,
            )
            .unwrap();

        assert!(!result.success);
        assert_eq!(tree(&dir), before);
        assert!(!dir.path().join("fresh.txt").exists());
    }

    #[test]
    fn test_json_merge_under_three_way() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name":"app"}"#).unwrap();

        let result = Applier::new()
            .apply(
                &spike(vec![("package.json", r#"{"license":"MIT"}"#)], vec![]),
                dir.path(),
                ConflictStrategy::ThreeWayMerge,
            )
            .unwrap();

        assert!(result.success);
        let merged = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert!(merged.contains("\"name\""));
        assert!(merged.contains("\"license\""));
    }

    #[test]
    fn test_binary_target_never_merges() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00, 0x01]).unwrap();

        let result = Applier::new()
            .apply(
                &spike(vec![("blob.bin", "text")], vec![]),
                dir.path(),
                ConflictStrategy::ThreeWayMerge,
            )
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.files[0].status, FileStatus::Conflicted);
        assert_eq!(
            fs::read(dir.path().join("blob.bin")).unwrap(),
            vec![0xff, 0xfe, 0x00, 0x01]
        );
    }

    #[test]
    fn test_patch_target_missing_is_hard_error() {
        let dir = TempDir::new().unwrap();
        let patches = vec![RenderedPatch {
            path: ".gitignore".to_string(),
            payload: PatchPayload::Append {
                content: ".env\n".to_string(),
            },
        }];

        let err = Applier::new()
            .apply(
                &spike(vec![("fresh.txt", "x")], patches),
                dir.path(),
                ConflictStrategy::Abort,
            )
            .unwrap_err();

        assert!(matches!(err, ApplyError::PatchTargetMissing(_)));
        // Hard errors abort before any write.
        assert!(!dir.path().join("fresh.txt").exists());
    }

    #[test]
    fn test_patch_applies_to_existing_target() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "node_modules\n").unwrap();
        let patches = vec![RenderedPatch {
            path: ".gitignore".to_string(),
            payload: PatchPayload::Append {
                content: ".env\n".to_string(),
            },
        }];

        let result = Applier::new()
            .apply(&spike(vec![], patches), dir.path(), ConflictStrategy::Abort)
            .unwrap();

        assert!(result.success);
        assert_eq!(result.files[0].status, FileStatus::Merged);
        assert_eq!(
            fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
            "node_modules\n.env\n"
        );
    }

    #[test]
    fn test_replace_conflict_blocks_whole_apply() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.txt"), "settings\n").unwrap();
        let patches = vec![RenderedPatch {
            path: "config.txt".to_string(),
            payload: PatchPayload::Replace {
                search: "absent text".to_string(),
                replace: "anything".to_string(),
            },
        }];

        let result = Applier::new()
            .apply(
                &spike(vec![("fresh.txt", "x")], patches),
                dir.path(),
                ConflictStrategy::Overwrite,
            )
            .unwrap();

        assert!(!result.success);
        assert!(!dir.path().join("fresh.txt").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("config.txt")).unwrap(),
            "settings\n"
        );
    }

    #[test]
    fn test_patch_sees_spike_created_file() {
        let dir = TempDir::new().unwrap();
        let patches = vec![RenderedPatch {
            path: "notes.txt".to_string(),
            payload: PatchPayload::Append {
                content: "appended\n".to_string(),
            },
        }];

        let result = Applier::new()
            .apply(
                &spike(vec![("notes.txt", "base\n")], patches),
                dir.path(),
                ConflictStrategy::Abort,
            )
            .unwrap();

        assert!(result.success);
        assert_eq!(
            fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
            "base\nappended\n"
        );
    }
}
