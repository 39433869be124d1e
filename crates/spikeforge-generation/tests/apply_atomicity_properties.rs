//! Property-based tests for all-or-nothing application

use std::fs;
use std::path::Path;

use proptest::prelude::*;
use tempfile::TempDir;

use spikeforge_generation::{
    Applier, ConflictStrategy, RenderedFile, RenderedSpike,
};

fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut entries = Vec::new();
    walk(root, root, &mut entries);
    entries.sort();
    entries
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            walk(root, &path, out);
        } else {
            out.push((
                path.strip_prefix(root).unwrap().display().to_string(),
                fs::read(&path).unwrap(),
            ));
        }
    }
}

fn spike(files: Vec<(String, String)>) -> RenderedSpike {
    RenderedSpike {
        files: files
            .into_iter()
            .map(|(path, content)| RenderedFile { path, content })
            .collect(),
        patches: vec![],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Abort against any pre-existing collision leaves the tree
    /// byte-identical, whatever else the spike would have created.
    #[test]
    fn prop_abort_is_all_or_nothing(
        existing_content in "[ -~]{0,64}",
        new_content in "[ -~]{0,64}",
        extra_files in prop::collection::vec(("[a-z]{1,8}\\.txt", "[ -~]{0,32}"), 0..4),
    ) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("collide.txt"), &existing_content).unwrap();
        let before = snapshot(dir.path());

        let mut files = vec![("collide.txt".to_string(), new_content)];
        for (name, content) in extra_files {
            if name != "collide.txt" {
                files.push((name, content));
            }
        }

        let result = Applier::new()
            .apply(&spike(files), dir.path(), ConflictStrategy::Abort)
            .unwrap();

        prop_assert!(!result.success);
        prop_assert_eq!(snapshot(dir.path()), before);
    }

    /// Overwrite twice equals overwrite once.
    #[test]
    fn prop_overwrite_is_idempotent(
        content_a in "[ -~]{0,64}",
        content_b in "[ -~]{0,64}",
    ) {
        let dir = TempDir::new().unwrap();
        let spike = spike(vec![
            ("a.txt".to_string(), content_a),
            ("nested/b.txt".to_string(), content_b),
        ]);
        let applier = Applier::new();

        applier.apply(&spike, dir.path(), ConflictStrategy::Overwrite).unwrap();
        let once = snapshot(dir.path());
        let again = applier.apply(&spike, dir.path(), ConflictStrategy::Overwrite).unwrap();

        prop_assert!(again.success);
        prop_assert_eq!(snapshot(dir.path()), once);
    }

    /// A successful create commits exactly the rendered bytes.
    #[test]
    fn prop_created_files_match_rendered_bytes(content in "[ -~]{0,128}") {
        let dir = TempDir::new().unwrap();
        let result = Applier::new()
            .apply(
                &spike(vec![("out/file.txt".to_string(), content.clone())]),
                dir.path(),
                ConflictStrategy::Abort,
            )
            .unwrap();

        prop_assert!(result.success);
        prop_assert_eq!(fs::read_to_string(dir.path().join("out/file.txt")).unwrap(), content);
    }
}
