//! End-to-end scenarios across the spike engine

use std::collections::{BTreeMap, HashMap};
use std::fs;

use tempfile::TempDir;

use spikeforge_generation::{
    ApplyRequest, ConflictStrategy, FileStatus, SpikeError, SpikeManager,
};

fn manager() -> SpikeManager {
    SpikeManager::builtin().unwrap()
}

fn nextjs_params() -> HashMap<String, String> {
    HashMap::from([
        ("app_name".to_string(), "demo".to_string()),
        ("port".to_string(), "4000".to_string()),
    ])
}

#[test]
fn apply_nextjs_minimal_then_reapply_with_overwrite() {
    let dir = TempDir::new().unwrap();
    let m = manager();
    let request = ApplyRequest {
        id: "nextjs-minimal".to_string(),
        params: nextjs_params(),
        strategy: ConflictStrategy::Overwrite,
    };

    let first = m.apply(&request, dir.path()).unwrap();
    assert!(first.success);
    assert!(first.files.iter().all(|f| f.status == FileStatus::Created));

    let package_json = fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert!(package_json.contains("demo"));
    assert!(package_json.contains("4000"));

    let second = m.apply(&request, dir.path()).unwrap();
    assert!(second.success);
    assert!(second
        .files
        .iter()
        .all(|f| f.status == FileStatus::Overwritten));
    assert!(!second
        .files
        .iter()
        .any(|f| f.status == FileStatus::Conflicted));

    // Applying twice leaves the same tree as applying once.
    assert_eq!(
        fs::read_to_string(dir.path().join("package.json")).unwrap(),
        package_json
    );
}

#[test]
fn discover_jwt_auth_stays_on_topic() {
    let m = manager();
    let outcome = m.discover("jwt auth", 5);

    assert!(!outcome.results.is_empty());
    assert!(outcome.results.len() <= 5);
    for result in &outcome.results {
        let on_topic = result.id.contains("jwt")
            || result.id.contains("auth")
            || result
                .tags
                .iter()
                .any(|t| t.contains("jwt") || t.contains("auth"));
        assert!(on_topic, "{} is off-topic for 'jwt auth'", result.id);
    }
}

#[test]
fn abort_strategy_never_touches_existing_files() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("package.json"), "{\"name\":\"precious\"}").unwrap();

    let m = manager();
    let request = ApplyRequest {
        id: "nextjs-minimal".to_string(),
        params: nextjs_params(),
        strategy: ConflictStrategy::Abort,
    };

    let result = m.apply(&request, dir.path()).unwrap();
    assert!(!result.success);
    assert_eq!(
        fs::read_to_string(dir.path().join("package.json")).unwrap(),
        "{\"name\":\"precious\"}"
    );
    // Nothing else was written either.
    assert!(!dir.path().join("pages/index.tsx").exists());
    assert!(!dir.path().join("tsconfig.json").exists());
}

#[test]
fn missing_required_parameter_is_rejected_by_name() {
    let dir = TempDir::new().unwrap();
    let m = manager();
    let request = ApplyRequest {
        id: "nextjs-minimal".to_string(),
        params: HashMap::new(),
        strategy: ConflictStrategy::Overwrite,
    };

    let err = m.apply(&request, dir.path()).unwrap_err();
    match err {
        SpikeError::Render(e) => assert!(e.to_string().contains("app_name")),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn preview_renders_both_static_and_generated() {
    let m = manager();

    let rendered = m.preview("nextjs-minimal", &nextjs_params()).unwrap();
    assert_eq!(rendered.files.len(), 3);

    let generated = m
        .preview("gen-fastapi-crud-testing-python", &HashMap::new())
        .unwrap();
    assert_eq!(generated.files.len(), 2);
    assert!(generated.files[0].path.ends_with(".py"));
}

#[test]
fn dotenv_patches_merge_into_existing_project() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        "{\"name\":\"app\",\"dependencies\":{\"express\":\"^4.0.0\"}}",
    )
    .unwrap();
    fs::write(dir.path().join(".gitignore"), "node_modules\n").unwrap();

    let m = manager();
    let request = ApplyRequest {
        id: "node-dotenv".to_string(),
        params: HashMap::new(),
        strategy: ConflictStrategy::Abort,
    };

    let result = m.apply(&request, dir.path()).unwrap();
    assert!(result.success, "outcomes: {:?}", result.files);

    let package_json = fs::read_to_string(dir.path().join("package.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&package_json).unwrap();
    assert_eq!(parsed["dependencies"]["dotenv"], "^16.4.5");
    assert_eq!(parsed["dependencies"]["express"], "^4.0.0");
    assert_eq!(parsed["name"], "app");
    assert_eq!(
        fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
        "node_modules\n.env\n"
    );
    assert!(dir.path().join(".env.example").exists());
}

#[test]
fn dotenv_against_empty_project_is_a_hard_error() {
    let dir = TempDir::new().unwrap();
    let m = manager();
    let request = ApplyRequest {
        id: "node-dotenv".to_string(),
        params: HashMap::new(),
        strategy: ConflictStrategy::Abort,
    };

    let err = m.apply(&request, dir.path()).unwrap_err();
    match err {
        SpikeError::Apply(e) => assert!(e.to_string().contains("package.json")),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(!dir.path().join(".env.example").exists());
}

#[test]
fn auto_select_respects_constraints() {
    let m = manager();

    let unconstrained = m.auto_select("crud rest api", &BTreeMap::new()).unwrap();
    assert_eq!(unconstrained.id, "fastapi-crud");

    let mut constraints = BTreeMap::new();
    constraints.insert("language".to_string(), "cobol".to_string());
    assert!(m.auto_select("crud rest api", &constraints).is_none());
}

#[test]
fn validate_reports_missing_and_present() {
    let dir = TempDir::new().unwrap();
    let m = manager();
    let params = nextjs_params();

    let before = m.validate("nextjs-minimal", &params, dir.path()).unwrap();
    assert!(before.score < 1.0);

    let request = ApplyRequest {
        id: "nextjs-minimal".to_string(),
        params: params.clone(),
        strategy: ConflictStrategy::Overwrite,
    };
    m.apply(&request, dir.path()).unwrap();

    let after = m.validate("nextjs-minimal", &params, dir.path()).unwrap();
    assert_eq!(after.score, 1.0);
    assert!(after.findings.is_empty());
}

#[test]
fn explain_requires_no_disk_and_documents_params() {
    let m = manager();
    let text = m.explain("express-jwt-auth").unwrap();
    assert!(text.contains("express-jwt-auth"));
    assert!(text.contains("`secret_env`"));
    assert!(text.contains("## Files"));
}

#[test]
fn conditional_component_renders_both_ways() {
    let m = manager();

    let with_props = m
        .preview(
            "react-component",
            &HashMap::from([
                ("component_name".to_string(), "user card".to_string()),
                ("with_props".to_string(), "true".to_string()),
            ]),
        )
        .unwrap();
    assert_eq!(with_props.files[0].path, "src/components/UserCard.tsx");
    assert!(with_props.files[0].content.contains("UserCardProps"));

    let without = m
        .preview(
            "react-component",
            &HashMap::from([("component_name".to_string(), "user card".to_string())]),
        )
        .unwrap();
    assert!(!without.files[0].content.contains("UserCardProps"));
    assert!(without.files[0].content.contains("function UserCard()"));
}

#[test]
fn list_iteration_renders_fields() {
    let m = manager();
    let rendered = m
        .preview(
            "fastapi-crud",
            &HashMap::from([
                ("resource".to_string(), "Order".to_string()),
                ("fields".to_string(), "id,total,status".to_string()),
            ]),
        )
        .unwrap();

    let content = &rendered.files[0].content;
    assert_eq!(rendered.files[0].path, "app/routers/order.py");
    assert!(content.contains("class Order(BaseModel)"));
    assert!(content.contains("id: str"));
    assert!(content.contains("total: str"));
    assert!(content.contains("status: str"));
}
