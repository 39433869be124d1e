//! Core data models for spike specs

use serde::{Deserialize, Serialize};

/// A fully resolved spike definition
///
/// Both hand-authored specs (loaded from YAML documents) and generated specs
/// (synthesized from an identifier) share this shape. Instances are immutable
/// once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpikeSpec {
    /// Globally unique identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Version string
    #[serde(default = "default_version")]
    pub version: String,
    /// Technology stack tags (framework, language)
    #[serde(default)]
    pub stack: Vec<String>,
    /// Free-text tags used by discovery
    #[serde(default)]
    pub tags: Vec<String>,
    /// What this spike scaffolds
    #[serde(default)]
    pub description: String,
    /// Declared template parameters, in declaration order
    #[serde(default)]
    pub params: Vec<Param>,
    /// Files this spike produces
    #[serde(default)]
    pub files: Vec<FileTemplate>,
    /// Modifications to pre-existing files
    #[serde(default)]
    pub patches: Vec<PatchSpec>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl SpikeSpec {
    /// Look up a declared parameter by name
    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// A declared template variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name, unique within a spec
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// Whether the caller must supply a value when no default exists
    #[serde(default)]
    pub required: bool,
    /// Default value used when the caller supplies none
    #[serde(default)]
    pub default: Option<String>,
    /// Value type the supplied value is checked against
    #[serde(default, rename = "type")]
    pub param_type: ParamType,
    /// Additional validation rules
    #[serde(default)]
    pub rules: Option<ParamRules>,
}

/// Value type of a declared parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Free-form string
    #[default]
    String,
    /// Numeric value (integer or decimal)
    Number,
    /// Boolean, accepted as `true`/`false`
    Boolean,
    /// One of a closed set of options (see [`ParamRules::options`])
    Enum,
    /// Comma-separated list, iterable from templates
    List,
}

/// Validation rules attached to a parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamRules {
    /// Regex the value must match
    #[serde(default)]
    pub pattern: Option<String>,
    /// Minimum numeric value (inclusive)
    #[serde(default)]
    pub min: Option<f64>,
    /// Maximum numeric value (inclusive)
    #[serde(default)]
    pub max: Option<f64>,
    /// Allowed values for enum parameters
    #[serde(default)]
    pub options: Vec<String>,
}

/// One file a spike produces
///
/// Both the path and the content are templates; the path may itself contain
/// `{{param}}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTemplate {
    /// Path template, relative to the target root
    pub path: String,
    /// Content template
    pub content: String,
}

/// A modification to a file that already exists on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchSpec {
    /// Target path template, relative to the target root
    pub path: String,
    /// What to do to the target
    pub op: PatchOp,
    /// Payload content template (for merge/prepend/append)
    #[serde(default)]
    pub content: Option<String>,
    /// Text that must exist literally in the target (for replace)
    #[serde(default)]
    pub search: Option<String>,
    /// Replacement text (for replace)
    #[serde(default)]
    pub replace: Option<String>,
}

/// Patch operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Field-level combination of structured (JSON) content
    Merge,
    /// Insert payload before the existing content
    Prepend,
    /// Insert payload after the existing content
    Append,
    /// Replace a literal search string
    Replace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_deserializes_with_defaults() {
        let yaml = r#"
id: demo
name: Demo spike
"#;
        let spec: SpikeSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(spec.id, "demo");
        assert_eq!(spec.version, "0.1.0");
        assert!(spec.params.is_empty());
        assert!(spec.files.is_empty());
        assert!(spec.patches.is_empty());
    }

    #[test]
    fn test_param_type_lowercase_names() {
        let yaml = r#"
name: port
type: number
default: "3000"
"#;
        let param: Param = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(param.param_type, ParamType::Number);
        assert_eq!(param.default.as_deref(), Some("3000"));
        assert!(!param.required);
    }

    #[test]
    fn test_patch_op_names() {
        let op: PatchOp = serde_yaml::from_str("replace").unwrap();
        assert_eq!(op, PatchOp::Replace);
        assert!(serde_yaml::from_str::<PatchOp>("rewrite").is_err());
    }

    #[test]
    fn test_param_lookup() {
        let yaml = r#"
id: demo
name: Demo
params:
  - name: app_name
    required: true
"#;
        let spec: SpikeSpec = serde_yaml::from_str(yaml).unwrap();
        assert!(spec.param("app_name").is_some());
        assert!(spec.param("missing").is_none());
    }
}
