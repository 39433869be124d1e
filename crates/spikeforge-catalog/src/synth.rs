//! Table-driven synthesis of generated specs
//!
//! A generated spec is a pure function of its axis tuple. Content is composed
//! from per-category bodies and per-style overlays keyed by the language's
//! block convention, so a new axis value composes with every existing one
//! without bespoke string code. Synthesized scaffolds are prototyping
//! sketches; they are never executed by this engine.

use spikeforge_specs::models::{FileTemplate, Param, ParamRules, ParamType, SpikeSpec};

use crate::axes::{
    category_of, language_info, BlockSyntax, LanguageInfo, PatternCategory, Style,
};
use crate::enumerator::identifier;
use crate::AxisTuple;

/// Lightweight catalog metadata for a tuple, without file bodies
///
/// Discovery scores thousands of generated candidates; this is the cheap
/// path that avoids synthesizing content for each of them.
#[derive(Debug, Clone)]
pub struct SynthSummary {
    /// Full identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Stack tags
    pub stack: Vec<String>,
    /// Discovery tags
    pub tags: Vec<String>,
    /// One-line description
    pub description: String,
}

/// Summarize a tuple without synthesizing file content
pub fn summary(tuple: &AxisTuple) -> SynthSummary {
    let category = category_of(&tuple.pattern);
    SynthSummary {
        id: identifier(tuple),
        name: format!(
            "{} {} spike ({}, {})",
            tuple.library,
            tuple.pattern,
            tuple.style.as_str(),
            tuple.language
        ),
        stack: vec![tuple.library.clone(), tuple.language.clone()],
        tags: vec![
            tuple.library.clone(),
            tuple.pattern.clone(),
            tuple.style.as_str().to_string(),
            tuple.language.clone(),
            category.as_str().to_string(),
        ],
        description: format!(
            "Generated {} {} spike for {} in {}.",
            tuple.style.as_str(),
            tuple.pattern,
            tuple.library,
            tuple.language
        ),
    }
}

/// Synthesize the full spec for a tuple
///
/// Deterministic: the same tuple always yields a byte-identical spec.
pub fn synthesize_spec(tuple: &AxisTuple) -> SpikeSpec {
    let meta = summary(tuple);
    let category = category_of(&tuple.pattern);
    // Language values come from the closed set, so info is always present.
    let lang = language_info(&tuple.language).expect("language in closed set");

    let mut params = vec![Param {
        name: "name".to_string(),
        description: "Scaffold name, used for file and symbol names".to_string(),
        required: false,
        default: Some("demo".to_string()),
        param_type: ParamType::String,
        rules: Some(ParamRules {
            pattern: Some("^[A-Za-z][A-Za-z0-9_ -]*$".to_string()),
            ..ParamRules::default()
        }),
    }];
    if category == PatternCategory::Endpoint {
        params.push(Param {
            name: "port".to_string(),
            description: "Port the scaffolded endpoint mentions".to_string(),
            required: false,
            default: Some("3000".to_string()),
            param_type: ParamType::Number,
            rules: Some(ParamRules {
                min: Some(1.0),
                max: Some(65535.0),
                ..ParamRules::default()
            }),
        });
    }

    let mut files = vec![FileTemplate {
        path: main_path(lang),
        content: main_content(tuple, category, lang),
    }];
    if tuple.style == Style::Testing {
        files.push(FileTemplate {
            path: test_path(lang),
            content: test_content(tuple, lang),
        });
    }

    SpikeSpec {
        id: meta.id,
        name: meta.name,
        version: "0.1.0".to_string(),
        stack: meta.stack,
        tags: meta.tags,
        description: meta.description,
        params,
        files,
        patches: vec![],
    }
}

fn main_path(lang: &LanguageInfo) -> String {
    format!("{}/{{{{name_snake}}}}.{}", lang.src_dir, lang.ext)
}

fn test_path(lang: &LanguageInfo) -> String {
    match lang.block {
        BlockSyntax::Braces => format!("{}/{{{{name_snake}}}}.test.{}", lang.src_dir, lang.ext),
        BlockSyntax::Indent => "tests/test_{{name_snake}}.py".to_string(),
        BlockSyntax::DefEnd => format!("test/{{{{name_snake}}}}_test.{}", lang.ext),
    }
}

fn main_content(tuple: &AxisTuple, category: PatternCategory, lang: &LanguageInfo) -> String {
    let c = lang.comment;
    let mut lines = vec![
        format!(
            "{c} {{{{name_pascal}}}}: {} {} spike ({})",
            tuple.library,
            tuple.pattern,
            tuple.style.as_str()
        ),
        format!("{c} Generated scaffold for rapid prototyping; shape it before shipping."),
        String::new(),
    ];

    lines.push(decl_open(lang));
    if tuple.style == Style::Secure {
        lines.extend(secure_block(lang));
    }
    lines.extend(category_body(tuple, category, lang));
    if let Some(close) = decl_close(lang) {
        lines.push(close);
    }

    if tuple.style == Style::Advanced {
        lines.push(String::new());
        lines.push(format!("{c} Example usage:"));
        lines.push(format!("{c}   result = {{{{name_snake}}}}(sample_payload)"));
        lines.push(format!("{c}   inspect(result)"));
    }

    lines.join("\n") + "\n"
}

fn decl_open(lang: &LanguageInfo) -> String {
    match lang.block {
        BlockSyntax::Braces => "function {{name_camel}}(payload) {".to_string(),
        BlockSyntax::Indent => "def {{name_snake}}(payload):".to_string(),
        BlockSyntax::DefEnd => "def {{name_snake}}(payload)".to_string(),
    }
}

fn decl_close(lang: &LanguageInfo) -> Option<String> {
    match lang.block {
        BlockSyntax::Braces => Some("}".to_string()),
        BlockSyntax::Indent => None,
        BlockSyntax::DefEnd => Some("end".to_string()),
    }
}

/// Validation and auth-boundary scaffolding injected by the `secure` style
fn secure_block(lang: &LanguageInfo) -> Vec<String> {
    let c = lang.comment;
    match lang.block {
        BlockSyntax::Braces => vec![
            format!("  {c} Input validation: reject malformed payloads before domain logic."),
            format!("  {c} Auth boundary: verify the caller's identity and scopes here."),
            "  if (!payload) {".to_string(),
            "    throw new Error(\"rejected: invalid payload\");".to_string(),
            "  }".to_string(),
        ],
        BlockSyntax::Indent => vec![
            format!("    {c} Input validation: reject malformed payloads before domain logic."),
            format!("    {c} Auth boundary: verify the caller's identity and scopes here."),
            "    if not payload:".to_string(),
            "        raise ValueError(\"rejected: invalid payload\")".to_string(),
        ],
        BlockSyntax::DefEnd => vec![
            format!("  {c} Input validation: reject malformed payloads before domain logic."),
            format!("  {c} Auth boundary: verify the caller's identity and scopes here."),
            "  if payload == nil".to_string(),
            "    raise \"rejected: invalid payload\"".to_string(),
            "  end".to_string(),
        ],
    }
}

fn category_body(
    tuple: &AxisTuple,
    category: PatternCategory,
    lang: &LanguageInfo,
) -> Vec<String> {
    let c = lang.comment;
    let lead = match category {
        PatternCategory::Endpoint => format!(
            "Handle the {} request and shape the {} response.",
            tuple.pattern, tuple.library
        ),
        PatternCategory::Service => format!(
            "Wire this into the {} {} layer.",
            tuple.library, tuple.pattern
        ),
        PatternCategory::Data => format!(
            "Describe the record this {} moves and where it lives.",
            tuple.pattern
        ),
        PatternCategory::Ui => format!("Render the {} for {}.", tuple.pattern, tuple.library),
        PatternCategory::Client => format!(
            "Call the remote {} endpoint and return its payload.",
            tuple.library
        ),
    };

    let indent = match lang.block {
        BlockSyntax::Indent => "    ",
        _ => "  ",
    };
    let mut lines = vec![format!("{indent}{c} {lead}")];

    let result = match (category, lang.block) {
        (PatternCategory::Endpoint, BlockSyntax::Braces) => {
            "  return { ok: true, service: \"{{name_kebab}}\", port: {{port}} };"
        }
        (PatternCategory::Endpoint, BlockSyntax::Indent) => {
            "    return {\"ok\": True, \"service\": \"{{name_snake}}\", \"port\": {{port}}}"
        }
        (PatternCategory::Endpoint, BlockSyntax::DefEnd) => {
            "  { ok: true, service: \"{{name_snake}}\", port: {{port}} }"
        }
        (PatternCategory::Service, BlockSyntax::Braces) => "  return payload;",
        (PatternCategory::Service, BlockSyntax::Indent) => "    return payload",
        (PatternCategory::Service, BlockSyntax::DefEnd) => "  payload",
        (PatternCategory::Data, BlockSyntax::Braces) => {
            "  return { id: payload.id, kind: \"{{name_snake}}\" };"
        }
        (PatternCategory::Data, BlockSyntax::Indent) => {
            "    return {\"id\": payload.get(\"id\"), \"kind\": \"{{name_snake}}\"}"
        }
        (PatternCategory::Data, BlockSyntax::DefEnd) => {
            "  { id: payload.id, kind: \"{{name_snake}}\" }"
        }
        (PatternCategory::Ui, BlockSyntax::Braces) => {
            "  return render(\"{{name_kebab}}\", payload);"
        }
        (PatternCategory::Ui, BlockSyntax::Indent) => "    return render(\"{{name_snake}}\", payload)",
        (PatternCategory::Ui, BlockSyntax::DefEnd) => "  render(\"{{name_snake}}\", payload)",
        (PatternCategory::Client, BlockSyntax::Braces) => {
            "  return request(\"{{name_kebab}}\", payload);"
        }
        (PatternCategory::Client, BlockSyntax::Indent) => {
            "    return request(\"{{name_snake}}\", payload)"
        }
        (PatternCategory::Client, BlockSyntax::DefEnd) => "  request(\"{{name_snake}}\", payload)",
    };
    lines.push(result.to_string());
    lines
}

fn test_content(tuple: &AxisTuple, lang: &LanguageInfo) -> String {
    let c = lang.comment;
    let header = format!(
        "{c} Smoke test for {{{{name_snake}}}} ({} {} spike).",
        tuple.library, tuple.pattern
    );
    match lang.block {
        BlockSyntax::Braces => format!(
            "{header}\ntest(\"{{{{name_kebab}}}} responds\", () => {{\n  assert({{{{name_camel}}}} !== undefined);\n}});\n"
        ),
        BlockSyntax::Indent => format!(
            "{header}\ndef test_{{{{name_snake}}}}_exists():\n    assert {{{{name_snake}}}} is not None\n"
        ),
        BlockSyntax::DefEnd => format!(
            "{header}\ndef test_{{{{name_snake}}}}\n  raise \"missing\" if {{{{name_snake}}}}.nil?\nend\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerator::parse_id;
    use spikeforge_specs::validate_spec;

    fn tuple(id: &str) -> AxisTuple {
        parse_id(id).unwrap()
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let t = tuple("gen-express-auth-secure-typescript");
        let a = synthesize_spec(&t);
        let b = synthesize_spec(&t);
        assert_eq!(format!("{a:?}"), format!("{b:?}"));
    }

    #[test]
    fn test_synthesized_specs_pass_structural_validation() {
        for id in [
            "gen-express-auth-secure-typescript",
            "gen-react-component-basic-javascript",
            "gen-django-model-advanced-python",
            "gen-rails-client-testing-ruby",
            "gen-axum-middleware-secure-rust",
            "gen-phoenix-worker-testing-elixir",
        ] {
            let spec = synthesize_spec(&tuple(id));
            validate_spec(&spec).unwrap_or_else(|e| panic!("{id}: {e}"));
            assert_eq!(spec.id, id);
        }
    }

    #[test]
    fn test_secure_style_injects_validation_scaffolding() {
        let spec = synthesize_spec(&tuple("gen-express-auth-secure-typescript"));
        assert!(spec.files[0].content.contains("Input validation"));
        assert!(spec.files[0].content.contains("Auth boundary"));

        let plain = synthesize_spec(&tuple("gen-express-auth-basic-typescript"));
        assert!(!plain.files[0].content.contains("Auth boundary"));
    }

    #[test]
    fn test_testing_style_adds_test_file() {
        let spec = synthesize_spec(&tuple("gen-express-auth-testing-typescript"));
        assert_eq!(spec.files.len(), 2);
        assert!(spec.files[1].path.contains(".test."));

        let python = synthesize_spec(&tuple("gen-fastapi-crud-testing-python"));
        assert_eq!(python.files[1].path, "tests/test_{{name_snake}}.py");
    }

    #[test]
    fn test_endpoint_category_declares_port() {
        let spec = synthesize_spec(&tuple("gen-express-auth-basic-typescript"));
        assert!(spec.param("port").is_some());

        let ui = synthesize_spec(&tuple("gen-react-component-basic-typescript"));
        assert!(ui.param("port").is_none());
    }

    #[test]
    fn test_summary_matches_spec_metadata() {
        let t = tuple("gen-react-hook-advanced-typescript");
        let meta = summary(&t);
        let spec = synthesize_spec(&t);
        assert_eq!(meta.id, spec.id);
        assert_eq!(meta.name, spec.name);
        assert_eq!(meta.tags, spec.tags);
        assert_eq!(meta.description, spec.description);
    }
}
