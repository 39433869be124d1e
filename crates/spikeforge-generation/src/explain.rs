//! Documentation text for a spec
//!
//! `explain-spike` output: description, parameter documentation, and the
//! file/patch manifest, rendered as markdown without touching disk.

use std::fmt::Write;

use spikeforge_specs::models::{ParamType, SpikeSpec};

/// Render a spec's documentation
pub fn explain(spec: &SpikeSpec) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# {} (`{}`)", spec.name, spec.id);
    let _ = writeln!(out, "\nVersion {}", spec.version);
    if !spec.stack.is_empty() {
        let _ = writeln!(out, "Stack: {}", spec.stack.join(", "));
    }
    if !spec.tags.is_empty() {
        let _ = writeln!(out, "Tags: {}", spec.tags.join(", "));
    }
    if !spec.description.is_empty() {
        let _ = writeln!(out, "\n{}", spec.description.trim_end());
    }

    if !spec.params.is_empty() {
        let _ = writeln!(out, "\n## Parameters\n");
        for param in &spec.params {
            let mut attrs = vec![type_name(param.param_type).to_string()];
            if param.required && param.default.is_none() {
                attrs.push("required".to_string());
            }
            if let Some(default) = &param.default {
                attrs.push(format!("default `{default}`"));
            }
            if let Some(rules) = &param.rules {
                if !rules.options.is_empty() {
                    attrs.push(format!("one of {}", rules.options.join("/")));
                }
            }
            let description = if param.description.is_empty() {
                String::new()
            } else {
                format!(": {}", param.description)
            };
            let _ = writeln!(out, "- `{}` ({}){}", param.name, attrs.join(", "), description);
        }
    }

    if !spec.files.is_empty() {
        let _ = writeln!(out, "\n## Files\n");
        for file in &spec.files {
            let _ = writeln!(out, "- `{}`", file.path);
        }
    }

    if !spec.patches.is_empty() {
        let _ = writeln!(out, "\n## Patches\n");
        for patch in &spec.patches {
            let _ = writeln!(out, "- {:?} `{}`", patch.op, patch.path);
        }
    }

    out
}

fn type_name(t: ParamType) -> &'static str {
    match t {
        ParamType::String => "string",
        ParamType::Number => "number",
        ParamType::Boolean => "boolean",
        ParamType::Enum => "enum",
        ParamType::List => "list",
    }
}
