//! Spec rendering: spec + parameters to an in-memory file set
//!
//! Pure with respect to its inputs; nothing here reads or writes disk. Path
//! templates render under the same grammar as content, and rendered paths
//! are checked before anything downstream trusts them.

use std::collections::HashSet;
use std::path::{Component, Path};

use tracing::debug;

use spikeforge_specs::models::{PatchOp, SpikeSpec};

use crate::error::RenderError;
use crate::models::{PatchPayload, RenderedFile, RenderedPatch, RenderedSpike};
use crate::params::{resolve_params, ParamScope};
use crate::templates::TemplateEngine;

/// Render a spec with caller parameters
///
/// Two phases: parameter resolution (all-or-nothing), then substitution of
/// every path, content, and patch payload template. Deterministic for a
/// fixed (spec, params) input.
pub fn render(
    spec: &SpikeSpec,
    caller: &std::collections::HashMap<String, String>,
) -> Result<RenderedSpike, RenderError> {
    let scope = resolve_params(spec, caller)?;

    let mut seen = HashSet::new();
    let mut files = Vec::with_capacity(spec.files.len());
    for template in &spec.files {
        let path = render_path(&template.path, &scope)?;
        if !seen.insert(path.clone()) {
            return Err(RenderError::DuplicateRenderedPath(path));
        }
        let content = TemplateEngine::render(&template.content, &scope)?;
        files.push(RenderedFile { path, content });
    }

    let mut patches = Vec::with_capacity(spec.patches.len());
    for patch in &spec.patches {
        let path = render_path(&patch.path, &scope)?;
        let payload = match patch.op {
            PatchOp::Merge => PatchPayload::Merge {
                content: render_part(&patch.content, &scope)?,
            },
            PatchOp::Prepend => PatchPayload::Prepend {
                content: render_part(&patch.content, &scope)?,
            },
            PatchOp::Append => PatchPayload::Append {
                content: render_part(&patch.content, &scope)?,
            },
            PatchOp::Replace => PatchPayload::Replace {
                search: render_part(&patch.search, &scope)?,
                replace: render_part(&patch.replace, &scope)?,
            },
        };
        patches.push(RenderedPatch { path, payload });
    }

    debug!(spec = %spec.id, files = files.len(), patches = patches.len(), "rendered spike");
    Ok(RenderedSpike { files, patches })
}

fn render_part(template: &Option<String>, scope: &ParamScope) -> Result<String, RenderError> {
    match template {
        Some(t) => TemplateEngine::render(t, scope),
        // Structural validation guarantees payloads exist for their op.
        None => Ok(String::new()),
    }
}

/// Render a path template and check the result is a safe relative path
fn render_path(template: &str, scope: &ParamScope) -> Result<String, RenderError> {
    let rendered = TemplateEngine::render(template, scope)?;
    let trimmed = rendered.trim();

    if trimmed.is_empty() {
        return Err(RenderError::InvalidPath(rendered));
    }
    let path = Path::new(trimmed);
    let all_normal = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !all_normal {
        return Err(RenderError::InvalidPath(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}
