//! Structural validation of spike specs
//!
//! Runs at load time, before a spec ever reaches the renderer. Catches the
//! document-level mistakes a hand-authored spec can contain: duplicate
//! parameter names, duplicate file paths, templates referencing parameters
//! that were never declared, and patch payloads that do not match their
//! operation. Template syntax itself is checked by the renderer's parser.

use std::collections::HashSet;

use crate::error::SpecError;
use crate::models::{ParamType, PatchOp, SpikeSpec};

/// Suffixes under which a declared string parameter is also addressable
///
/// `{{app_name_pascal}}` is legal whenever `app_name` is declared; the
/// renderer derives the cased variants at resolution time.
pub const DERIVED_SUFFIXES: &[&str] = &["_pascal", "_camel", "_snake", "_kebab", "_upper"];

/// Validate the structure of a loaded spec
///
/// # Errors
/// Returns the first structural violation found, naming the spec and the
/// offending parameter or path.
pub fn validate_spec(spec: &SpikeSpec) -> Result<(), SpecError> {
    if spec.id.is_empty() {
        return Err(SpecError::InvalidSpec {
            spec: spec.name.clone(),
            reason: "spec id must not be empty".to_string(),
        });
    }

    let mut names = HashSet::new();
    for param in &spec.params {
        if !names.insert(param.name.as_str()) {
            return Err(SpecError::DuplicateParam {
                spec: spec.id.clone(),
                param: param.name.clone(),
            });
        }
        if param.param_type == ParamType::Enum {
            let has_options = param
                .rules
                .as_ref()
                .map(|r| !r.options.is_empty())
                .unwrap_or(false);
            if !has_options {
                return Err(SpecError::InvalidSpec {
                    spec: spec.id.clone(),
                    reason: format!("enum parameter '{}' declares no options", param.name),
                });
            }
        }
    }

    let mut paths = HashSet::new();
    for file in &spec.files {
        if !paths.insert(file.path.as_str()) {
            return Err(SpecError::DuplicateFilePath {
                spec: spec.id.clone(),
                path: file.path.clone(),
            });
        }
        check_references(spec, &file.path)?;
        check_references(spec, &file.content)?;
    }

    for patch in &spec.patches {
        check_references(spec, &patch.path)?;
        match patch.op {
            PatchOp::Replace => {
                if patch.search.is_none() || patch.replace.is_none() {
                    return Err(SpecError::InvalidSpec {
                        spec: spec.id.clone(),
                        reason: format!(
                            "replace patch for '{}' needs both search and replace",
                            patch.path
                        ),
                    });
                }
            }
            PatchOp::Merge | PatchOp::Prepend | PatchOp::Append => {
                if patch.content.is_none() {
                    return Err(SpecError::InvalidSpec {
                        spec: spec.id.clone(),
                        reason: format!("{:?} patch for '{}' needs content", patch.op, patch.path),
                    });
                }
            }
        }
        for text in [&patch.content, &patch.search, &patch.replace]
            .into_iter()
            .flatten()
        {
            check_references(spec, text)?;
        }
    }

    Ok(())
}

/// Check that every placeholder in a template references a declared parameter
fn check_references(spec: &SpikeSpec, template: &str) -> Result<(), SpecError> {
    let mut each_depth = 0usize;

    for token in scan_tokens(template) {
        match token {
            Token::Open(block, var) => {
                if block == "each" {
                    each_depth += 1;
                }
                require_declared(spec, &var, each_depth > 0)?;
            }
            Token::Close(block) => {
                if block == "each" {
                    each_depth = each_depth.saturating_sub(1);
                }
            }
            Token::Var(var) => {
                require_declared(spec, &var, each_depth > 0)?;
            }
        }
    }

    Ok(())
}

fn require_declared(spec: &SpikeSpec, var: &str, in_loop: bool) -> Result<(), SpecError> {
    if in_loop && var == "this" {
        return Ok(());
    }
    if spec.param(var).is_some() {
        return Ok(());
    }
    for suffix in DERIVED_SUFFIXES {
        if let Some(base) = var.strip_suffix(suffix) {
            if spec.param(base).is_some() {
                return Ok(());
            }
        }
    }
    Err(SpecError::UndeclaredParam {
        spec: spec.id.clone(),
        param: var.to_string(),
    })
}

enum Token {
    /// `{{#if var}}` / `{{#unless var}}` / `{{#each var}}`
    Open(String, String),
    /// `{{/if}}` / `{{/unless}}` / `{{/each}}`
    Close(String),
    /// `{{var}}`
    Var(String),
}

/// Lightweight scan over `{{...}}` tokens
///
/// Intentionally forgiving: unclosed braces are left for the renderer's
/// parser to reject with a line number.
fn scan_tokens(template: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else { break };
        let inner = after[..end].trim();

        if let Some(body) = inner.strip_prefix('#') {
            let mut parts = body.splitn(2, char::is_whitespace);
            let block = parts.next().unwrap_or("").to_string();
            let var = parts.next().unwrap_or("").trim().to_string();
            if !var.is_empty() {
                tokens.push(Token::Open(block, var));
            }
        } else if let Some(body) = inner.strip_prefix('/') {
            tokens.push(Token::Close(body.trim().to_string()));
        } else if !inner.is_empty() {
            tokens.push(Token::Var(inner.to_string()));
        }

        rest = &after[end + 2..];
    }

    tokens
}
