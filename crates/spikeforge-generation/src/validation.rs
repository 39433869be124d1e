//! Validation façade: structural checks plus optional deeper analysis
//!
//! Re-renders a spec and compares the expected structure against the actual
//! tree. Presence, not content equality: applied files are expected to
//! drift once a human edits them. Read-only; never mutates disk. Deeper
//! code-quality checking is delegated to an external analyzer when one is
//! wired in, and its absence degrades to structural checks only.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::models::RenderedSpike;

/// Severity of an analyzer issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    /// Informational
    Info,
    /// Worth fixing
    Warning,
    /// Broken
    Error,
}

/// One issue reported by the external analyzer
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzerIssue {
    /// What the analyzer found
    pub message: String,
    /// How bad it is
    pub severity: IssueSeverity,
}

/// Failure inside the external analyzer
#[derive(Debug, Error)]
#[error("analyzer failed: {0}")]
pub struct AnalyzerError(pub String);

/// The external framework-aware static-analysis collaborator
///
/// Consumed, not implemented here: the engine calls `analyze` during
/// validation when a collaborator is available and treats unavailability as
/// a non-fatal degradation.
pub trait SpikeAnalyzer: Send + Sync {
    /// Analyze one file, optionally with a framework hint
    fn analyze(
        &self,
        path: &Path,
        framework: Option<&str>,
    ) -> Result<Vec<AnalyzerIssue>, AnalyzerError>;
}

/// One structural check
#[derive(Debug, Clone, Serialize)]
pub struct ValidationCheck {
    /// What was checked, e.g. `file src/app.ts`
    pub name: String,
    /// Whether it held
    pub passed: bool,
}

/// Outcome of validate-spike; advisory only
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Per-check status
    pub checks: Vec<ValidationCheck>,
    /// Fraction of checks that passed, in `[0, 1]`
    pub score: f64,
    /// Free-text findings: missing paths, analyzer issues, degradations
    pub findings: Vec<String>,
}

/// Check a rendered spike's structure against the actual tree
pub fn validate_rendered(
    rendered: &RenderedSpike,
    target_root: &Path,
    framework: Option<&str>,
    analyzer: Option<&dyn SpikeAnalyzer>,
) -> ValidationReport {
    let mut checks = Vec::new();
    let mut findings = Vec::new();

    for file in &rendered.files {
        let abs = target_root.join(&file.path);
        let passed = abs.is_file();
        if !passed {
            findings.push(format!("missing file: {}", file.path));
        }
        checks.push(ValidationCheck {
            name: format!("file {}", file.path),
            passed,
        });
    }

    for patch in &rendered.patches {
        let abs = target_root.join(&patch.path);
        let passed = abs.is_file();
        if !passed {
            findings.push(format!("missing patch target: {}", patch.path));
        }
        checks.push(ValidationCheck {
            name: format!("patch target {}", patch.path),
            passed,
        });
    }

    let score = if checks.is_empty() {
        1.0
    } else {
        checks.iter().filter(|c| c.passed).count() as f64 / checks.len() as f64
    };

    if let Some(analyzer) = analyzer {
        for file in &rendered.files {
            let abs = target_root.join(&file.path);
            if !abs.is_file() {
                continue;
            }
            match analyzer.analyze(&abs, framework) {
                Ok(issues) => {
                    for issue in issues {
                        findings.push(format!(
                            "analysis [{:?}] {}: {}",
                            issue.severity, file.path, issue.message
                        ));
                    }
                }
                Err(e) => {
                    // Degrade to structural checks only.
                    findings.push(format!("analysis unavailable: {e}"));
                    break;
                }
            }
        }
    }

    debug!(score, checks = checks.len(), "validation complete");
    ValidationReport {
        checks,
        score,
        findings,
    }
}
