//! Template engine: walks a parsed template with a resolved scope
//!
//! Substitution never emits literal placeholder text: a name the scope does
//! not resolve is an error, not passthrough. Conditionals on absent optional
//! parameters evaluate false; substituting an absent parameter is still an
//! error, since the template author asked for its value.

use crate::error::RenderError;
use crate::params::{ParamScope, ParamValue};
use crate::templates::parser::{TemplateElement, TemplateParser};

/// Renders templates against a resolved parameter scope
pub struct TemplateEngine;

impl TemplateEngine {
    /// Render template text with the given scope
    ///
    /// Pure: identical template and scope always produce identical output.
    pub fn render(template: &str, scope: &ParamScope) -> Result<String, RenderError> {
        let parsed = TemplateParser::parse(template)?;
        let mut out = String::new();
        let mut loop_stack = Vec::new();
        render_elements(&parsed.elements, scope, &mut loop_stack, &mut out)?;
        Ok(out)
    }
}

fn render_elements(
    elements: &[TemplateElement],
    scope: &ParamScope,
    loop_stack: &mut Vec<String>,
    out: &mut String,
) -> Result<(), RenderError> {
    for element in elements {
        match element {
            TemplateElement::Text(text) => out.push_str(text),
            TemplateElement::Placeholder(name) => {
                out.push_str(&lookup(name, scope, loop_stack)?);
            }
            TemplateElement::Conditional { var, negated, body } => {
                let truthy = match resolve(var, scope, loop_stack) {
                    Some(value) => value.truthy(),
                    // Absent optional parameters read as false.
                    None => false,
                };
                if truthy != *negated {
                    render_elements(body, scope, loop_stack, out)?;
                }
            }
            TemplateElement::Loop { var, body } => {
                let items = match scope.get(var) {
                    Some(ParamValue::List(items)) => items.clone(),
                    Some(_) => {
                        return Err(RenderError::InvalidParam {
                            name: var.clone(),
                            rule: "iteration requires a list parameter".to_string(),
                        })
                    }
                    None => return Err(RenderError::UnresolvedPlaceholder(var.clone())),
                };
                for item in items {
                    loop_stack.push(item);
                    let result = render_elements(body, scope, loop_stack, out);
                    loop_stack.pop();
                    result?;
                }
            }
        }
    }
    Ok(())
}

/// Resolve a name to a value: innermost loop binding first, then the scope
fn resolve<'a>(
    name: &str,
    scope: &'a ParamScope,
    loop_stack: &'a [String],
) -> Option<ValueRef<'a>> {
    if name == "this" {
        return loop_stack.last().map(ValueRef::Item);
    }
    scope.get(name).map(ValueRef::Param)
}

fn lookup(name: &str, scope: &ParamScope, loop_stack: &[String]) -> Result<String, RenderError> {
    match resolve(name, scope, loop_stack) {
        Some(ValueRef::Item(item)) => Ok(item.clone()),
        Some(ValueRef::Param(value)) => Ok(value.render_str()),
        None => Err(RenderError::UnresolvedPlaceholder(name.to_string())),
    }
}

enum ValueRef<'a> {
    Param(&'a ParamValue),
    Item(&'a String),
}

impl ValueRef<'_> {
    fn truthy(&self) -> bool {
        match self {
            ValueRef::Param(value) => value.truthy(),
            ValueRef::Item(item) => !item.is_empty(),
        }
    }
}
