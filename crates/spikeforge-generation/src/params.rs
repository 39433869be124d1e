//! Parameter resolution: phase one of rendering
//!
//! Resolves every declared parameter to a typed value before any template is
//! touched. Resolution is all-or-nothing: the first missing or invalid
//! parameter aborts the render with an error naming it, and no content is
//! ever produced from a partially resolved set.

use std::collections::{BTreeMap, HashMap};

use heck::{ToKebabCase, ToLowerCamelCase, ToPascalCase, ToShoutySnakeCase, ToSnakeCase};
use regex::Regex;
use tracing::debug;

use spikeforge_specs::models::{Param, ParamType, SpikeSpec};

use crate::error::RenderError;

/// A resolved, validated parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String parameter
    Text(String),
    /// Numeric parameter; the caller's spelling is kept verbatim so
    /// rendering never reformats numbers
    Number(String),
    /// Boolean parameter
    Bool(bool),
    /// Enum parameter, one of the declared options
    Choice(String),
    /// List parameter, split from a comma-separated value
    List(Vec<String>),
}

impl ParamValue {
    /// The text this value substitutes as
    pub fn render_str(&self) -> String {
        match self {
            ParamValue::Text(s) | ParamValue::Number(s) | ParamValue::Choice(s) => s.clone(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::List(items) => items.join(","),
        }
    }

    /// Truthiness for conditional blocks
    ///
    /// Booleans by value; strings and numbers when non-empty/non-zero; lists
    /// when non-empty.
    pub fn truthy(&self) -> bool {
        match self {
            ParamValue::Text(s) | ParamValue::Choice(s) => !s.is_empty(),
            ParamValue::Number(s) => s.parse::<f64>().map(|n| n != 0.0).unwrap_or(false),
            ParamValue::Bool(b) => *b,
            ParamValue::List(items) => !items.is_empty(),
        }
    }
}

/// Resolved parameter scope, ordered for deterministic iteration
pub type ParamScope = BTreeMap<String, ParamValue>;

/// Resolve caller parameters against a spec's declarations
///
/// Caller value wins over default; a required parameter with neither fails.
/// Every resolved value is checked against its declared type and rules.
/// String parameters additionally expose derived case variants
/// (`name_pascal`, `name_camel`, `name_snake`, `name_kebab`, `name_upper`)
/// unless the spec declares a parameter under that exact name.
pub fn resolve_params(
    spec: &SpikeSpec,
    caller: &HashMap<String, String>,
) -> Result<ParamScope, RenderError> {
    let mut scope = ParamScope::new();

    for param in &spec.params {
        let raw = caller
            .get(&param.name)
            .cloned()
            .or_else(|| param.default.clone());

        let Some(raw) = raw else {
            if param.required {
                return Err(RenderError::MissingParam(param.name.clone()));
            }
            continue;
        };

        let value = check_value(param, &raw)?;
        scope.insert(param.name.clone(), value);
    }

    for key in caller.keys() {
        if spec.param(key).is_none() {
            debug!(spec = %spec.id, param = %key, "ignoring undeclared caller parameter");
        }
    }

    // Derived case variants; a declared parameter always wins over a variant.
    let mut derived = Vec::new();
    for (name, value) in &scope {
        let s = match value {
            ParamValue::Text(s) | ParamValue::Choice(s) => s,
            _ => continue,
        };
        derived.push((format!("{name}_pascal"), s.to_pascal_case()));
        derived.push((format!("{name}_camel"), s.to_lower_camel_case()));
        derived.push((format!("{name}_snake"), s.to_snake_case()));
        derived.push((format!("{name}_kebab"), s.to_kebab_case()));
        derived.push((format!("{name}_upper"), s.to_shouty_snake_case()));
    }
    for (name, value) in derived {
        scope
            .entry(name)
            .or_insert_with(|| ParamValue::Text(value));
    }

    Ok(scope)
}

/// Validate a raw value against one declaration
fn check_value(param: &Param, raw: &str) -> Result<ParamValue, RenderError> {
    let rules = param.rules.as_ref();

    match param.param_type {
        ParamType::String => {
            check_pattern(param, rules.and_then(|r| r.pattern.as_deref()), raw)?;
            Ok(ParamValue::Text(raw.to_string()))
        }
        ParamType::Number => {
            let n: f64 = raw.trim().parse().map_err(|_| RenderError::InvalidParam {
                name: param.name.clone(),
                rule: format!("'{raw}' is not a number"),
            })?;
            if let Some(min) = rules.and_then(|r| r.min) {
                if n < min {
                    return Err(RenderError::InvalidParam {
                        name: param.name.clone(),
                        rule: format!("{n} is below the minimum {min}"),
                    });
                }
            }
            if let Some(max) = rules.and_then(|r| r.max) {
                if n > max {
                    return Err(RenderError::InvalidParam {
                        name: param.name.clone(),
                        rule: format!("{n} is above the maximum {max}"),
                    });
                }
            }
            Ok(ParamValue::Number(raw.trim().to_string()))
        }
        ParamType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(ParamValue::Bool(true)),
            "false" => Ok(ParamValue::Bool(false)),
            _ => Err(RenderError::InvalidParam {
                name: param.name.clone(),
                rule: format!("'{raw}' is not a boolean (expected true or false)"),
            }),
        },
        ParamType::Enum => {
            let options = rules.map(|r| r.options.as_slice()).unwrap_or(&[]);
            if options.iter().any(|o| o == raw) {
                Ok(ParamValue::Choice(raw.to_string()))
            } else {
                Err(RenderError::InvalidParam {
                    name: param.name.clone(),
                    rule: format!("'{raw}' is not one of {options:?}"),
                })
            }
        }
        ParamType::List => {
            let items: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if let Some(pattern) = rules.and_then(|r| r.pattern.as_deref()) {
                for item in &items {
                    check_pattern(param, Some(pattern), item)?;
                }
            }
            Ok(ParamValue::List(items))
        }
    }
}

fn check_pattern(param: &Param, pattern: Option<&str>, value: &str) -> Result<(), RenderError> {
    let Some(pattern) = pattern else {
        return Ok(());
    };
    let regex = Regex::new(pattern).map_err(|_| RenderError::InvalidParam {
        name: param.name.clone(),
        rule: format!("spec declares an invalid pattern '{pattern}'"),
    })?;
    if !regex.is_match(value) {
        return Err(RenderError::InvalidParam {
            name: param.name.clone(),
            rule: format!("'{value}' does not match pattern '{pattern}'"),
        });
    }
    Ok(())
}
