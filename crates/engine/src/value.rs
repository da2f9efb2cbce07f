//! Single-value validation against one descriptor.
//!
//! Checks run in a fixed order and the first failing check decides the
//! message: value kind, declared type, referenced object, allowed values,
//! upper bound, lower bound, patterns.

use methodcheck_types::{ParamType, ParamValue, ParameterDescriptor};
use regex::Regex;
use tracing::warn;

use crate::{lookup::ObjectInfoLookup, pattern::compile_anchored};

pub(crate) const UNSUPPORTED_INPUT: &str = "input type not supported - only str, int, float, or list";

/// Lookup collaborator plus the workspace input objects are resolved in.
#[derive(Clone, Copy)]
pub struct WorkspaceContext<'a> {
    pub lookup: &'a dyn ObjectInfoLookup,
    pub workspace: Option<&'a str>,
}

impl<'a> WorkspaceContext<'a> {
    pub fn new(lookup: &'a dyn ObjectInfoLookup, workspace: Option<&'a str>) -> Self {
        Self { lookup, workspace }
    }
}

/// One descriptor with its type and value patterns compiled, so that every
/// value checked against it (list elements included) reuses them.
///
/// Type patterns that fail to compile never match. Value patterns that fail
/// to compile are reported on every value checked.
pub struct CompiledRules<'d> {
    descriptor: &'d ParameterDescriptor,
    allowed_types: Vec<Regex>,
    regex_constraint: Vec<(&'d str, Result<Regex, regex::Error>)>,
}

impl<'d> CompiledRules<'d> {
    pub fn new(descriptor: &'d ParameterDescriptor) -> Self {
        let allowed_types = descriptor
            .allowed_types
            .iter()
            .flatten()
            .filter_map(|pattern| compile_anchored(pattern).ok())
            .collect();
        let regex_constraint = descriptor
            .regex_constraint
            .iter()
            .flatten()
            .map(|pattern| (pattern.as_str(), compile_anchored(pattern)))
            .collect();
        Self {
            descriptor,
            allowed_types,
            regex_constraint,
        }
    }

    pub fn descriptor(&self) -> &'d ParameterDescriptor {
        self.descriptor
    }

    /// Validates one scalar value. Returns `None` when the value is
    /// acceptable, otherwise the message of the first failed check.
    pub fn check(&self, value: &ParamValue, context: &WorkspaceContext<'_>) -> Option<String> {
        let descriptor = self.descriptor;
        if matches!(value, ParamValue::List(_)) {
            return Some(UNSUPPORTED_INPUT.to_string());
        }

        if let Some(message) = check_type(descriptor, value) {
            return Some(message);
        }

        if descriptor.requires_lookup()
            && let Some(message) = self.check_reference(value, context)
        {
            return Some(message);
        }

        if let Some(allowed) = &descriptor.allowed_values {
            let permitted = match value {
                ParamValue::Text(text) => allowed.iter().any(|candidate| candidate == text),
                _ => false,
            };
            if !permitted {
                return Some("Given value is not permitted in the allowed set.".to_string());
            }
        }

        if let Some(max) = descriptor.max_val {
            match value.as_f64() {
                Some(number) if number > max.as_f64() => return Some(format!("Given value {} should be <= {}", value, max)),
                Some(_) => {}
                None => return Some(format!("Given value {} must be a number", value)),
            }
        }

        if let Some(min) = descriptor.min_val {
            match value.as_f64() {
                Some(number) if number < min.as_f64() => return Some(format!("Given value {} should be >= {}", value, min)),
                Some(_) => {}
                None => return Some(format!("Given value {} must be a number", value)),
            }
        }

        if !self.regex_constraint.is_empty() {
            let text = value.to_string();
            for (pattern, compiled) in &self.regex_constraint {
                match compiled {
                    Ok(regex) if regex.is_match(&text) => {}
                    Ok(_) => return Some(format!("Value {} does not match required regex {}", text, pattern)),
                    Err(error) => return Some(format!("Required regex {} is invalid: {}", pattern, error)),
                }
            }
        }

        None
    }

    fn check_reference(&self, value: &ParamValue, context: &WorkspaceContext<'_>) -> Option<String> {
        let name = value.to_string();
        let Some(workspace) = context.workspace else {
            return Some(format!("Data object named {} cannot be checked: no active workspace", name));
        };

        let info = match context.lookup.get_object_info(workspace, &name) {
            Ok(info) => info,
            Err(error) => {
                warn!(parameter = %self.descriptor.id, object = %name, workspace, %error, "object lookup failed");
                return Some(format!(
                    "Data object named {} not found in this workspace. (additional info: {})",
                    name, error
                ));
            }
        };

        if self.allowed_types.iter().any(|regex| regex.is_match(&info.type_string)) {
            None
        } else {
            Some(format!(
                "Type of data object, {}, does not match allowed types",
                info.type_string
            ))
        }
    }
}

/// Validates one scalar value. Returns `None` when the value is acceptable,
/// otherwise the message of the first failed check.
///
/// Lists are not scalars; callers iterate list elements themselves when the
/// descriptor allows multiple values. To check several values against the
/// same descriptor, build [`CompiledRules`] once instead.
pub fn validate_value(descriptor: &ParameterDescriptor, value: &ParamValue, context: &WorkspaceContext<'_>) -> Option<String> {
    CompiledRules::new(descriptor).check(value, context)
}

/// Text-like types accept every scalar; `int` needs an integer and `float`
/// any number.
fn check_type(descriptor: &ParameterDescriptor, value: &ParamValue) -> Option<String> {
    match (&descriptor.r#type, value) {
        (ParamType::Int, ParamValue::Int(_)) => None,
        (ParamType::Int, other) => Some(format!("Given value {} is not an int", other)),
        (ParamType::Float, ParamValue::Int(_) | ParamValue::Float(_)) => None,
        (ParamType::Float, other) => Some(format!("Given value {} is not a number", other)),
        _ => None,
    }
}
