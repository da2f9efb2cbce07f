//! Whole-argument-set validation.
//!
//! Runs three passes and keeps every finding: missing required parameters,
//! unknown argument names, then per-parameter value checks.

use std::collections::HashSet;

use methodcheck_types::{ParamValue, ParameterDescriptor, ValidationError, ValidationReport};

use crate::{
    arguments::{Arguments, SuppliedValue},
    value::{CompiledRules, WorkspaceContext},
};

/// Validates `arguments` against `descriptors` and reports every problem.
///
/// The report lists missing parameters (descriptor order), then unknown
/// parameters (argument order), then value errors (descriptor order).
/// Parameters already reported missing are not value-checked again.
pub fn validate_parameter_set(
    descriptors: &[ParameterDescriptor],
    arguments: &Arguments,
    context: &WorkspaceContext<'_>,
) -> ValidationReport {
    let mut errors = Vec::new();

    let missing: HashSet<&str> = descriptors
        .iter()
        .filter(|descriptor| !descriptor.optional && !arguments.is_supplied(&descriptor.id))
        .map(|descriptor| descriptor.id.as_str())
        .collect();
    errors.extend(
        descriptors
            .iter()
            .filter(|descriptor| missing.contains(descriptor.id.as_str()))
            .map(|descriptor| ValidationError::missing(&descriptor.id)),
    );

    let known_ids: HashSet<&str> = descriptors.iter().map(|descriptor| descriptor.id.as_str()).collect();
    errors.extend(
        arguments
            .ids()
            .filter(|id| !known_ids.contains(id))
            .map(ValidationError::unknown),
    );

    for descriptor in descriptors {
        if missing.contains(descriptor.id.as_str()) {
            continue;
        }
        let Some(supplied) = arguments.get(&descriptor.id) else {
            continue;
        };
        if let Some(message) = check_parameter(descriptor, supplied, context) {
            errors.push(ValidationError::invalid_value(&descriptor.id, message));
        }
    }

    ValidationReport::new(errors)
}

/// Validates the value supplied for one parameter.
///
/// When the descriptor allows multiple values and a list was supplied, every
/// element is checked and the element failures are joined with `", "`. The
/// descriptor's patterns are compiled once for all elements.
pub fn check_parameter(descriptor: &ParameterDescriptor, supplied: &SuppliedValue, context: &WorkspaceContext<'_>) -> Option<String> {
    let value = match supplied {
        SuppliedValue::Value(value) => value,
        SuppliedValue::Absent => return None,
        SuppliedValue::Unsupported(unsupported) => return Some(unsupported.to_string()),
    };

    let rules = CompiledRules::new(descriptor);
    match value {
        ParamValue::List(items) if descriptor.allow_multiple => {
            let element_errors: Vec<String> = items.iter().filter_map(|item| rules.check(item, context)).collect();
            if element_errors.is_empty() {
                None
            } else {
                Some(element_errors.join(", "))
            }
        }
        single => rules.check(single, context),
    }
}
