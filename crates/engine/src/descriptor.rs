//! Flattening of raw specifications into parameter descriptors.
//!
//! The builder is a pure function of the specification document: building
//! the same document twice yields identical descriptor lists.

use std::collections::HashSet;

use methodcheck_types::{MethodSpec, NumericBound, ParamType, ParameterDescriptor, RawParameter, TextOptions};

use crate::{error::BuildError, pattern::compile_anchored};

/// Builds one descriptor per declared parameter, in declaration order.
///
/// # Errors
///
/// - [`BuildError::DuplicateParameter`] when two parameters share an id
/// - [`BuildError::MissingDropdownOptions`] for a dropdown without options
/// - [`BuildError::InvalidPattern`] for an unparseable type or value pattern
pub fn build_descriptors(spec: &MethodSpec) -> Result<Vec<ParameterDescriptor>, BuildError> {
    let mut seen_ids = HashSet::new();
    spec.parameters
        .iter()
        .map(|raw| {
            if !seen_ids.insert(raw.id.as_str()) {
                return Err(BuildError::DuplicateParameter {
                    method_id: spec.id().to_string(),
                    parameter_id: raw.id.clone(),
                });
            }
            build_descriptor(spec.id(), raw)
        })
        .collect()
}

/// Descriptors ordered for display: required before optional, then inputs
/// before outputs. The sort is stable, so declaration order is kept within
/// each group.
pub fn display_order(descriptors: &[ParameterDescriptor]) -> Vec<&ParameterDescriptor> {
    let mut ordered: Vec<&ParameterDescriptor> = descriptors.iter().collect();
    ordered.sort_by_key(|descriptor| (descriptor.optional, descriptor.is_output));
    ordered
}

fn build_descriptor(method_id: &str, raw: &RawParameter) -> Result<ParameterDescriptor, BuildError> {
    let mut descriptor = ParameterDescriptor {
        id: raw.id.clone(),
        optional: raw.optional,
        r#type: ParamType::from_raw(&raw.field_type),
        is_output: false,
        allowed_values: None,
        allowed_types: None,
        min_val: None,
        max_val: None,
        regex_constraint: None,
        allow_multiple: raw.allow_multiple,
        short_hint: raw.short_hint.clone(),
        description: raw.description.clone(),
    };

    if raw.field_type.to_lowercase() == "dropdown" {
        let options = raw
            .dropdown_options
            .as_ref()
            .ok_or_else(|| BuildError::MissingDropdownOptions {
                method_id: method_id.to_string(),
                parameter_id: raw.id.clone(),
            })?;
        descriptor.allowed_values = Some(options.options.iter().map(|option| option.value.clone()).collect());
    }

    if let Some(options) = &raw.text_options {
        apply_text_options(method_id, &mut descriptor, options)?;
    }

    // Outputs name new objects; there is nothing to look up.
    if descriptor.is_output {
        descriptor.allowed_types = None;
    }

    Ok(descriptor)
}

/// Applies text options in a fixed order. Integer bounds are applied after
/// float bounds, so they win when both are declared.
fn apply_text_options(method_id: &str, descriptor: &mut ParameterDescriptor, options: &TextOptions) -> Result<(), BuildError> {
    if let Some(is_output) = options.is_output_name {
        descriptor.is_output = is_output;
    }
    if let Some(types) = &options.valid_ws_types {
        check_patterns(method_id, &descriptor.id, types)?;
        descriptor.allowed_types = Some(types.clone());
    }
    if let Some(validate_as) = &options.validate_as {
        descriptor.r#type = ParamType::from_raw(validate_as);
    }

    if let Some(min) = options.min_float {
        descriptor.min_val = Some(NumericBound::Float(min));
    }
    if let Some(min) = options.min_int {
        descriptor.min_val = Some(NumericBound::Int(min));
    }
    if let Some(max) = options.max_float {
        descriptor.max_val = Some(NumericBound::Float(max));
    }
    if let Some(max) = options.max_int {
        descriptor.max_val = Some(NumericBound::Int(max));
    }

    if let Some(patterns) = options.regex_constraint.as_ref().filter(|patterns| !patterns.is_empty()) {
        check_patterns(method_id, &descriptor.id, patterns)?;
        descriptor.regex_constraint = Some(patterns.clone());
    }
    Ok(())
}

fn check_patterns(method_id: &str, parameter_id: &str, patterns: &[String]) -> Result<(), BuildError> {
    for pattern in patterns {
        compile_anchored(pattern).map_err(|error| BuildError::InvalidPattern {
            method_id: method_id.to_string(),
            parameter_id: parameter_id.to_string(),
            pattern: pattern.clone(),
            reason: error.to_string(),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec_from(parameters: serde_json::Value) -> MethodSpec {
        serde_json::from_value(json!({
            "info": { "id": "Test/method", "name": "Test method" },
            "parameters": parameters,
        }))
        .expect("valid spec fixture")
    }

    fn raw(id: &str, optional: u8, field_type: &str) -> serde_json::Value {
        json!({
            "id": id,
            "optional": optional,
            "field_type": field_type,
            "short_hint": format!("{} hint", id),
            "description": "",
            "allow_multiple": 0,
        })
    }

    #[test]
    fn maps_basic_fields() {
        let spec = spec_from(json!([raw("reads", 0, "text")]));
        let descriptors = build_descriptors(&spec).expect("build");
        assert_eq!(descriptors.len(), 1);
        let reads = &descriptors[0];
        assert_eq!(reads.id, "reads");
        assert!(!reads.optional);
        assert_eq!(reads.r#type, ParamType::Text);
        assert!(!reads.is_output);
        assert!(!reads.allow_multiple);
        assert_eq!(reads.short_hint, "reads hint");
        assert!(reads.allowed_values.is_none());
    }

    #[test]
    fn dropdown_options_become_allowed_values_case_insensitively() {
        let mut mode = raw("mode", 1, "DropDown");
        mode["dropdown_options"] = json!({ "options": [ { "value": "fast" }, { "value": "accurate", "display": "Accurate" } ] });
        let descriptors = build_descriptors(&spec_from(json!([mode]))).expect("build");
        assert_eq!(descriptors[0].allowed_values, Some(vec!["fast".to_string(), "accurate".to_string()]));
        assert_eq!(descriptors[0].r#type, ParamType::Other("DropDown".into()));
    }

    #[test]
    fn dropdown_without_options_fails() {
        let err = build_descriptors(&spec_from(json!([raw("mode", 1, "dropdown")]))).unwrap_err();
        assert!(matches!(err, BuildError::MissingDropdownOptions { .. }));
    }

    #[test]
    fn text_options_override_type_output_and_types() {
        let mut count = raw("count", 0, "text");
        count["text_options"] = json!({ "validate_as": "int", "min_int": 1, "max_int": 10 });
        let mut output = raw("output_name", 0, "text");
        output["text_options"] = json!({ "is_output_name": 1, "valid_ws_types": ["KBaseGenomes.ContigSet"] });
        let mut reads = raw("reads", 0, "text");
        reads["text_options"] = json!({ "valid_ws_types": ["KBaseAssembly.PairedEndLibrary"] });

        let descriptors = build_descriptors(&spec_from(json!([count, output, reads]))).expect("build");
        assert_eq!(descriptors[0].r#type, ParamType::Int);
        assert_eq!(descriptors[0].min_val, Some(NumericBound::Int(1)));
        assert_eq!(descriptors[0].max_val, Some(NumericBound::Int(10)));
        assert!(descriptors[1].is_output);
        assert!(descriptors[1].allowed_types.is_none());
        assert!(!descriptors[1].requires_lookup());
        assert_eq!(descriptors[2].allowed_types, Some(vec!["KBaseAssembly.PairedEndLibrary".to_string()]));
        assert!(descriptors[2].requires_lookup());
    }

    #[test]
    fn integer_bounds_take_precedence_over_float_bounds() {
        let mut threshold = raw("threshold", 1, "text");
        threshold["text_options"] = json!({ "min_float": 0.5, "min_int": 1, "max_int": 9, "max_float": 8.5 });
        let descriptors = build_descriptors(&spec_from(json!([threshold]))).expect("build");
        assert_eq!(descriptors[0].min_val, Some(NumericBound::Int(1)));
        assert_eq!(descriptors[0].max_val, Some(NumericBound::Int(9)));
    }

    #[test]
    fn empty_regex_constraint_is_dropped() {
        let mut name = raw("name", 0, "text");
        name["text_options"] = json!({ "regex_constraint": [] });
        let descriptors = build_descriptors(&spec_from(json!([name]))).expect("build");
        assert!(descriptors[0].regex_constraint.is_none());
    }

    #[test]
    fn invalid_patterns_fail_the_build() {
        let mut name = raw("name", 0, "text");
        name["text_options"] = json!({ "regex_constraint": ["[a-z"] });
        let err = build_descriptors(&spec_from(json!([name]))).unwrap_err();
        assert!(matches!(err, BuildError::InvalidPattern { ref pattern, .. } if pattern == "[a-z"));
    }

    #[test]
    fn duplicate_ids_fail_the_build() {
        let err = build_descriptors(&spec_from(json!([raw("a", 0, "text"), raw("a", 1, "int")]))).unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateParameter {
                method_id: "Test/method".into(),
                parameter_id: "a".into()
            }
        );
    }

    #[test]
    fn unknown_field_types_pass_through() {
        let descriptors = build_descriptors(&spec_from(json!([raw("notes", 1, "textarea")]))).expect("build");
        assert_eq!(descriptors[0].r#type.as_str(), "textarea");
    }

    #[test]
    fn building_twice_is_identical() {
        let mut mode = raw("mode", 1, "dropdown");
        mode["dropdown_options"] = json!({ "options": [ { "value": "fast" } ] });
        let spec = spec_from(json!([raw("reads", 0, "text"), mode]));
        assert_eq!(build_descriptors(&spec), build_descriptors(&spec));
    }

    #[test]
    fn display_order_puts_required_inputs_first() {
        let mut output = raw("out", 0, "text");
        output["text_options"] = json!({ "is_output_name": true });
        let spec = spec_from(json!([raw("opt_a", 1, "text"), output, raw("req_a", 0, "text"), raw("req_b", 0, "int")]));
        let descriptors = build_descriptors(&spec).expect("build");
        let ids: Vec<&str> = display_order(&descriptors).iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["req_a", "req_b", "out", "opt_a"]);
        // Internal order is untouched.
        assert_eq!(descriptors[0].id, "opt_a");
    }
}
