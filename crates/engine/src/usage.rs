use std::fmt;

use methodcheck_types::{MethodSpec, ParameterDescriptor, ReleaseTag};
use serde::Serialize;

use crate::descriptor::display_order;

/// Summary of how to call one method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodUsage {
    pub id: String,
    pub name: String,
    pub tag: ReleaseTag,
    pub subtitle: String,
    pub ver: Option<String>,
    /// Parameters in display order (required first, inputs before outputs)
    pub params: Vec<ParameterDescriptor>,
}

impl MethodUsage {
    pub fn new(spec: &MethodSpec, tag: ReleaseTag, descriptors: &[ParameterDescriptor]) -> Self {
        Self {
            id: spec.info.id.clone(),
            name: spec.info.name.clone(),
            tag,
            subtitle: spec.info.subtitle.clone(),
            ver: spec.info.ver.clone(),
            params: display_order(descriptors).into_iter().cloned().collect(),
        }
    }
}

impl fmt::Display for MethodUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "id: {}", self.id)?;
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "subtitle: {}", self.subtitle)?;
        if let Some(ver) = &self.ver {
            writeln!(f, "version: {} ({})", ver, self.tag)?;
        }
        write!(f, "parameters (*required):\n-----------------------")?;

        for param in &self.params {
            write!(
                f,
                "\n{}{} - {}",
                if param.optional { "" } else { "*" },
                param.id,
                param.r#type
            )?;
            if param.is_output {
                write!(f, " (output)")?;
            }
            if let Some(types) = &param.allowed_types {
                write!(f, " - is a data object where the type is one of: {}", json_list(types))?;
            }
            if let Some(values) = &param.allowed_values {
                write!(f, " - must be one of {}", json_list(values))?;
            }
        }
        Ok(())
    }
}

fn json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::build_descriptors;
    use serde_json::json;

    #[test]
    fn renders_required_markers_and_constraints() {
        let spec: MethodSpec = serde_json::from_value(json!({
            "info": { "id": "MegaHit/run_megahit", "name": "Run MEGAHIT", "subtitle": "Assemble reads", "ver": "1.0.1" },
            "parameters": [
                { "id": "mode", "optional": 1, "field_type": "dropdown", "short_hint": "", "description": "", "allow_multiple": 0,
                  "dropdown_options": { "options": [ { "value": "fast" }, { "value": "accurate" } ] } },
                { "id": "output_name", "optional": 0, "field_type": "text", "short_hint": "", "description": "", "allow_multiple": 0,
                  "text_options": { "is_output_name": 1 } },
                { "id": "reads", "optional": 0, "field_type": "text", "short_hint": "", "description": "", "allow_multiple": 0,
                  "text_options": { "valid_ws_types": ["KBaseAssembly.PairedEndLibrary"] } }
            ]
        }))
        .expect("spec fixture");
        let descriptors = build_descriptors(&spec).expect("build");
        let usage = MethodUsage::new(&spec, ReleaseTag::Release, &descriptors);

        assert_eq!(usage.params[0].id, "reads");
        let text = usage.to_string();
        assert!(text.starts_with("id: MegaHit/run_megahit\nname: Run MEGAHIT\n"), "{}", text);
        assert!(text.contains("version: 1.0.1 (release)"));
        assert!(text.contains("\n*reads - text - is a data object where the type is one of: [\"KBaseAssembly.PairedEndLibrary\"]"));
        assert!(text.contains("\n*output_name - text (output)"));
        assert!(text.contains("\nmode - dropdown - must be one of [\"fast\",\"accurate\"]"));
    }
}
