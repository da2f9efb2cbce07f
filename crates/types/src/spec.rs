//! Raw method specification documents as published by the method store.
//!
//! These types mirror the wire schema closely. Parsing rules:
//! required fields must be present, unknown fields are ignored, and the
//! integer-or-boolean flags used by the store (`optional`, `allow_multiple`,
//! `is_output_name`) are accepted in either form.
//!
//! Sources hand out documents as raw JSON. Each one is parsed on its own
//! with [`MethodSpec::from_document`], so a broken document only affects
//! the method it describes.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use thiserror::Error;

/// A complete method specification for one method version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    /// Identity and display information for the method
    pub info: MethodInfo,
    /// Ordered list of declared parameters
    pub parameters: Vec<RawParameter>,
}

impl MethodSpec {
    /// The method identifier (e.g., `MegaHit/run_megahit`).
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// Parses one raw specification document.
    ///
    /// The error carries the document's `info.id` when it can be read, so
    /// the failure can be reported against that method alone.
    pub fn from_document(document: Value) -> Result<Self, MalformedSpec> {
        let method_id = document_method_id(&document).unwrap_or("<unidentified>").to_string();
        serde_json::from_value(document).map_err(|error| MalformedSpec {
            method_id,
            reason: error.to_string(),
        })
    }
}

/// Reads `info.id` from a raw document without parsing anything else.
pub fn document_method_id(document: &Value) -> Option<&str> {
    document.get("info")?.get("id")?.as_str()
}

/// A specification document that does not follow the published schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("specification of {method_id} is malformed: {reason}")]
pub struct MalformedSpec {
    pub method_id: String,
    pub reason: String,
}

/// Identity block of a method specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    /// Unique method identifier within a tag
    pub id: String,
    /// Human-readable method name
    #[serde(default)]
    pub name: String,
    /// One-line subtitle shown in listings
    #[serde(default)]
    pub subtitle: String,
    /// Semantic version string of the method, when published
    #[serde(default)]
    pub ver: Option<String>,
}

/// One parameter record exactly as declared in the specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    pub id: String,
    #[serde(deserialize_with = "flag_from_int_or_bool")]
    pub optional: bool,
    /// Declared field kind (e.g., "text", "dropdown", "int")
    pub field_type: String,
    pub short_hint: String,
    pub description: String,
    #[serde(deserialize_with = "flag_from_int_or_bool")]
    pub allow_multiple: bool,
    #[serde(default)]
    pub dropdown_options: Option<DropdownOptions>,
    #[serde(default)]
    pub text_options: Option<TextOptions>,
}

/// Options listed for a dropdown parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOptions {
    pub options: Vec<DropdownOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownOption {
    /// Literal value submitted when the option is chosen
    pub value: String,
    /// Label shown to users
    #[serde(default)]
    pub display: Option<String>,
}

/// Validation hints attached to text-like parameters.
///
/// Every field is optional; absent fields leave the derived descriptor's
/// defaults in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextOptions {
    #[serde(default, deserialize_with = "optional_flag_from_int_or_bool")]
    pub is_output_name: Option<bool>,
    #[serde(default)]
    pub valid_ws_types: Option<Vec<String>>,
    #[serde(default)]
    pub validate_as: Option<String>,
    #[serde(default)]
    pub min_float: Option<f64>,
    #[serde(default)]
    pub max_float: Option<f64>,
    #[serde(default)]
    pub min_int: Option<i64>,
    #[serde(default)]
    pub max_int: Option<i64>,
    #[serde(default)]
    pub regex_constraint: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrBool {
    Bool(bool),
    Int(i64),
}

fn flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match IntOrBool::deserialize(deserializer) {
        Ok(IntOrBool::Bool(flag)) => Ok(flag),
        Ok(IntOrBool::Int(0)) => Ok(false),
        Ok(IntOrBool::Int(1)) => Ok(true),
        Ok(IntOrBool::Int(other)) => Err(de::Error::custom(format!("expected 0 or 1, found {}", other))),
        Err(_) => Err(de::Error::custom("expected a boolean or 0/1 integer flag")),
    }
}

fn optional_flag_from_int_or_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    flag_from_int_or_bool(deserializer).map(Some)
}
