use methodcheck_types::ReleaseTag;
use serde_json::{Value, json};
use tracing::debug;

use crate::{RpcClient, RpcError};

const SERVICE: &str = "NarrativeMethodStore";

/// Client for the narrative method store.
#[derive(Debug, Clone)]
pub struct MethodStoreClient {
    rpc: RpcClient,
}

impl MethodStoreClient {
    pub fn new(url: &str) -> Result<Self, RpcError> {
        Ok(Self {
            rpc: RpcClient::new(SERVICE, url)?,
        })
    }

    /// Fetches every method specification document published under `tag`.
    ///
    /// Documents are returned unparsed; each is parsed separately when the
    /// snapshot is built.
    pub async fn list_methods_spec(&self, tag: ReleaseTag) -> Result<Vec<Value>, RpcError> {
        let method = "list_methods_spec";
        let result = self.rpc.call(method, vec![json!({ "tag": tag.as_str() })]).await?;
        let documents = spec_documents(method, first_result(method, result)?)?;
        debug!(tag = %tag, count = documents.len(), "fetched method specs");
        Ok(documents)
    }

    /// Fetches the long-form description of one method.
    pub async fn get_method_description(&self, method_id: &str, tag: ReleaseTag) -> Result<String, RpcError> {
        let method = "get_method_full_info";
        let result = self
            .rpc
            .call(method, vec![json!({ "ids": [method_id], "tag": tag.as_str() })])
            .await?;
        let infos = first_result(method, result)?;
        description_from_full_info(method, &infos)
    }
}

fn first_result(method: &str, result: Vec<Value>) -> Result<Value, RpcError> {
    result
        .into_iter()
        .next()
        .ok_or_else(|| RpcError::malformed(method, "empty result"))
}

fn spec_documents(method: &str, specs: Value) -> Result<Vec<Value>, RpcError> {
    match specs {
        Value::Array(documents) => Ok(documents),
        other => Err(RpcError::malformed(
            method,
            format!("expected a list of specifications, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn description_from_full_info(method: &str, infos: &Value) -> Result<String, RpcError> {
    infos
        .get(0)
        .and_then(|info| info.get("description"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| RpcError::malformed(method, "missing method description"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_read_from_first_info() {
        let infos = json!([{ "id": "a/b", "description": "<p>Assembles reads</p>" }]);
        let description = description_from_full_info("get_method_full_info", &infos).expect("description");
        assert_eq!(description, "<p>Assembles reads</p>");
    }

    #[test]
    fn empty_info_list_is_malformed() {
        let err = description_from_full_info("get_method_full_info", &json!([])).unwrap_err();
        assert!(matches!(err, RpcError::Malformed { .. }));
    }

    #[test]
    fn spec_documents_are_kept_unparsed() {
        let specs = json!([{ "info": { "id": "Good/ok" }, "parameters": [] }, { "info": { "id": "Bad/broken" } }]);
        let documents = spec_documents("list_methods_spec", specs).expect("documents");
        assert_eq!(documents.len(), 2);
        assert!(spec_documents("list_methods_spec", json!({ "methods": [] })).is_err());
    }

    #[test]
    fn empty_result_is_malformed() {
        assert!(first_result("list_methods_spec", Vec::new()).is_err());
    }
}
