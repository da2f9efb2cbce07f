use methodcheck_types::ObjectInfo;
use serde_json::{Value, json};

use crate::{RpcClient, RpcError};

const SERVICE: &str = "Workspace";

/// Position of the type string in a workspace `object_info` tuple.
const TYPE_INDEX: usize = 2;
const NAME_INDEX: usize = 1;

/// Client for the workspace service.
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    rpc: RpcClient,
}

impl WorkspaceClient {
    pub fn new(url: &str) -> Result<Self, RpcError> {
        Ok(Self {
            rpc: RpcClient::new(SERVICE, url)?,
        })
    }

    /// Looks up the object `name` inside `workspace`.
    ///
    /// Fails with [`RpcError::Remote`] when the service reports the object
    /// (or the workspace) as missing.
    pub async fn get_object_info(&self, workspace: &str, name: &str) -> Result<ObjectInfo, RpcError> {
        let method = "get_object_info_new";
        let params = json!({ "objects": [{ "workspace": workspace, "name": name }] });
        let result = self.rpc.call(method, vec![params]).await?;
        object_info_from_result(method, name, &result)
    }
}

fn object_info_from_result(method: &str, requested_name: &str, result: &[Value]) -> Result<ObjectInfo, RpcError> {
    let tuple = result
        .first()
        .and_then(|infos| infos.get(0))
        .and_then(Value::as_array)
        .ok_or_else(|| RpcError::malformed(method, "missing object_info tuple"))?;
    let type_string = tuple
        .get(TYPE_INDEX)
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::malformed(method, "object_info has no type string"))?;
    let name = tuple.get(NAME_INDEX).and_then(Value::as_str).unwrap_or(requested_name);
    Ok(ObjectInfo {
        name: name.to_string(),
        type_string: type_string.to_string(),
    })
}
