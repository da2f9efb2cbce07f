//! Remote service clients.
//!
//! Both collaborators the validator talks to (the narrative method store and
//! the workspace service) speak JSON-RPC 1.1 over HTTP POST. This crate
//! provides:
//!
//! - [`RpcClient`]: envelope construction, authentication and error mapping
//! - [`MethodStoreClient`]: method specification retrieval
//! - [`WorkspaceClient`]: object info lookup
//!
//! # Example
//!
//! ```ignore
//! use methodcheck_api::WorkspaceClient;
//!
//! async fn lookup() -> Result<(), methodcheck_api::RpcError> {
//!     let client = WorkspaceClient::new("https://kbase.us/services/ws")?;
//!     let info = client.get_object_info("my_workspace", "reads_lib").await?;
//!     println!("type: {}", info.type_string);
//!     Ok(())
//! }
//! ```

mod method_store;
mod workspace;

use std::sync::atomic::{AtomicU64, Ordering};
use std::{env, time::Duration};

use methodcheck_util::redact_sensitive;
use reqwest::{Client, header};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub use method_store::MethodStoreClient;
pub use workspace::WorkspaceClient;

/// Environment variable holding the authentication token sent with every call.
pub const AUTH_TOKEN_ENV: &str = "KB_AUTH_TOKEN";

/// Hostnames allowed to use plain HTTP.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while talking to a remote service.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("invalid service URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("transport error calling {method}: {source}")]
    Transport {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} failed: {message}")]
    Remote { method: String, message: String },

    #[error("unexpected response from {method}: {reason}")]
    Malformed { method: String, reason: String },
}

impl RpcError {
    pub(crate) fn malformed(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

/// Thin JSON-RPC 1.1 client bound to one service endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    url: Url,
    http: Client,
    service: String,
    next_id: std::sync::Arc<AtomicU64>,
}

impl RpcClient {
    /// Creates a client for `service` (e.g., `Workspace`) reachable at `url`.
    ///
    /// The token from [`AUTH_TOKEN_ENV`], when set, is sent as the
    /// `Authorization` header.
    pub fn new(service: impl Into<String>, url: &str) -> Result<Self, RpcError> {
        let url = validate_service_url(url)?;

        let mut default_headers = header::HeaderMap::new();
        if let Ok(token) = env::var(AUTH_TOKEN_ENV)
            && !token.trim().is_empty()
        {
            let value = header::HeaderValue::from_str(token.trim()).map_err(|error| RpcError::InvalidUrl {
                url: url.to_string(),
                reason: format!("{} is not a valid header value: {}", AUTH_TOKEN_ENV, error),
            })?;
            default_headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|source| RpcError::Transport {
                method: "client setup".to_string(),
                source,
            })?;

        Ok(Self {
            url,
            http,
            service: service.into(),
            next_id: std::sync::Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Calls `<service>.<function>` with positional `params` and returns the
    /// `result` array of the response.
    pub async fn call(&self, function: &str, params: Vec<Value>) -> Result<Vec<Value>, RpcError> {
        let method = format!("{}.{}", self.service, function);
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = rpc_envelope(&method, params, request_id);
        debug!(method = %method, url = %self.url, request_id, "rpc call");

        let response = self
            .http
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| RpcError::Transport {
                method: method.clone(),
                source,
            })?;
        let status = response.status();
        let payload: Value = response.json().await.map_err(|source| RpcError::Transport {
            method: method.clone(),
            source,
        })?;
        debug!(method = %method, status = %status, "rpc response");

        parse_rpc_response(&method, payload)
    }
}

fn rpc_envelope(method: &str, params: Vec<Value>, request_id: u64) -> Value {
    json!({
        "version": "1.1",
        "method": method,
        "params": params,
        "id": request_id.to_string(),
    })
}

/// Extracts the `result` array, or converts an `error` member into
/// [`RpcError::Remote`].
fn parse_rpc_response(method: &str, payload: Value) -> Result<Vec<Value>, RpcError> {
    if let Some(error) = payload.get("error").filter(|error| !error.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(RpcError::Remote {
            method: method.to_string(),
            message: redact_sensitive(&message),
        });
    }

    match payload.get("result") {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(RpcError::malformed(method, format!("`result` is not an array: {}", other))),
        None => Err(RpcError::malformed(method, "response has neither `result` nor `error`")),
    }
}

/// Validate that a service URL is acceptable.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
fn validate_service_url(raw: &str) -> Result<Url, RpcError> {
    let invalid = |reason: String| RpcError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let parsed = Url::parse(raw).map_err(|error| invalid(error.to_string()))?;
    let host_name = parsed.host_str().ok_or_else(|| invalid("URL must include a host".to_string()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(parsed);
    }

    if parsed.scheme() != "https" {
        return Err(invalid(format!(
            "must use https for non-localhost hosts; got '{}://'",
            parsed.scheme()
        )));
    }
    Ok(parsed)
}
