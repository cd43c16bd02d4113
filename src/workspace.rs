use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::config::{ConnectionConfig, ResolvedSettings};
use crate::error::GtoError;

const GET_OBJECTS_METHOD: &str = "Workspace.get_objects2";

#[derive(Debug, Clone)]
pub struct WorkspaceObject {
    // wsid/objid/version, from info positions 6, 0 and 4.
    pub reference: String,
    pub type_name: String,
    pub data: Value,
}

impl WorkspaceObject {
    pub fn child_path(&self, child: &str) -> String {
        format!("{};{}", self.reference, child)
    }

    pub fn is_type(&self, module_and_name: &str) -> bool {
        self.type_name
            .split('-')
            .next()
            .is_some_and(|name| name == module_and_name)
    }
}

pub trait WorkspaceClient: Send + Sync {
    fn get_object(&self, reference: &str) -> Result<WorkspaceObject, GtoError>;
}

pub struct WorkspaceHttpClient {
    client: Client,
    url: Url,
    next_id: AtomicU64,
}

impl WorkspaceHttpClient {
    pub fn new(
        connection: &ConnectionConfig,
        settings: &ResolvedSettings,
    ) -> Result<Self, GtoError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&settings.user_agent)
                .map_err(|err| GtoError::ConfigParse(err.to_string()))?,
        );
        if !connection.token.is_empty() {
            let mut token = HeaderValue::from_str(&connection.token)
                .map_err(|err| GtoError::ConfigParse(err.to_string()))?;
            token.set_sensitive(true);
            headers.insert(AUTHORIZATION, token);
        }
        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .map_err(|err| GtoError::WorkspaceHttp(err.to_string()))?;
        Ok(Self {
            client,
            url: connection.workspace_url.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    fn call(&self, method: &'static str, params: Vec<Value>) -> Result<String, GtoError> {
        let request = RpcRequest {
            version: "1.1",
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed).to_string(),
        };
        debug!(method, id = %request.id, "workspace call");
        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .map_err(|err| GtoError::WorkspaceHttp(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| GtoError::WorkspaceHttp(err.to_string()))?;
        handle_status(status, body)
    }
}

pub fn handle_status(status: u16, body: String) -> Result<String, GtoError> {
    if (200..300).contains(&status) {
        return Ok(body);
    }
    // JSON-RPC errors arrive with a 500 status and an error body.
    if let Some(err) = rpc_error(&body) {
        return Err(err);
    }
    Err(GtoError::WorkspaceStatus {
        status,
        message: body,
    })
}

impl WorkspaceClient for WorkspaceHttpClient {
    fn get_object(&self, reference: &str) -> Result<WorkspaceObject, GtoError> {
        let params = vec![json!({ "objects": [{ "ref": reference }] })];
        let body = self.call(GET_OBJECTS_METHOD, params)?;
        parse_get_objects_response(reference, &body)
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest {
    version: &'static str,
    method: &'static str,
    params: Vec<Value>,
    id: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Vec<GetObjectsResult>>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct GetObjectsResult {
    #[serde(default)]
    data: Vec<ObjectData>,
}

#[derive(Debug, Deserialize)]
struct ObjectData {
    data: Value,
    info: Vec<Value>,
}

fn rpc_error(body: &str) -> Option<GtoError> {
    let response: RpcResponse = serde_json::from_str(body).ok()?;
    response.error.map(|err| GtoError::WorkspaceRpc {
        code: err.code,
        message: err.message,
    })
}

pub fn parse_get_objects_response(
    reference: &str,
    body: &str,
) -> Result<WorkspaceObject, GtoError> {
    let response: RpcResponse = serde_json::from_str(body)
        .map_err(|err| GtoError::WorkspaceHttp(format!("invalid response: {err}")))?;
    if let Some(err) = response.error {
        return Err(GtoError::WorkspaceRpc {
            code: err.code,
            message: err.message,
        });
    }
    let object = response
        .result
        .and_then(|results| results.into_iter().next())
        .and_then(|result| result.data.into_iter().next())
        .ok_or_else(|| GtoError::ObjectNotFound(reference.to_string()))?;

    let info = &object.info;
    let info_int = |index: usize| {
        info.get(index)
            .and_then(Value::as_i64)
            .ok_or_else(|| GtoError::InvalidField {
                field: format!("info[{index}]"),
                expected: "an integer",
            })
    };
    let type_name = info
        .get(2)
        .and_then(Value::as_str)
        .ok_or_else(|| GtoError::InvalidField {
            field: "info[2]".to_string(),
            expected: "a type string",
        })?
        .to_string();

    Ok(WorkspaceObject {
        reference: format!("{}/{}/{}", info_int(6)?, info_int(0)?, info_int(4)?),
        type_name,
        data: object.data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_path_joins_references() {
        let object = WorkspaceObject {
            reference: "1/2/3".to_string(),
            type_name: "KBaseGenomes.Genome-8.2".to_string(),
            data: Value::Null,
        };
        assert_eq!(object.child_path("4/5/6"), "1/2/3;4/5/6");
        assert!(object.is_type("KBaseGenomes.Genome"));
        assert!(!object.is_type("KBaseGenomes.GenomeSet"));
    }

    #[test]
    fn rpc_error_from_server_fault() {
        let body = r#"{"version":"1.1","error":{"name":"JSONRPCError","code":-32500,"message":"No workspace"}}"#;
        let err = rpc_error(body).unwrap();
        assert!(matches!(err, GtoError::WorkspaceRpc { code: -32500, .. }));
        assert!(rpc_error("<html>bad gateway</html>").is_none());
    }
}
