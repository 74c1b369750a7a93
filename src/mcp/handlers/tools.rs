//! Tools handlers — listing exposed tools and executing tool calls.

use crate::catalog::prepare;
use crate::mcp::context::ServerContext;
use crate::mcp::protocol::RpcError;
use crate::mcp::router::str_field;
use crate::types::Error;
use serde_json::{json, Value};

/// `tools/list`: every selected tool with its localized description and input schema.
pub fn list(ctx: &ServerContext) -> Value {
    let tools: Vec<Value> = ctx
        .tools
        .iter()
        .map(|(name, descriptor)| {
            json!({
                "name": name,
                "description": descriptor.description.get(ctx.locale),
                "inputSchema": descriptor.input_schema(ctx.locale),
            })
        })
        .collect();

    json!({ "tools": tools })
}

/// `tools/call`: unknown tools are protocol errors; everything after lookup is
/// reported inside the result with `isError` so the model can react to it.
pub async fn call(ctx: &ServerContext, params: Value) -> Result<Value, RpcError> {
    if !params.is_object() {
        return Err(RpcError::invalid_params("tools/call params must be an object"));
    }
    let name = str_field(&params, "name")?;
    let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

    let descriptor = ctx
        .tools
        .get(&name)
        .ok_or_else(|| Error::not_found(format!("Unknown tool: {}", name)))?;

    let request = match prepare(descriptor, &arguments, ctx.token_mode) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("{} rejected arguments: {}", descriptor.name, e);
            return Ok(error_result(&e));
        }
    };

    let outcome = match ctx.transport.send(&request).await {
        Ok(response) => response.into_result(),
        Err(e) => Err(e),
    };

    match outcome {
        Ok(data) => Ok(json!({
            "content": [{ "type": "text", "text": to_pretty_json(&data) }]
        })),
        Err(e) => {
            tracing::warn!("{} {} failed: {}", request.method, request.resolved_path(), e);
            Ok(error_result(&e))
        }
    }
}

fn error_result(err: &Error) -> Value {
    json!({
        "isError": true,
        "content": [{ "type": "text", "text": err.to_string() }]
    })
}

fn to_pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
