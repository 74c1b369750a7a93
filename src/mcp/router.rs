//! Top-level MCP router — routes by method, delegates to handlers.

use crate::mcp::context::ServerContext;
use crate::mcp::handlers;
use crate::mcp::protocol::RpcError;
use crate::types::{Error, Result};
use serde_json::Value;

/// Route a JSON-RPC request to the appropriate handler.
pub async fn route_request(
    ctx: &ServerContext,
    method: &str,
    params: Value,
) -> std::result::Result<Value, RpcError> {
    match method {
        "initialize" => Ok(handlers::lifecycle::initialize(ctx, &params)),
        "ping" => Ok(handlers::lifecycle::ping()),
        "tools/list" => Ok(handlers::tools::list(ctx)),
        "tools/call" => handlers::tools::call(ctx, params).await,
        _ => Err(RpcError::method_not_found(method)),
    }
}

/// Notifications never get a reply; known ones are acknowledged in the log.
pub fn route_notification(method: &str) {
    match method {
        "notifications/initialized" => tracing::info!("Client initialized"),
        "notifications/cancelled" => tracing::debug!("Client cancelled a request"),
        other => tracing::debug!("Ignoring notification {}", other),
    }
}

// =============================================================================
// Shared helpers
// =============================================================================

pub fn str_field(body: &Value, key: &str) -> Result<String> {
    body.get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| Error::validation(format!("Missing required field: {}", key)))
}
