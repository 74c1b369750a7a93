//! Session handshake handlers.

use crate::mcp::context::ServerContext;
use crate::mcp::protocol::MCP_PROTOCOL_VERSION;
use serde_json::{json, Value};

pub fn initialize(ctx: &ServerContext, params: &Value) -> Value {
    let client = params
        .pointer("/clientInfo/name")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let requested = params
        .get("protocolVersion")
        .and_then(Value::as_str)
        .unwrap_or(MCP_PROTOCOL_VERSION);
    tracing::info!(
        "initialize from {} (requested protocol {}, serving {} tools)",
        client,
        requested,
        ctx.tools.len()
    );

    json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "serverInfo": {
            "name": ctx.server_name,
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}

pub fn ping() -> Value {
    json!({})
}
