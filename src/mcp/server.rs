//! MCP stdio server — read loop and per-message handling.

use std::sync::Arc;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader};
use tokio_util::sync::CancellationToken;

use crate::mcp::codec::{read_message, write_message, Inbound};
use crate::mcp::context::ServerContext;
use crate::mcp::protocol::{error_response, success_response, RpcError};
use crate::mcp::router;

/// MCP server over a line-delimited JSON-RPC stream.
#[derive(Debug)]
pub struct McpServer {
    ctx: Arc<ServerContext>,
    cancel: CancellationToken,
    max_message_bytes: usize,
}

impl McpServer {
    pub fn new(ctx: ServerContext, max_message_bytes: usize) -> Self {
        Self {
            ctx: Arc::new(ctx),
            cancel: CancellationToken::new(),
            max_message_bytes,
        }
    }

    pub fn context(&self) -> &ServerContext {
        &self.ctx
    }

    /// Handle that cancels [`serve`](Self::serve) from another task.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Serve on the process stdin/stdout.
    pub async fn serve_stdio(&self) -> std::io::Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Run until EOF on `reader`, cancellation, or an I/O error.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!(
            "MCP server '{}' ready ({} tools, max_message_bytes={})",
            self.ctx.server_name,
            self.ctx.tools.len(),
            self.max_message_bytes,
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("MCP server shutting down");
                    break;
                }
                inbound = read_message(&mut reader, self.max_message_bytes) => {
                    let reply = match inbound? {
                        None => {
                            tracing::info!("Input closed, stopping");
                            break;
                        }
                        Some(Inbound::Message(message)) => handle_incoming(&self.ctx, message).await,
                        Some(Inbound::Malformed(reason)) => {
                            tracing::debug!("Parse error: {}", reason);
                            Some(error_response(
                                Value::Null,
                                RpcError::parse_error(format!("Parse error: {}", reason)),
                            ))
                        }
                        Some(Inbound::Oversized(limit)) => {
                            tracing::warn!("Dropped message larger than {} bytes", limit);
                            Some(error_response(
                                Value::Null,
                                RpcError::invalid_request(format!(
                                    "Message exceeds {} bytes",
                                    limit
                                )),
                            ))
                        }
                    };

                    if let Some(reply) = reply {
                        write_message(&mut writer, &reply).await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Handle one decoded message, single or batch. `None` means nothing to write.
pub async fn handle_incoming(ctx: &ServerContext, message: Value) -> Option<Value> {
    match message {
        Value::Array(items) => {
            if items.is_empty() {
                return Some(error_response(
                    Value::Null,
                    RpcError::invalid_request("Empty batch"),
                ));
            }
            let mut replies = Vec::with_capacity(items.len());
            for item in items {
                if let Some(reply) = handle_single(ctx, item).await {
                    replies.push(reply);
                }
            }
            // A batch of notifications gets no reply at all.
            (!replies.is_empty()).then_some(Value::Array(replies))
        }
        other => handle_single(ctx, other).await,
    }
}

async fn handle_single(ctx: &ServerContext, message: Value) -> Option<Value> {
    let Value::Object(mut object) = message else {
        return Some(error_response(
            Value::Null,
            RpcError::invalid_request("Request must be an object"),
        ));
    };

    let id = object.remove("id");
    let reply_id = id.clone().unwrap_or(Value::Null);

    if object.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Some(error_response(
            reply_id,
            RpcError::invalid_request("jsonrpc must be \"2.0\""),
        ));
    }

    let method = match object.get("method").and_then(Value::as_str) {
        Some(method) => method.to_string(),
        None => {
            return Some(error_response(
                reply_id,
                RpcError::invalid_request("Missing method"),
            ))
        }
    };
    let params = object.remove("params").unwrap_or(Value::Null);

    let Some(id) = id else {
        router::route_notification(&method);
        return None;
    };

    tracing::debug!("-> {} (id={})", method, id);
    let reply = match router::route_request(ctx, &method, params).await {
        Ok(result) => success_response(id, result),
        Err(err) => {
            tracing::debug!("<- {} failed: {} ({})", method, err.message, err.code);
            error_response(id, err)
        }
    };
    Some(reply)
}
