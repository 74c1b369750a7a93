//! MCP (Model Context Protocol) server over newline-delimited JSON-RPC 2.0.
//!
//! Speaks `initialize`, `ping`, `tools/list` and `tools/call`. Messages are read
//! from stdin one per line and replies are written to stdout; logs go to stderr.

pub mod codec;
pub mod context;
pub mod handlers;
pub mod protocol;
pub mod router;
pub mod server;

pub use context::ServerContext;
pub use protocol::{RpcError, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
