//! Core types for the MCP tool server.
//!
//! This module provides foundational types used throughout the system:
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Configuration structures for the server, upstream API and tool exposure

mod config;
mod errors;

pub use config::{
    AllowList, ApiConfig, Config, ObservabilityConfig, ServerConfig, ToolsConfig, DEFAULT_DOMAIN,
};
pub use errors::{
    Error, Result, RPC_INTERNAL_ERROR, RPC_INVALID_PARAMS, RPC_INVALID_REQUEST,
    RPC_METHOD_NOT_FOUND, RPC_PARSE_ERROR,
};
