//! # OpenAPI MCP Core - Open API tools for MCP clients
//!
//! Exposes a collaboration-suite Open API as Model Context Protocol tools:
//! - Tolerant normalization of user-supplied allow-lists
//! - An immutable, validated registry of tool descriptors
//! - Selection of exposed tools by name, project or preset
//! - Argument validation and request preparation
//! - An HTTP transport with bearer-token auth
//! - A newline-delimited JSON-RPC 2.0 stdio server
//!
//! ## Architecture
//!
//! ```text
//!   stdin ──► mcp::server ──► mcp::router ──► handlers::tools
//!                                                │
//!              catalog::ToolRegistry ◄── selection ┤
//!                                                ▼
//!                              catalog::prepare ──► transport ──► Open API
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod catalog;
pub mod mcp;
pub mod normalize;
pub mod transport;
pub mod types;

// Internal utilities
pub mod observability;
pub mod validation;

pub use normalize::normalize;
pub use types::{Config, Error, Result};
