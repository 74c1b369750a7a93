//! Method handlers, grouped by MCP capability.

pub mod lifecycle;
pub mod tools;
