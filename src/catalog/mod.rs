//! Tool infrastructure — descriptors, registry, selection, request preparation.
//!
//! Descriptors are static metadata about Open API operations. The registry is
//! loaded once and only read; selection decides what an MCP client sees, and
//! request preparation turns a tool call into something a transport can send.

mod builtin;
pub mod descriptor;
pub mod registry;
pub mod request;
pub mod selection;

pub use descriptor::{
    AccessTokenKind, HttpMethod, Locale, LocalizedText, ParamDef, ParamType, RequestSchema,
    ToolDescriptor,
};
pub use registry::ToolRegistry;
pub use request::{prepare, PreparedRequest};
pub use selection::{SelectedTools, TokenMode, ToolNameCase, ToolSelection, PRESETS};
