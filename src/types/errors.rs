//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// JSON-RPC: invalid JSON was received.
pub const RPC_PARSE_ERROR: i64 = -32700;
/// JSON-RPC: the payload is not a valid request object.
pub const RPC_INVALID_REQUEST: i64 = -32600;
/// JSON-RPC: the method does not exist.
pub const RPC_METHOD_NOT_FOUND: i64 = -32601;
/// JSON-RPC: invalid method parameters.
pub const RPC_INVALID_PARAMS: i64 = -32602;
/// JSON-RPC: internal error.
pub const RPC_INTERNAL_ERROR: i64 = -32603;

/// Main error enum for the MCP tool server.
#[derive(Error, Debug)]
pub enum Error {
    /// Validation errors (map to JSON-RPC INVALID_PARAMS).
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found (map to JSON-RPC INVALID_PARAMS).
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// No credential available for the requested access token kind.
    #[error("auth error: {0}")]
    Auth(String),

    /// Transport failures before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The Open API answered with a non-zero business code.
    #[error("upstream error {code}: {msg}")]
    Upstream { code: i64, msg: String },

    /// Internal errors (map to JSON-RPC INTERNAL_ERROR).
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client errors.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Convert to a JSON-RPC error code.
    pub fn to_rpc_code(&self) -> i64 {
        match self {
            Error::Validation(_) | Error::NotFound(_) => RPC_INVALID_PARAMS,
            Error::Serialization(_) => RPC_PARSE_ERROR,
            Error::Config(_)
            | Error::Auth(_)
            | Error::Transport(_)
            | Error::Upstream { .. }
            | Error::Internal(_)
            | Error::Http(_)
            | Error::Io(_) => RPC_INTERNAL_ERROR,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn upstream(code: i64, msg: impl Into<String>) -> Self {
        Self::Upstream {
            code,
            msg: msg.into(),
        }
    }
}
