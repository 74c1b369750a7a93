//! Configuration structures.
//!
//! Configuration is loaded from an optional JSON file and then overridden by
//! command-line flags and environment variables (see `main.rs`).

use crate::catalog::{Locale, TokenMode, ToolNameCase};
use crate::normalize::ListInput;
use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default Open API domain.
pub const DEFAULT_DOMAIN: &str = "https://open.feishu.cn";

/// Global server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// MCP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Open API configuration.
    #[serde(default)]
    pub api: ApiConfig,

    /// Tool exposure configuration.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from a JSON file. Missing sections take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::config(format!("invalid config {}: {}", path.display(), e)))
    }
}

/// MCP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Name reported in `serverInfo`.
    pub name: String,

    /// Maximum accepted size of a single JSON-RPC line, in bytes.
    pub max_message_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "openapi-mcp".to_string(),
            max_message_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Upstream Open API configuration.
///
/// Tokens are provisioned out of band; nothing here acquires or refreshes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the Open API.
    pub domain: String,

    /// Per-request timeout.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Static tenant access token.
    pub tenant_access_token: Option<String>,

    /// Static user access token.
    pub user_access_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_string(),
            timeout: Duration::from_secs(30),
            tenant_access_token: None,
            user_access_token: None,
        }
    }
}

/// Allow-list as written in a config file: either one delimited string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowList {
    Text(String),
    Items(Vec<String>),
}

impl Default for AllowList {
    fn default() -> Self {
        AllowList::Items(Vec::new())
    }
}

impl<'a> From<&'a AllowList> for ListInput<'a> {
    fn from(list: &'a AllowList) -> Self {
        match list {
            AllowList::Text(s) => ListInput::Text(s),
            AllowList::Items(items) => ListInput::from(items),
        }
    }
}

/// Tool exposure configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Tool names, project ids or presets to expose. Empty exposes everything.
    pub allow: AllowList,

    /// Language of tool and parameter descriptions.
    pub language: Locale,

    /// Which access token kinds tools may use.
    pub token_mode: TokenMode,

    /// Case style of exposed tool names.
    pub name_case: ToolNameCase,
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Tracing log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    pub log_level: String,

    /// Enable JSON log formatting.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
