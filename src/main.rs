//! OpenAPI MCP server - main entry point.
//!
//! Serves the selected Open API tools over MCP on stdin/stdout. Configuration
//! comes from an optional JSON file, overridden by flags and environment.

use clap::Parser;
use openapi_mcp_core::catalog::{Locale, TokenMode, ToolNameCase, ToolRegistry, ToolSelection};
use openapi_mcp_core::mcp::{McpServer, ServerContext};
use openapi_mcp_core::transport::HttpTransport;
use openapi_mcp_core::types::AllowList;
use openapi_mcp_core::Config;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "openapi-mcp", version, about = "MCP stdio server for Open API tools")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, env = "OPENAPI_MCP_CONFIG")]
    config: Option<PathBuf>,

    /// Tools, projects or presets to expose, separated by commas or spaces.
    #[arg(short, long, env = "OPENAPI_MCP_TOOLS")]
    tools: Option<String>,

    /// Description language: en or zh.
    #[arg(short, long, env = "OPENAPI_MCP_LANGUAGE")]
    language: Option<Locale>,

    /// auto, user_access_token or tenant_access_token.
    #[arg(long, env = "OPENAPI_MCP_TOKEN_MODE")]
    token_mode: Option<TokenMode>,

    /// Exposed tool name case: snake, camel, kebab or dot.
    #[arg(long, env = "OPENAPI_MCP_TOOL_NAME_CASE")]
    tool_name_case: Option<ToolNameCase>,

    /// Open API base URL.
    #[arg(long, env = "OPENAPI_MCP_DOMAIN")]
    domain: Option<String>,

    #[arg(long, env = "OPENAPI_MCP_TENANT_TOKEN", hide_env_values = true)]
    tenant_access_token: Option<String>,

    #[arg(long, env = "OPENAPI_MCP_USER_TOKEN", hide_env_values = true)]
    user_access_token: Option<String>,
}

impl Cli {
    fn into_config(self) -> openapi_mcp_core::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        if let Some(tools) = self.tools {
            config.tools.allow = AllowList::Text(tools);
        }
        if let Some(language) = self.language {
            config.tools.language = language;
        }
        if let Some(token_mode) = self.token_mode {
            config.tools.token_mode = token_mode;
        }
        if let Some(name_case) = self.tool_name_case {
            config.tools.name_case = name_case;
        }
        if let Some(domain) = self.domain {
            config.api.domain = domain;
        }
        if self.tenant_access_token.is_some() {
            config.api.tenant_access_token = self.tenant_access_token;
        }
        if self.user_access_token.is_some() {
            config.api.user_access_token = self.user_access_token;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    openapi_mcp_core::observability::init_tracing(&config.observability);

    let registry = ToolRegistry::builtin()?;
    let tools = ToolSelection::from_config(&config.tools).apply(registry);
    if tools.is_empty() {
        tracing::warn!("No tools selected; tools/list will be empty");
    }

    let transport = HttpTransport::new(&config.api)?;
    let ctx = ServerContext::new(tools, Arc::new(transport))
        .with_server_name(config.server.name.clone())
        .with_locale(config.tools.language)
        .with_token_mode(config.tools.token_mode);

    tracing::info!(
        "Starting {} against {} (language={:?}, token_mode={:?})",
        config.server.name,
        config.api.domain,
        config.tools.language,
        config.tools.token_mode,
    );

    let server = McpServer::new(ctx, config.server.max_message_bytes);
    let cancel = server.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            cancel.cancel();
        }
    });

    server.serve_stdio().await?;
    Ok(())
}
