//! Shared state for request handlers.

use crate::catalog::{Locale, SelectedTools, TokenMode};
use crate::transport::ApiTransport;
use std::fmt;
use std::sync::Arc;

/// Everything a handler may read. Immutable for the lifetime of the server.
pub struct ServerContext {
    pub server_name: String,
    pub locale: Locale,
    pub token_mode: TokenMode,
    pub tools: SelectedTools,
    pub transport: Arc<dyn ApiTransport>,
}

impl ServerContext {
    pub fn new(tools: SelectedTools, transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            server_name: "openapi-mcp".to_string(),
            locale: Locale::default(),
            token_mode: TokenMode::default(),
            tools,
            transport,
        }
    }

    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_token_mode(mut self, token_mode: TokenMode) -> Self {
        self.token_mode = token_mode;
        self
    }
}

impl fmt::Debug for ServerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerContext")
            .field("server_name", &self.server_name)
            .field("locale", &self.locale)
            .field("token_mode", &self.token_mode)
            .field("tools", &self.tools.len())
            .finish_non_exhaustive()
    }
}
