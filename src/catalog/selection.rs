//! Tool selection: which descriptors an MCP client sees, and under what name.
//!
//! The allow-list comes out of [`crate::normalize`]; a token matches a tool by
//! full name, by project id, or through a preset. An allow-list with no non-empty
//! token means "no filter".

use super::descriptor::{AccessTokenKind, ToolDescriptor};
use super::registry::ToolRegistry;
use crate::normalize::{normalize, ListInput};
use crate::types::{Error, Result, ToolsConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// MCP clients reject longer tool names.
pub const MAX_TOOL_NAME_LEN: usize = 64;

/// Named allow-lists.
pub const PRESETS: &[(&str, &[&str])] = &[
    (
        "preset.light",
        &[
            "im.v1.message.list",
            "im.v1.message.create",
            "contact.v3.user.batchGetId",
            "docx.v1.document.rawContent",
            "bitable.v1.appTableRecord.search",
        ],
    ),
    (
        "preset.default",
        &[
            "im.v1.chat.create",
            "im.v1.chat.list",
            "im.v1.chatMembers.get",
            "im.v1.message.create",
            "im.v1.message.list",
            "contact.v3.user.batchGetId",
            "docx.v1.document.rawContent",
            "bitable.v1.appTableRecord.search",
        ],
    ),
    (
        "preset.im.default",
        &[
            "im.v1.chat.create",
            "im.v1.chat.list",
            "im.v1.chatMembers.get",
            "im.v1.message.create",
            "im.v1.message.list",
            "im.v1.message.reply",
        ],
    ),
    (
        "preset.contact.default",
        &[
            "contact.v3.user.get",
            "contact.v3.user.batchGetId",
            "contact.v3.department.children",
        ],
    ),
    (
        "preset.helpdesk.default",
        &["helpdesk.v1.ticket.get", "helpdesk.v1.faq.list"],
    ),
    (
        "preset.card.default",
        &["cardkit.v1.card.create", "cardkit.v1.cardElement.content", "im.v1.message.create"],
    ),
];

fn preset(name: &str) -> Option<&'static [&'static str]> {
    PRESETS
        .iter()
        .find(|(preset_name, _)| *preset_name == name)
        .map(|(_, tools)| *tools)
}

// =============================================================================
// Token mode
// =============================================================================

/// Which access token kinds exposed tools may be called with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenMode {
    #[default]
    Auto,
    UserAccessToken,
    TenantAccessToken,
}

impl TokenMode {
    /// The single token kind this mode pins, if any.
    pub fn required_kind(self) -> Option<AccessTokenKind> {
        match self {
            TokenMode::Auto => None,
            TokenMode::UserAccessToken => Some(AccessTokenKind::User),
            TokenMode::TenantAccessToken => Some(AccessTokenKind::Tenant),
        }
    }

    pub fn permits(self, descriptor: &ToolDescriptor) -> bool {
        self.required_kind().map_or(true, |kind| descriptor.supports(kind))
    }
}

impl FromStr for TokenMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "auto" => Ok(TokenMode::Auto),
            "user_access_token" => Ok(TokenMode::UserAccessToken),
            "tenant_access_token" => Ok(TokenMode::TenantAccessToken),
            other => Err(Error::config(format!(
                "unknown token mode '{}', expected one of: auto, user_access_token, tenant_access_token",
                other
            ))),
        }
    }
}

// =============================================================================
// Tool name case
// =============================================================================

/// Case style of exposed tool names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolNameCase {
    #[default]
    Snake,
    Camel,
    Kebab,
    Dot,
}

impl ToolNameCase {
    /// Convert a fully qualified name, truncated to [`MAX_TOOL_NAME_LEN`].
    pub fn apply(self, name: &str) -> String {
        let converted = match self {
            ToolNameCase::Snake => name.replace('.', "_"),
            ToolNameCase::Kebab => name.replace('.', "-"),
            ToolNameCase::Dot => name.to_string(),
            ToolNameCase::Camel => camel_from_snake(&name.replace('.', "_")),
        };
        converted.chars().take(MAX_TOOL_NAME_LEN).collect()
    }
}

/// `_x` becomes `X` for every word character `x`.
fn camel_from_snake(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut chars = snake.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('_', Some(&next)) if next.is_ascii_alphanumeric() || next == '_' => {
                out.extend(next.to_uppercase());
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

impl FromStr for ToolNameCase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snake" => Ok(ToolNameCase::Snake),
            "camel" => Ok(ToolNameCase::Camel),
            "kebab" => Ok(ToolNameCase::Kebab),
            "dot" => Ok(ToolNameCase::Dot),
            other => Err(Error::config(format!(
                "unknown tool name case '{}', expected one of: snake, camel, kebab, dot",
                other
            ))),
        }
    }
}

impl fmt::Display for ToolNameCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ToolNameCase::Snake => "snake",
            ToolNameCase::Camel => "camel",
            ToolNameCase::Kebab => "kebab",
            ToolNameCase::Dot => "dot",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Allow-list plus token and naming policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolSelection {
    pub allow: Vec<String>,
    pub token_mode: TokenMode,
    pub name_case: ToolNameCase,
}

impl ToolSelection {
    pub fn new<'a>(allow: impl Into<ListInput<'a>>) -> Self {
        Self {
            allow: normalize(allow),
            ..Self::default()
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self {
            allow: normalize(&config.allow),
            token_mode: config.token_mode,
            name_case: config.name_case,
        }
    }

    pub fn with_token_mode(mut self, token_mode: TokenMode) -> Self {
        self.token_mode = token_mode;
        self
    }

    pub fn with_name_case(mut self, name_case: ToolNameCase) -> Self {
        self.name_case = name_case;
        self
    }

    /// Non-empty allow-list tokens; empty tokens match nothing.
    fn active_tokens(&self) -> Vec<&str> {
        self.allow
            .iter()
            .map(String::as_str)
            .filter(|token| !token.is_empty())
            .collect()
    }

    fn token_matches(token: &str, descriptor: &ToolDescriptor) -> bool {
        token == descriptor.name
            || token == descriptor.project
            || preset(token).is_some_and(|tools| tools.contains(&descriptor.name.as_str()))
    }

    /// Pick descriptors from `registry` and key them by exposed name.
    pub fn apply(&self, registry: &ToolRegistry) -> SelectedTools {
        let tokens = self.active_tokens();

        for token in &tokens {
            if !registry.iter().any(|d| Self::token_matches(token, d)) {
                tracing::warn!("Allow-list entry '{}' matches no tool", token);
            }
        }

        let mut by_exposed: BTreeMap<String, Arc<ToolDescriptor>> = BTreeMap::new();
        for descriptor in registry.iter() {
            let allowed = tokens.is_empty() || tokens.iter().any(|t| Self::token_matches(t, descriptor));
            if !allowed || !self.token_mode.permits(descriptor) {
                continue;
            }

            let exposed = self.name_case.apply(&descriptor.name);
            if let Some(existing) = by_exposed.get(&exposed) {
                tracing::warn!(
                    "Exposed name '{}' of {} collides with {}; skipping",
                    exposed,
                    descriptor.name,
                    existing.name
                );
                continue;
            }
            by_exposed.insert(exposed, Arc::clone(descriptor));
        }

        tracing::info!(
            "Selected {} of {} tools (allow={:?}, token_mode={:?}, name_case={})",
            by_exposed.len(),
            registry.len(),
            tokens,
            self.token_mode,
            self.name_case
        );

        SelectedTools { by_exposed }
    }
}

/// Result of a selection: exposed name → descriptor, ordered by exposed name.
#[derive(Debug, Clone, Default)]
pub struct SelectedTools {
    by_exposed: BTreeMap<String, Arc<ToolDescriptor>>,
}

impl SelectedTools {
    pub fn get(&self, exposed_name: &str) -> Option<&Arc<ToolDescriptor>> {
        self.by_exposed.get(exposed_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ToolDescriptor>)> {
        self.by_exposed.iter().map(|(name, d)| (name.as_str(), d))
    }

    pub fn names(&self) -> Vec<&str> {
        self.by_exposed.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.by_exposed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_exposed.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::descriptor::HttpMethod;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn registry() -> ToolRegistry {
        let tool = |name: &str| {
            ToolDescriptor::new(name, HttpMethod::Get, "/open-apis/x", "", "")
        };
        ToolRegistry::from_descriptors(vec![
            tool("im.v1.message.create"),
            tool("im.v1.chat.list"),
            tool("contact.v3.user.batchGetId").with_tokens(&[AccessTokenKind::Tenant]),
            tool("docx.v1.document.rawContent").with_tokens(&[AccessTokenKind::User]),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_allow_list_selects_everything() {
        let selected = ToolSelection::new(None::<&str>).apply(&registry());
        assert_eq!(selected.len(), 4);

        let selected = ToolSelection::new(&["", "  "]).apply(&registry());
        assert_eq!(selected.len(), 4);
    }

    #[test]
    fn test_match_by_name_with_edge_empties() {
        let selected = ToolSelection::new(" im.v1.chat.list ").apply(&registry());
        assert_eq!(selected.names(), vec!["im_v1_chat_list"]);
    }

    #[test]
    fn test_match_by_project() {
        let selected = ToolSelection::new("im").apply(&registry());
        assert_eq!(
            selected.names(),
            vec!["im_v1_chat_list", "im_v1_message_create"]
        );
    }

    #[test]
    fn test_match_by_preset() {
        let selected = ToolSelection::new("preset.light").apply(&registry());
        assert_eq!(
            selected.names(),
            vec![
                "contact_v3_user_batchGetId",
                "docx_v1_document_rawContent",
                "im_v1_message_create",
            ]
        );
    }

    #[test]
    fn test_token_mode_filters() {
        let tenant = ToolSelection::new(None::<&str>)
            .with_token_mode(TokenMode::TenantAccessToken)
            .apply(&registry());
        assert!(tenant.get("docx_v1_document_rawContent").is_none());
        assert_eq!(tenant.len(), 3);

        let user = ToolSelection::new(None::<&str>)
            .with_token_mode(TokenMode::UserAccessToken)
            .apply(&registry());
        assert!(user.get("contact_v3_user_batchGetId").is_none());
        assert_eq!(user.len(), 3);
    }

    #[test]
    fn test_name_case_conversions() {
        let name = "contact.v3.user.batchGetId";
        assert_eq!(ToolNameCase::Snake.apply(name), "contact_v3_user_batchGetId");
        assert_eq!(ToolNameCase::Kebab.apply(name), "contact-v3-user-batchGetId");
        assert_eq!(ToolNameCase::Dot.apply(name), name);
        assert_eq!(ToolNameCase::Camel.apply(name), "contactV3UserBatchGetId");
        assert_eq!(
            ToolNameCase::Camel.apply("trust_party.v1.collaborationTenant.list"),
            "trustPartyV1CollaborationTenantList"
        );
    }

    #[test]
    fn test_name_truncated() {
        let long = format!("im.{}", "a".repeat(80));
        assert_eq!(ToolNameCase::Dot.apply(&long).len(), MAX_TOOL_NAME_LEN);
    }

    #[test]
    fn test_selection_uses_case() {
        let selected = ToolSelection::new("im.v1.chat.list")
            .with_name_case(ToolNameCase::Kebab)
            .apply(&registry());
        assert!(selected.get("im-v1-chat-list").is_some());
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(
            "tenant_access_token".parse::<TokenMode>().unwrap(),
            TokenMode::TenantAccessToken
        );
        assert!("both".parse::<TokenMode>().is_err());
        assert_eq!("Camel".parse::<ToolNameCase>().unwrap(), ToolNameCase::Camel);
    }

    #[test]
    #[traced_test]
    fn test_unmatched_token_is_logged() {
        let selected = ToolSelection::new("im.v1.nope,im").apply(&registry());
        assert_eq!(selected.len(), 2);
        assert!(logs_contain("Allow-list entry 'im.v1.nope' matches no tool"));
    }

    #[test]
    fn test_presets_reference_builtin_tools() {
        let builtin = ToolRegistry::builtin().unwrap();
        for (preset_name, tools) in PRESETS {
            for tool in *tools {
                assert!(builtin.contains(tool), "{} lists unknown {}", preset_name, tool);
            }
        }
    }
}
