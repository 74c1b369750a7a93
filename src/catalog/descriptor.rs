//! Typed endpoint metadata, parameter validation and MCP input schemas.
//!
//! A descriptor owns the *shape* of one Open API operation: path template, method,
//! accepted token kinds and the `path` / `params` / `data` parameter groups. It
//! never issues requests itself.

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Locale
// =============================================================================

/// Language used for human-readable descriptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "zh" => Ok(Locale::Zh),
            other => Err(Error::config(format!(
                "unknown language '{}', expected one of: en, zh",
                other
            ))),
        }
    }
}

/// Description text carried in both supported languages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub en: String,
    pub zh: String,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>, zh: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            zh: zh.into(),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Zh => &self.zh,
        }
    }
}

// =============================================================================
// Access tokens and methods
// =============================================================================

/// Credential class an operation may be called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTokenKind {
    Tenant,
    User,
}

impl fmt::Display for AccessTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessTokenKind::Tenant => write!(f, "tenant"),
            AccessTokenKind::User => write!(f, "user"),
        }
    }
}

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Int,
    Float,
    Bool,
    StringList,
    Enum(Vec<String>),
    Object(Vec<ParamDef>),
    Optional(Box<ParamType>),
}

impl ParamType {
    /// Convenience for `Optional(Box::new(inner))`.
    pub fn optional(inner: ParamType) -> Self {
        ParamType::Optional(Box::new(inner))
    }

    /// Convenience for an enum over string literals.
    pub fn one_of(variants: &[&str]) -> Self {
        ParamType::Enum(variants.iter().map(|v| v.to_string()).collect())
    }

    /// Validate a JSON value against this parameter type.
    pub fn validate(&self, value: &Value) -> std::result::Result<(), String> {
        match self {
            ParamType::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err(format!("expected string, got {}", value_type_name(value)))
                }
            }
            ParamType::Int => {
                if value.is_i64() || value.is_u64() {
                    Ok(())
                } else {
                    Err(format!("expected integer, got {}", value_type_name(value)))
                }
            }
            ParamType::Float => {
                if value.is_number() {
                    Ok(())
                } else {
                    Err(format!("expected number, got {}", value_type_name(value)))
                }
            }
            ParamType::Bool => {
                if value.is_boolean() {
                    Ok(())
                } else {
                    Err(format!("expected boolean, got {}", value_type_name(value)))
                }
            }
            ParamType::StringList => {
                if let Some(arr) = value.as_array() {
                    for (i, item) in arr.iter().enumerate() {
                        if !item.is_string() {
                            return Err(format!(
                                "expected string at index {}, got {}",
                                i,
                                value_type_name(item)
                            ));
                        }
                    }
                    Ok(())
                } else {
                    Err(format!("expected array, got {}", value_type_name(value)))
                }
            }
            ParamType::Enum(variants) => {
                if let Some(s) = value.as_str() {
                    if variants.iter().any(|v| v == s) {
                        Ok(())
                    } else {
                        Err(format!(
                            "invalid enum value '{}', expected one of: {}",
                            s,
                            variants.join(", ")
                        ))
                    }
                } else {
                    Err(format!("expected string for enum, got {}", value_type_name(value)))
                }
            }
            ParamType::Object(fields) => {
                let map = value
                    .as_object()
                    .ok_or_else(|| format!("expected object, got {}", value_type_name(value)))?;
                let errors = validate_fields(fields, map, "");
                if errors.is_empty() {
                    Ok(())
                } else {
                    Err(errors.join("; "))
                }
            }
            ParamType::Optional(inner) => {
                if value.is_null() {
                    Ok(())
                } else {
                    inner.validate(value)
                }
            }
        }
    }

    /// JSON Schema fragment for this type.
    pub fn json_schema(&self, locale: Locale) -> Value {
        match self {
            ParamType::String => json!({ "type": "string" }),
            ParamType::Int => json!({ "type": "integer" }),
            ParamType::Float => json!({ "type": "number" }),
            ParamType::Bool => json!({ "type": "boolean" }),
            ParamType::StringList => json!({ "type": "array", "items": { "type": "string" } }),
            ParamType::Enum(variants) => json!({ "type": "string", "enum": variants }),
            ParamType::Object(fields) => object_schema(fields, locale),
            ParamType::Optional(inner) => inner.json_schema(locale),
        }
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Check required, unknown and mistyped fields. Messages are prefixed with `prefix`.
pub(crate) fn validate_fields(
    fields: &[ParamDef],
    map: &Map<String, Value>,
    prefix: &str,
) -> Vec<String> {
    let mut errors = Vec::new();

    for def in fields {
        if def.is_required() && !map.contains_key(&def.name) {
            errors.push(format!("Missing required parameter: {}{}", prefix, def.name));
        }
    }

    for (key, value) in map {
        match fields.iter().find(|def| &def.name == key) {
            Some(def) => {
                if let Err(e) = def.param_type.validate(value) {
                    errors.push(format!("Parameter '{}{}': {}", prefix, key, e));
                }
            }
            None => errors.push(format!("Unknown parameter: {}{}", prefix, key)),
        }
    }

    errors
}

/// JSON Schema object for a field list.
pub(crate) fn object_schema(fields: &[ParamDef], locale: Locale) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    for def in fields {
        properties.insert(def.name.clone(), def.json_schema(locale));
        if def.is_required() {
            required.push(Value::String(def.name.clone()));
        }
    }

    let mut schema = json!({ "type": "object", "properties": properties });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub description: LocalizedText,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamDef {
    pub fn new(name: &str, param_type: ParamType, en: &str, zh: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            description: LocalizedText::new(en, zh),
            default: None,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none() && !matches!(self.param_type, ParamType::Optional(_))
    }

    fn json_schema(&self, locale: Locale) -> Value {
        let mut schema = self.param_type.json_schema(locale);
        schema["description"] = Value::String(self.description.get(locale).to_string());
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}

// =============================================================================
// Request schema
// =============================================================================

/// Parameter groups keyed by request part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestSchema {
    /// Path placeholders.
    #[serde(default)]
    pub path: Vec<ParamDef>,
    /// Query string parameters.
    #[serde(default)]
    pub params: Vec<ParamDef>,
    /// JSON body fields.
    #[serde(default)]
    pub data: Vec<ParamDef>,
}

impl RequestSchema {
    /// Groups paired with their argument key, in request order.
    pub fn groups(&self) -> [(&'static str, &[ParamDef]); 3] {
        [
            ("path", self.path.as_slice()),
            ("params", self.params.as_slice()),
            ("data", self.data.as_slice()),
        ]
    }
}

// =============================================================================
// Tool descriptor
// =============================================================================

/// Complete metadata for one Open API operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub project: String,
    pub name: String,
    pub sdk_name: String,
    pub path: String,
    pub http_method: HttpMethod,
    pub description: LocalizedText,
    pub access_tokens: Vec<AccessTokenKind>,
    pub schema: RequestSchema,
}

impl ToolDescriptor {
    /// New descriptor accepting both token kinds. The project is the first name segment.
    pub fn new(name: &str, http_method: HttpMethod, path: &str, en: &str, zh: &str) -> Self {
        let project = name.split('.').next().unwrap_or(name);
        Self {
            project: project.to_string(),
            name: name.to_string(),
            sdk_name: name.to_string(),
            path: path.to_string(),
            http_method,
            description: LocalizedText::new(en, zh),
            access_tokens: vec![AccessTokenKind::Tenant, AccessTokenKind::User],
            schema: RequestSchema::default(),
        }
    }

    pub fn with_tokens(mut self, tokens: &[AccessTokenKind]) -> Self {
        self.access_tokens = tokens.to_vec();
        self
    }

    pub fn with_path(mut self, path: Vec<ParamDef>) -> Self {
        self.schema.path = path;
        self
    }

    pub fn with_params(mut self, params: Vec<ParamDef>) -> Self {
        self.schema.params = params;
        self
    }

    pub fn with_data(mut self, data: Vec<ParamDef>) -> Self {
        self.schema.data = data;
        self
    }

    pub fn supports(&self, kind: AccessTokenKind) -> bool {
        self.access_tokens.contains(&kind)
    }

    /// `:name` placeholders of the path template, in order.
    pub fn path_params(&self) -> Vec<&str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix(':'))
            .collect()
    }

    /// Every placeholder must have a `path` entry and every `path` entry a placeholder.
    pub fn check_path_contract(&self) -> Result<()> {
        let placeholders = self.path_params();

        for placeholder in &placeholders {
            if !self.schema.path.iter().any(|def| def.name == *placeholder) {
                return Err(Error::validation(format!(
                    "{}: path placeholder ':{}' has no path schema entry",
                    self.name, placeholder
                )));
            }
        }
        for def in &self.schema.path {
            if !placeholders.contains(&def.name.as_str()) {
                return Err(Error::validation(format!(
                    "{}: path schema entry '{}' does not appear in {}",
                    self.name, def.name, self.path
                )));
            }
        }
        Ok(())
    }

    /// MCP `inputSchema` for this tool.
    pub fn input_schema(&self, locale: Locale) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (key, fields) in self.schema.groups() {
            if fields.is_empty() {
                continue;
            }
            properties.insert(key.to_string(), object_schema(fields, locale));
            if fields.iter().any(ParamDef::is_required) {
                required.push(Value::String(key.to_string()));
            }
        }

        if self.supports(AccessTokenKind::Tenant) && self.supports(AccessTokenKind::User) {
            let description = match locale {
                Locale::En => "Call with the user access token instead of the tenant access token",
                Locale::Zh => "使用用户身份（user_access_token）调用，而非应用身份（tenant_access_token）",
            };
            properties.insert(
                "useUAT".to_string(),
                json!({ "type": "boolean", "description": description }),
            );
        }

        let mut schema = json!({ "type": "object", "properties": properties });
        if !required.is_empty() {
            schema["required"] = Value::Array(required);
        }
        schema
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reply_tool() -> ToolDescriptor {
        ToolDescriptor::new(
            "im.v1.message.reply",
            HttpMethod::Post,
            "/open-apis/im/v1/messages/:message_id/reply",
            "Reply to a message",
            "回复消息",
        )
        .with_path(vec![ParamDef::new(
            "message_id",
            ParamType::String,
            "Message ID",
            "消息 ID",
        )])
        .with_data(vec![
            ParamDef::new("content", ParamType::String, "Message content", "消息内容"),
            ParamDef::new(
                "msg_type",
                ParamType::one_of(&["text", "post"]),
                "Message type",
                "消息类型",
            ),
            ParamDef::new(
                "reply_in_thread",
                ParamType::optional(ParamType::Bool),
                "Reply in thread",
                "以话题形式回复",
            ),
        ])
    }

    #[test]
    fn test_project_from_name() {
        assert_eq!(reply_tool().project, "im");
        assert_eq!(reply_tool().sdk_name, "im.v1.message.reply");
    }

    #[test]
    fn test_path_params() {
        let tool = ToolDescriptor::new(
            "cardkit.v1.cardElement.content",
            HttpMethod::Put,
            "/open-apis/cardkit/v1/cards/:card_id/elements/:element_id/content",
            "",
            "",
        );
        assert_eq!(tool.path_params(), vec!["card_id", "element_id"]);
    }

    #[test]
    fn test_path_contract_holds() {
        assert!(reply_tool().check_path_contract().is_ok());
    }

    #[test]
    fn test_path_contract_missing_entry() {
        let tool = reply_tool().with_path(Vec::new());
        let err = tool.check_path_contract().unwrap_err();
        assert!(err.to_string().contains(":message_id"));
    }

    #[test]
    fn test_path_contract_extra_entry() {
        let mut tool = reply_tool();
        tool.schema
            .path
            .push(ParamDef::new("chat_id", ParamType::String, "", ""));
        let err = tool.check_path_contract().unwrap_err();
        assert!(err.to_string().contains("'chat_id'"));
    }

    #[test]
    fn test_input_schema_groups_and_required() {
        let schema = reply_tool().input_schema(Locale::En);
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["path", "data"]));
        assert!(schema["properties"].get("params").is_none());
        assert_eq!(
            schema["properties"]["data"]["required"],
            json!(["content", "msg_type"])
        );
        assert_eq!(
            schema["properties"]["data"]["properties"]["msg_type"]["enum"],
            json!(["text", "post"])
        );
        assert_eq!(schema["properties"]["useUAT"]["type"], "boolean");
    }

    #[test]
    fn test_input_schema_localized() {
        let schema = reply_tool().input_schema(Locale::Zh);
        assert_eq!(
            schema["properties"]["path"]["properties"]["message_id"]["description"],
            "消息 ID"
        );
    }

    #[test]
    fn test_input_schema_tenant_only_has_no_use_uat() {
        let tool = reply_tool().with_tokens(&[AccessTokenKind::Tenant]);
        assert!(tool.input_schema(Locale::En)["properties"]
            .get("useUAT")
            .is_none());
    }

    #[test]
    fn test_param_type_enum_validation() {
        let pt = ParamType::one_of(&["asc", "desc"]);
        assert!(pt.validate(&json!("asc")).is_ok());
        assert!(pt.validate(&json!("bad")).is_err());
        assert!(pt.validate(&json!(42)).is_err());
    }

    #[test]
    fn test_param_type_string_list_validation() {
        let pt = ParamType::StringList;
        assert!(pt.validate(&json!(["a", "b"])).is_ok());
        assert!(pt.validate(&json!([1, 2])).is_err());
        assert!(pt.validate(&json!("not array")).is_err());
    }

    #[test]
    fn test_param_type_object_validation() {
        let pt = ParamType::Object(vec![
            ParamDef::new("field_name", ParamType::String, "", ""),
            ParamDef::new("value", ParamType::optional(ParamType::StringList), "", ""),
        ]);
        assert!(pt.validate(&json!({"field_name": "status"})).is_ok());

        let err = pt.validate(&json!({"value": ["a"], "bogus": 1})).unwrap_err();
        assert!(err.contains("Missing required parameter: field_name"));
        assert!(err.contains("Unknown parameter: bogus"));
    }

    #[test]
    fn test_default_makes_param_optional() {
        let def = ParamDef::new("page_size", ParamType::Int, "", "").with_default(json!(20));
        assert!(!def.is_required());
        let schema = object_schema(&[def], Locale::En);
        assert_eq!(schema["properties"]["page_size"]["default"], 20);
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("ZH".parse::<Locale>().unwrap(), Locale::Zh);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_descriptor_serde_shape() {
        let value = serde_json::to_value(reply_tool()).unwrap();
        assert_eq!(value["http_method"], "POST");
        assert_eq!(value["access_tokens"], json!(["tenant", "user"]));
    }
}
