//! Request preparation — turn tool-call arguments into a concrete API request.
//!
//! Arguments arrive as `{ "path": {..}, "params": {..}, "data": {..}, "useUAT": bool }`.
//! Every group is checked against its descriptor group before anything is sent.

use super::descriptor::{validate_fields, AccessTokenKind, HttpMethod, ParamDef, ToolDescriptor};
use super::selection::TokenMode;
use crate::types::{Error, Result};
use serde_json::{Map, Value};

const USE_UAT: &str = "useUAT";

/// A validated request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    /// Fully qualified tool name.
    pub tool: String,
    pub method: HttpMethod,
    /// Path template with `:param` placeholders.
    pub path_template: String,
    /// Placeholder values, in template order.
    pub path_values: Vec<(String, String)>,
    /// Query pairs; list values repeat their key.
    pub query: Vec<(String, String)>,
    /// JSON body, present when the descriptor declares `data` fields.
    pub body: Option<Value>,
    pub token: AccessTokenKind,
}

impl PreparedRequest {
    /// Template segments with placeholders substituted, unencoded.
    pub fn path_segments(&self) -> Vec<&str> {
        self.path_template
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => self
                    .path_values
                    .iter()
                    .find(|(key, _)| key == name)
                    .map_or(segment, |(_, value)| value.as_str()),
                None => segment,
            })
            .collect()
    }

    /// Resolved path for logging, e.g. `/open-apis/im/v1/chats/oc_1/members`.
    pub fn resolved_path(&self) -> String {
        format!("/{}", self.path_segments().join("/"))
    }
}

/// Validate `args` against `descriptor` and build the request.
pub fn prepare(
    descriptor: &ToolDescriptor,
    args: &Value,
    token_mode: TokenMode,
) -> Result<PreparedRequest> {
    let empty = Map::new();
    let args = match args {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => return Err(Error::validation("tool arguments must be an object")),
    };

    let mut errors = Vec::new();
    for key in args.keys() {
        if !matches!(key.as_str(), "path" | "params" | "data" | USE_UAT) {
            errors.push(format!("Unknown argument: {}", key));
        }
    }

    let use_uat = match args.get(USE_UAT) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            errors.push(format!("Argument '{}' must be a boolean", USE_UAT));
            false
        }
    };

    let path = check_group("path", &descriptor.schema.path, args.get("path"), &mut errors);
    let params = check_group("params", &descriptor.schema.params, args.get("params"), &mut errors);
    let data = check_group("data", &descriptor.schema.data, args.get("data"), &mut errors);

    let mut path_values = Vec::new();
    for name in descriptor.path_params() {
        match path.get(name).map(scalar_to_string) {
            Some(Some(value)) if !value.is_empty() => path_values.push((name.to_string(), value)),
            Some(_) => errors.push(format!("Path parameter '{}' cannot be empty", name)),
            // A missing placeholder was already reported by the group check.
            None => {}
        }
    }

    if !errors.is_empty() {
        return Err(Error::validation(errors.join("; ")));
    }

    let token = choose_token(descriptor, token_mode, use_uat)?;

    let mut query = Vec::new();
    for (key, value) in &params {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(s) = scalar_to_string(item) {
                        query.push((key.clone(), s));
                    }
                }
            }
            other => {
                let rendered = scalar_to_string(other).unwrap_or_else(|| other.to_string());
                query.push((key.clone(), rendered));
            }
        }
    }

    let body = if descriptor.schema.data.is_empty() {
        None
    } else {
        Some(Value::Object(data))
    };

    Ok(PreparedRequest {
        tool: descriptor.name.clone(),
        method: descriptor.http_method,
        path_template: descriptor.path.clone(),
        path_values,
        query,
        body,
        token,
    })
}

/// Validate one group and return it with defaults filled in.
fn check_group(
    group: &str,
    fields: &[ParamDef],
    value: Option<&Value>,
    errors: &mut Vec<String>,
) -> Map<String, Value> {
    let mut map = match value {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            errors.push(format!("Argument '{}' must be an object", group));
            return Map::new();
        }
    };

    errors.extend(validate_fields(fields, &map, &format!("{}.", group)));

    for def in fields {
        if let Some(default) = &def.default {
            map.entry(def.name.clone()).or_insert_with(|| default.clone());
        }
    }
    map
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn choose_token(
    descriptor: &ToolDescriptor,
    token_mode: TokenMode,
    use_uat: bool,
) -> Result<AccessTokenKind> {
    if let Some(kind) = token_mode.required_kind() {
        if descriptor.supports(kind) {
            return Ok(kind);
        }
        return Err(Error::validation(format!(
            "{} does not accept a {} access token",
            descriptor.name, kind
        )));
    }

    if use_uat && descriptor.supports(AccessTokenKind::User) {
        Ok(AccessTokenKind::User)
    } else if descriptor.supports(AccessTokenKind::Tenant) {
        Ok(AccessTokenKind::Tenant)
    } else {
        Ok(AccessTokenKind::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::descriptor::ParamType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn members_get() -> ToolDescriptor {
        ToolDescriptor::new(
            "im.v1.chatMembers.get",
            HttpMethod::Get,
            "/open-apis/im/v1/chats/:chat_id/members",
            "List chat members",
            "获取群成员列表",
        )
        .with_path(vec![ParamDef::new("chat_id", ParamType::String, "", "")])
        .with_params(vec![
            ParamDef::new(
                "member_id_type",
                ParamType::optional(ParamType::one_of(&["open_id", "user_id"])),
                "",
                "",
            ),
            ParamDef::new("page_size", ParamType::Int, "", "").with_default(json!(20)),
        ])
    }

    fn batch_get_id() -> ToolDescriptor {
        ToolDescriptor::new(
            "contact.v3.user.batchGetId",
            HttpMethod::Post,
            "/open-apis/contact/v3/users/batch_get_id",
            "",
            "",
        )
        .with_tokens(&[AccessTokenKind::Tenant])
        .with_params(vec![ParamDef::new(
            "user_id_type",
            ParamType::optional(ParamType::String),
            "",
            "",
        )])
        .with_data(vec![ParamDef::new(
            "emails",
            ParamType::optional(ParamType::StringList),
            "",
            "",
        )])
    }

    #[test]
    fn test_fills_path_and_defaults() {
        let args = json!({
            "path": { "chat_id": "oc_a0553eda9014c201e6969b478895c230" },
            "params": { "member_id_type": "open_id" }
        });
        let req = prepare(&members_get(), &args, TokenMode::Auto).unwrap();

        assert_eq!(
            req.resolved_path(),
            "/open-apis/im/v1/chats/oc_a0553eda9014c201e6969b478895c230/members"
        );
        assert_eq!(
            req.query,
            vec![
                ("member_id_type".to_string(), "open_id".to_string()),
                ("page_size".to_string(), "20".to_string()),
            ]
        );
        assert_eq!(req.body, None);
        assert_eq!(req.token, AccessTokenKind::Tenant);
    }

    #[test]
    fn test_missing_path_param_rejected() {
        let err = prepare(&members_get(), &json!({}), TokenMode::Auto).unwrap_err();
        assert!(err.to_string().contains("Missing required parameter: path.chat_id"));
    }

    #[test]
    fn test_empty_path_param_rejected() {
        let args = json!({ "path": { "chat_id": "" } });
        let err = prepare(&members_get(), &args, TokenMode::Auto).unwrap_err();
        assert!(err.to_string().contains("Path parameter 'chat_id' cannot be empty"));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let args = json!({
            "path": { "chat_id": "oc_1", "extra": 1 },
            "headers": {}
        });
        let err = prepare(&members_get(), &args, TokenMode::Auto).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unknown argument: headers"));
        assert!(msg.contains("Unknown parameter: path.extra"));
    }

    #[test]
    fn test_wrong_types_rejected() {
        let args = json!({ "path": "oc_1", "params": { "page_size": "ten" } });
        let msg = prepare(&members_get(), &args, TokenMode::Auto)
            .unwrap_err()
            .to_string();
        assert!(msg.contains("Argument 'path' must be an object"));
        assert!(msg.contains("Parameter 'params.page_size': expected integer"));
    }

    #[test]
    fn test_body_and_list_query() {
        let tool = batch_get_id().with_params(vec![ParamDef::new(
            "ids",
            ParamType::StringList,
            "",
            "",
        )]);
        let args = json!({
            "params": { "ids": ["a", "b"] },
            "data": { "emails": ["zhangsan@example.com"] }
        });
        let req = prepare(&tool, &args, TokenMode::Auto).unwrap();
        assert_eq!(
            req.query,
            vec![
                ("ids".to_string(), "a".to_string()),
                ("ids".to_string(), "b".to_string()),
            ]
        );
        assert_eq!(req.body, Some(json!({ "emails": ["zhangsan@example.com"] })));
        assert_eq!(req.method, HttpMethod::Post);
    }

    #[test]
    fn test_empty_data_still_sends_body() {
        let req = prepare(&batch_get_id(), &Value::Null, TokenMode::Auto).unwrap();
        assert_eq!(req.body, Some(json!({})));
    }

    #[test]
    fn test_token_selection() {
        let args = json!({ "path": { "chat_id": "oc_1" }, "useUAT": true });
        let req = prepare(&members_get(), &args, TokenMode::Auto).unwrap();
        assert_eq!(req.token, AccessTokenKind::User);

        let req = prepare(&batch_get_id(), &json!({ "useUAT": true }), TokenMode::Auto).unwrap();
        assert_eq!(req.token, AccessTokenKind::Tenant);

        let args = json!({ "path": { "chat_id": "oc_1" } });
        let req = prepare(&members_get(), &args, TokenMode::UserAccessToken).unwrap();
        assert_eq!(req.token, AccessTokenKind::User);

        let err = prepare(&batch_get_id(), &json!({}), TokenMode::UserAccessToken).unwrap_err();
        assert!(err.to_string().contains("does not accept a user access token"));
    }

    #[test]
    fn test_use_uat_must_be_bool() {
        let args = json!({ "path": { "chat_id": "oc_1" }, "useUAT": "yes" });
        assert!(prepare(&members_get(), &args, TokenMode::Auto).is_err());
    }

    #[test]
    fn test_non_object_arguments() {
        let err = prepare(&members_get(), &json!([1]), TokenMode::Auto).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
