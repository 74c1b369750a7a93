//! API transport — the seam between prepared requests and the Open API.
//!
//! `HttpTransport` sends with static, pre-provisioned tokens. It does not fetch,
//! refresh, retry or page; a failed call is reported once and left to the caller.

use crate::catalog::{AccessTokenKind, HttpMethod, PreparedRequest};
use crate::types::{ApiConfig, Error, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use serde_json::Value;

/// Raw upstream answer. The Open API wraps results as `{ code, msg, data }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Business code; absent counts as success.
    pub fn code(&self) -> i64 {
        self.body.get("code").and_then(Value::as_i64).unwrap_or(0)
    }

    pub fn msg(&self) -> &str {
        self.body.get("msg").and_then(Value::as_str).unwrap_or("")
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.code() == 0
    }

    /// `data` on success (the whole body when there is no `data`), else `Error::Upstream`.
    pub fn into_result(self) -> Result<Value> {
        if !self.is_success() {
            let msg = if self.msg().is_empty() {
                format!("HTTP {}", self.status)
            } else {
                self.msg().to_string()
            };
            return Err(Error::upstream(self.code(), msg));
        }
        match self.body {
            Value::Object(mut map) => Ok(map.remove("data").unwrap_or(Value::Object(map))),
            other => Ok(other),
        }
    }
}

/// Issues prepared requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: &PreparedRequest) -> Result<ApiResponse>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base: Url,
    tenant_access_token: Option<String>,
    user_access_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = Url::parse(&config.domain)
            .map_err(|e| Error::config(format!("invalid domain '{}': {}", config.domain, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!("domain '{}' cannot be a base URL", config.domain)));
        }
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base,
            tenant_access_token: config.tenant_access_token.clone(),
            user_access_token: config.user_access_token.clone(),
        })
    }

    fn token(&self, kind: AccessTokenKind) -> Result<&str> {
        let token = match kind {
            AccessTokenKind::Tenant => self.tenant_access_token.as_deref(),
            AccessTokenKind::User => self.user_access_token.as_deref(),
        };
        token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::auth(format!("no {} access token configured", kind)))
    }

    /// Absolute URL: placeholders are percent-encoded as single path segments.
    pub fn url_for(&self, request: &PreparedRequest) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::config("domain cannot be a base URL"))?;
            segments.pop_if_empty();
            for segment in request.path_segments() {
                segments.push(segment);
            }
        }
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<ApiResponse> {
        let token = self.token(request.token)?;
        let url = self.url_for(request)?;
        tracing::debug!(
            "{} {} ({}, {} token)",
            request.method,
            request.resolved_path(),
            request.tool,
            request.token
        );

        let mut builder = self
            .client
            .request(to_method(request.method), url)
            .bearer_auth(token);
        if let Some(body) = request.body.as_ref().filter(|_| request.method != HttpMethod::Get) {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            Error::transport(format!(
                "{} {} failed: {}",
                request.method,
                request.resolved_path(),
                e
            ))
        })?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        tracing::debug!("{} answered HTTP {}", request.tool, status);
        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn config(domain: &str) -> ApiConfig {
        ApiConfig {
            domain: domain.to_string(),
            timeout: Duration::from_secs(5),
            tenant_access_token: Some("t-tenant".to_string()),
            user_access_token: None,
        }
    }

    fn request() -> PreparedRequest {
        PreparedRequest {
            tool: "im.v1.chatMembers.get".to_string(),
            method: HttpMethod::Get,
            path_template: "/open-apis/im/v1/chats/:chat_id/members".to_string(),
            path_values: vec![("chat_id".to_string(), "oc/with space".to_string())],
            query: vec![
                ("page_size".to_string(), "20".to_string()),
                ("user_ids".to_string(), "a".to_string()),
                ("user_ids".to_string(), "b".to_string()),
            ],
            body: None,
            token: AccessTokenKind::Tenant,
        }
    }

    #[test]
    fn test_url_encodes_placeholders() {
        let transport = HttpTransport::new(&config("https://open.feishu.cn")).unwrap();
        let url = transport.url_for(&request()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://open.feishu.cn/open-apis/im/v1/chats/oc%2Fwith%20space/members?page_size=20&user_ids=a&user_ids=b"
        );
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let transport = HttpTransport::new(&config("http://127.0.0.1:8080/proxy/")).unwrap();
        let url = transport.url_for(&request()).unwrap();
        assert!(url.path().starts_with("/proxy/open-apis/im/v1/chats/"));
    }

    #[test]
    fn test_invalid_domain() {
        assert!(matches!(
            HttpTransport::new(&config("not a url")),
            Err(Error::Config(_))
        ));
        assert!(HttpTransport::new(&config("mailto:ops@example.com")).is_err());
    }

    #[test]
    fn test_missing_token_is_auth_error() {
        let transport = HttpTransport::new(&config("https://open.feishu.cn")).unwrap();
        assert_eq!(transport.token(AccessTokenKind::Tenant).unwrap(), "t-tenant");
        let err = transport.token(AccessTokenKind::User).unwrap_err();
        assert_eq!(err.to_string(), "auth error: no user access token configured");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(&config(&format!("http://{}", addr))).unwrap();
        let err = transport.send(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
        assert!(err
            .to_string()
            .starts_with("transport error: GET /open-apis/im/v1/chats/oc/with space/members failed"));
    }

    #[test]
    fn test_response_envelope() {
        let ok = ApiResponse {
            status: 200,
            body: json!({ "code": 0, "msg": "success", "data": { "items": [] } }),
        };
        assert!(ok.is_success());
        assert_eq!(ok.into_result().unwrap(), json!({ "items": [] }));

        let failed = ApiResponse {
            status: 400,
            body: json!({ "code": 99991663, "msg": "Invalid access token for authorization." }),
        };
        assert!(!failed.is_success());
        match failed.into_result() {
            Err(Error::Upstream { code, msg }) => {
                assert_eq!(code, 99991663);
                assert!(msg.starts_with("Invalid access token"));
            }
            other => panic!("unexpected: {:?}", other),
        }

        let bare = ApiResponse {
            status: 502,
            body: json!("Bad Gateway"),
        };
        assert_eq!(bare.into_result().unwrap_err().to_string(), "upstream error 0: HTTP 502");
    }

    #[test]
    fn test_response_without_data_returns_body() {
        let ok = ApiResponse {
            status: 200,
            body: json!({ "code": 0, "msg": "success" }),
        };
        assert_eq!(ok.into_result().unwrap(), json!({ "code": 0, "msg": "success" }));
    }
}
