use reqwest::Method;
use serde::Deserialize;

/// Response envelope: every endpoint wraps its payload in a `data` field.
#[derive(Debug, Deserialize)]
pub(crate) struct DataEnvelope<T> {
    pub data: T,
}

/// A licensed device as reported by the server. Never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Device {
    pub id: i64,
    pub name: String,
}

/// Token pair returned by the refresh endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshedTokens {
    pub token: String,
    pub refresh_token: String,
}

/// One outbound request, owned by the caller. The pipeline derives its actual
/// HTTP request from this (adding auth headers) without mutating it, so the
/// same descriptor can be resent verbatim after a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            body: None,
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::DELETE,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            body: Some(body),
        }
    }
}
