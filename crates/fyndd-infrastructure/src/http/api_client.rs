//! Shared HTTP plumbing for the backend REST API.
//!
//! Every typed client goes through [`ApiClient::send`], which attaches the
//! bearer token, maps non-success statuses onto [`FynddError`] and decodes the
//! body as loose JSON for the normalisers.

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use std::sync::Arc;

use fyndd_core::auth::SessionStore;
use fyndd_core::{FynddError, Result};

/// Whether a call is made on behalf of the logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No token is sent.
    Public,
    /// A bearer token is required; missing tokens fail before any network call.
    User,
}

/// Thin reqwest wrapper bound to one backend origin.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts a request against `path` relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Builds a URL from path segments, percent-encoding each one so ids and
    /// user input cannot add segments, a query or a fragment.
    pub fn segment_url(&self, segments: &[&str]) -> Result<Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(FynddError::validation(
                "path",
                format!("'{}' is not a valid path segment.", bad),
            ));
        }
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            FynddError::config(format!("Invalid API base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| FynddError::config(format!("API base URL '{}' cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Starts a request against an encoded segment path.
    pub fn request_segments(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.segment_url(segments)?))
    }

    /// Sends the request and returns the decoded body.
    ///
    /// An empty or non-JSON success body decodes to `Value::Null`. A 401 on a
    /// user call clears the stored session before returning
    /// `NotAuthenticated`.
    pub async fn send(&self, builder: RequestBuilder, access: Access) -> Result<Value> {
        let builder = match access {
            Access::Public => builder,
            Access::User => {
                let token = self
                    .session
                    .token()
                    .await
                    .ok_or(FynddError::NotAuthenticated)?;
                builder.bearer_auth(token)
            }
        };

        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!("[Api] {} {}", method, path);

        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return Ok(decode_body(&body));
        }

        tracing::debug!("[Api] {} {} -> {}", method, path, status);
        if status == StatusCode::UNAUTHORIZED && access == Access::User {
            if let Err(e) = self.session.clear_session().await {
                tracing::warn!("[Api] Failed to clear rejected session: {}", e);
            }
        }
        Err(map_status(status, &body, &path, access))
    }
}

fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|e| {
        tracing::debug!("[Api] Response body is not JSON: {}", e);
        Value::Null
    })
}

/// Extracts a human-readable message from an error body (`message` or
/// `error`, possibly nested as `error.message`).
pub fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error").and_then(Value::as_str))
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })?
        .trim();
    (!message.is_empty()).then(|| message.to_string())
}

/// Maps a non-success status onto the error taxonomy.
pub fn map_status(status: StatusCode, body: &str, path: &str, access: Access) -> FynddError {
    let message = server_message(body);
    match status {
        StatusCode::UNAUTHORIZED if access == Access::User => FynddError::NotAuthenticated,
        StatusCode::NOT_FOUND => FynddError::not_found("resource", path),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => FynddError::validation(
            "request",
            message.unwrap_or_else(|| "The request was not accepted.".to_string()),
        ),
        StatusCode::CONFLICT => FynddError::conflict(
            message.unwrap_or_else(|| "That change has already been made.".to_string()),
        ),
        _ => FynddError::Server {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| {
                status.canonical_reason().unwrap_or_default().to_string()
            }),
        },
    }
}

/// Re-tags a generic 404 with the entity the caller was operating on.
pub fn not_found_as(err: FynddError, entity_type: &'static str, id: &str) -> FynddError {
    if err.is_not_found() {
        FynddError::not_found(entity_type, id)
    } else {
        err
    }
}
