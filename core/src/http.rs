//! Plain-data request and response types plus the pure halves of the transport.
//!
//! # Design
//! Everything here is deterministic: building a target URL from a base,
//! path and query, and turning a non-success response into an `ApiError`.
//! The transport owns the network and the retry loop; it calls into this
//! module for the parts that can be tested without a socket.

use serde_json::Value;
use url::Url;

use crate::error::ApiError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Ordered scalar query parameters. Absent values are kept so callers can
/// build the list unconditionally; they are dropped when the URL is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, Option<String>)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), Some(value.to_string())));
        self
    }

    pub fn param_opt<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.0.push((key.to_string(), value.map(|v| v.to_string())));
        self
    }

    /// Pairs that will actually be sent.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }
}

/// One logical call, reissued unchanged on every retry attempt.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub query: Option<QueryParams>,
    pub body: Option<Value>,
    pub authenticated: bool,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: None,
            body: None,
            authenticated: true,
        }
    }

    pub fn query(mut self, query: Option<QueryParams>) -> Self {
        self.query = query;
        self
    }

    pub fn body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

/// A completed HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse a successful body. Empty, malformed and `null` bodies become an
    /// empty object.
    pub fn json_or_empty(&self) -> Value {
        match serde_json::from_str::<Value>(&self.body) {
            Ok(Value::Null) | Err(_) => Value::Object(serde_json::Map::new()),
            Ok(value) => value,
        }
    }
}

/// Concatenate base and path and append every present query parameter.
pub fn build_url(base_url: &str, path: &str, query: Option<&QueryParams>) -> Result<Url, ApiError> {
    let mut url = Url::parse(&format!("{base_url}{path}"))
        .map_err(|e| ApiError::unexpected(format!("invalid request URL {base_url}{path}: {e}")))?;
    if let Some(query) = query {
        let mut pairs = query.present().peekable();
        if pairs.peek().is_some() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
    }
    Ok(url)
}

/// Message and details extracted from an error body.
#[derive(Debug, Default, PartialEq)]
struct ErrorBody {
    message: Option<String>,
    details: Option<serde_json::Map<String, Value>>,
}

/// Three shapes are recognized, in order: `{"error": {"message", "details"}}`,
/// `{"detail": ...}` and `{"message": ...}`. An unparseable body yields the
/// status line text instead.
fn parse_error_body(response: &HttpResponse) -> ErrorBody {
    let Ok(body) = serde_json::from_str::<Value>(&response.body) else {
        return ErrorBody {
            message: status_text(response.status).map(str::to_string),
            details: None,
        };
    };

    if let Some(message) = body
        .get("error")
        .and_then(|e| e.get("message"))
        .filter(|m| is_truthy(m))
    {
        return ErrorBody {
            message: Some(value_to_message(message)),
            details: body
                .get("error")
                .and_then(|e| e.get("details"))
                .and_then(Value::as_object)
                .cloned(),
        };
    }
    if let Some(detail) = body.get("detail").filter(|d| is_truthy(d)) {
        return ErrorBody {
            message: Some(value_to_message(detail)),
            details: None,
        };
    }
    if let Some(message) = body.get("message").filter(|m| is_truthy(m)) {
        return ErrorBody {
            message: Some(value_to_message(message)),
            details: None,
        };
    }
    ErrorBody::default()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn detail_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Map a non-success response to its `ApiError`. `path` is the request path,
/// reported as the identifier of a 404.
pub fn classify(response: &HttpResponse, path: &str) -> ApiError {
    let ErrorBody { message, details } = parse_error_body(response);

    match response.status {
        400 => ApiError::validation(message),
        401 => ApiError::authentication(message),
        403 => match details.filter(|d| d.contains_key("service_id")) {
            Some(details) => ApiError::ConfigurationRequired {
                message: message.unwrap_or_else(|| "Configuration required".to_string()),
                service_id: detail_to_string(details.get("service_id")),
                service_name: detail_to_string(details.get("service_name")),
            },
            None => ApiError::authorization(message),
        },
        404 => ApiError::not_found("Resource", path, message),
        429 => {
            let retry_after = response
                .header("retry-after")
                .and_then(|v| v.trim().parse::<u64>().ok());
            ApiError::rate_limit(message, retry_after)
        }
        status => ApiError::Api {
            message: message.unwrap_or_else(|| format!("Request failed with status {status}")),
            status: Some(status),
        },
    }
}

fn status_text(status: u16) -> Option<&'static str> {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
}
