//! Error types for the Danube API client.
//!
//! # Design
//! Two layers. `ApiError` is the closed taxonomy produced by the transport:
//! every non-success response, network fault, timeout, and cancellation ends
//! up as exactly one variant, and the transport is the only place that maps
//! status codes to variants. `Error` is what the resource façades return. It
//! wraps `ApiError` unchanged and adds the handful of conditions the façades
//! detect themselves (name resolution failures, missing arguments, bad batch
//! sizes) before any request leaves the process.

use thiserror::Error;

/// Statuses that trigger an automatic backoff-and-reissue.
const RETRYABLE_STATUSES: [u16; 4] = [429, 502, 503, 504];

/// Failure outcome of a single logical call through the transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// HTTP 401: the credential is missing or invalid.
    #[error("{message}")]
    Authentication { message: String },

    /// HTTP 403 without service configuration details.
    #[error("{message}")]
    Authorization { message: String },

    /// HTTP 403 whose error details name a service that still needs
    /// credentials configured before its tools can be used.
    #[error("{message} (service: {service_name} [{service_id}])")]
    ConfigurationRequired {
        message: String,
        service_id: String,
        service_name: String,
    },

    /// HTTP 400.
    #[error("{message}")]
    Validation { message: String },

    /// HTTP 404. `identifier` is the request path that was not found.
    #[error("{message}")]
    NotFound {
        resource: String,
        identifier: String,
        message: String,
    },

    /// HTTP 429 after the retry budget ran out.
    #[error("{message}")]
    RateLimit {
        message: String,
        /// Seconds from the `Retry-After` header, when the server sent one.
        retry_after: Option<u64>,
    },

    /// Any other non-2xx status, or an unexpected fault with no status.
    #[error("{message}")]
    Api { message: String, status: Option<u16> },

    /// The request never reached the server.
    #[error("{message}")]
    Connection { message: String },

    /// The per-attempt timer fired first, or the call was cancelled.
    #[error("{message}")]
    Timeout { message: String },

    /// Reserved for tool execution failures reported by the caller layer.
    #[error("{message}")]
    Execution {
        message: String,
        tool_id: Option<String>,
    },
}

impl ApiError {
    pub fn authentication(message: Option<String>) -> Self {
        ApiError::Authentication {
            message: message.unwrap_or_else(|| "Invalid or missing API key".to_string()),
        }
    }

    pub fn authorization(message: Option<String>) -> Self {
        ApiError::Authorization {
            message: message.unwrap_or_else(|| "Permission denied".to_string()),
        }
    }

    pub fn validation(message: Option<String>) -> Self {
        ApiError::Validation {
            message: message.unwrap_or_else(|| "Invalid request parameters".to_string()),
        }
    }

    pub fn not_found(resource: &str, identifier: &str, message: Option<String>) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            identifier: identifier.to_string(),
            message: message.unwrap_or_else(|| format!("{resource} not found: {identifier}")),
        }
    }

    pub fn rate_limit(message: Option<String>, retry_after: Option<u64>) -> Self {
        ApiError::RateLimit {
            message: message.unwrap_or_else(|| "Rate limit exceeded".to_string()),
            retry_after,
        }
    }

    pub fn connection(message: Option<String>) -> Self {
        ApiError::Connection {
            message: message.unwrap_or_else(|| "Failed to connect to Danube API".to_string()),
        }
    }

    pub fn timeout(message: Option<String>) -> Self {
        ApiError::Timeout {
            message: message.unwrap_or_else(|| "Request timed out".to_string()),
        }
    }

    /// The outcome observed by a caller whose call was aborted by shutdown.
    pub fn cancelled() -> Self {
        ApiError::timeout(Some("Request was cancelled".to_string()))
    }

    /// Generic fault with no HTTP status attached.
    pub fn unexpected(message: impl Into<String>) -> Self {
        ApiError::Api {
            message: message.into(),
            status: None,
        }
    }

    /// Nominal HTTP status for this error kind.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { .. } => Some(401),
            ApiError::Authorization { .. } | ApiError::ConfigurationRequired { .. } => Some(403),
            ApiError::Validation { .. } => Some(400),
            ApiError::NotFound { .. } => Some(404),
            ApiError::RateLimit { .. } => Some(429),
            ApiError::Api { status, .. } => *status,
            ApiError::Connection { .. } => Some(503),
            ApiError::Timeout { .. } => Some(504),
            ApiError::Execution { .. } => Some(500),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Authentication { message }
            | ApiError::Authorization { message }
            | ApiError::ConfigurationRequired { message, .. }
            | ApiError::Validation { message }
            | ApiError::NotFound { message, .. }
            | ApiError::RateLimit { message, .. }
            | ApiError::Api { message, .. }
            | ApiError::Connection { message }
            | ApiError::Timeout { message }
            | ApiError::Execution { message, .. } => message,
        }
    }

    /// Whether a response with this status is reissued after a backoff.
    pub fn is_retryable_status(status: u16) -> bool {
        RETRYABLE_STATUSES.contains(&status)
    }
}

/// Errors returned by the client and its resource façades.
#[derive(Debug, Error)]
pub enum Error {
    /// The transport call failed; see [`ApiError`] for the kind.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Name resolution found no tool.
    #[error("Tool not found: {name}")]
    ToolNotFound { name: String },

    /// Name resolution found no skill.
    #[error("Skill not found: {name}")]
    SkillNotFound { name: String },

    /// Neither an identifier nor a name was supplied.
    #[error("Either {expected} must be provided")]
    MissingArgument { expected: &'static str },

    /// Batch tool execution accepts between 1 and 10 calls.
    #[error("Batch calls must contain between 1 and 10 items, got {len}")]
    InvalidBatchSize { len: usize },

    /// A request payload could not be turned into JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// The transport error behind this failure, if any.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_statuses_are_exactly_rate_limit_and_gateway() {
        for status in [429, 502, 503, 504] {
            assert!(ApiError::is_retryable_status(status), "{status}");
        }
        for status in [400, 401, 403, 404, 500, 501, 505] {
            assert!(!ApiError::is_retryable_status(status), "{status}");
        }
    }

    #[test]
    fn defaults_fill_missing_messages() {
        assert_eq!(ApiError::authentication(None).message(), "Invalid or missing API key");
        assert_eq!(ApiError::rate_limit(None, None).message(), "Rate limit exceeded");
        assert_eq!(
            ApiError::not_found("Resource", "/v1/tools/x", None).message(),
            "Resource not found: /v1/tools/x"
        );
    }

    #[test]
    fn status_codes_follow_kind() {
        assert_eq!(ApiError::connection(None).status_code(), Some(503));
        assert_eq!(ApiError::timeout(None).status_code(), Some(504));
        assert_eq!(ApiError::unexpected("boom").status_code(), None);
        let err = ApiError::Api {
            message: "teapot".to_string(),
            status: Some(418),
        };
        assert_eq!(err.status_code(), Some(418));
    }

    #[test]
    fn cancelled_is_timeout_class() {
        assert!(matches!(ApiError::cancelled(), ApiError::Timeout { .. }));
    }

    #[test]
    fn crate_error_is_transparent_over_api_error() {
        let err: Error = ApiError::validation(Some("bad limit".to_string())).into();
        assert_eq!(err.to_string(), "bad limit");
        assert!(matches!(err.as_api(), Some(ApiError::Validation { .. })));
        assert!(Error::InvalidBatchSize { len: 11 }.as_api().is_none());
    }
}
