use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Errors returned by connector construction and every REST operation.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// A required configuration field is empty.
    #[error("configuration field '{field}' must not be empty")]
    InvalidConfig { field: &'static str },

    /// Base URL is not a valid absolute URL with a host.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// A required path template parameter was not provided.
    #[error("missing required path parameter '{parameter}' for endpoint '{endpoint}'")]
    MissingPathParameter {
        endpoint: &'static str,
        parameter: &'static str,
    },

    /// The token exchange performed during construction failed.
    #[error("authentication failed: {0}")]
    Authentication(#[source] Box<ConnectorError>),

    /// The identity service answered 2xx without a `token.token_id` string.
    #[error("token response does not contain 'token.token_id'")]
    MissingToken,

    /// Non-success HTTP status from the service.
    #[error("server returned status {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: ErrorBody,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Neither or both of `channel_id` / `partner_id` were given.
    #[error("exactly one of channel_id or partner_id is required")]
    MissingScope,

    /// Neither or both of `list_id` / `since` were given.
    #[error("exactly one of list_id or since is required")]
    MissingFilter,

    /// Too many order ids in a single status lookup.
    #[error("list_id holds {len} order ids, at most {max} are allowed")]
    ListTooLong { len: usize, max: usize },

    /// `order_status` is not one of the known wire values.
    #[error(
        "invalid order status '{0}', expected one of NEW, IN_PROGRESS, COMPLETED, CANCELED, ERROR"
    )]
    InvalidOrderStatus(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport-layer request failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Body could not be parsed or rendered as JSON.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConnectorError {
    /// Numeric HTTP status for [`ConnectorError::Api`], looking through
    /// [`ConnectorError::Authentication`].
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(status.as_u16()),
            Self::Authentication(inner) => inner.status_code(),
            _ => None,
        }
    }

    /// Response body for [`ConnectorError::Api`], looking through
    /// [`ConnectorError::Authentication`].
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Api { body, .. } => Some(body),
            Self::Authentication(inner) => inner.body(),
            _ => None,
        }
    }
}

/// Payload of a failed response.
///
/// JSON bodies are kept parsed; anything else is kept as the raw bytes.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorBody {
    Json(Value),
    Raw(Vec<u8>),
}

impl ErrorBody {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).map_or_else(|_| Self::Raw(bytes.to_vec()), Self::Json)
    }

    /// Parsed JSON, when the body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value}"),
            Self::Raw(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ErrorBody;

    #[test]
    fn json_body_is_kept_parsed() {
        let body = ErrorBody::from_bytes(br#"{"error":"not found"}"#);
        assert_eq!(body.as_json(), Some(&json!({ "error": "not found" })));
    }

    #[test]
    fn non_json_body_is_kept_raw() {
        let body = ErrorBody::from_bytes(b"<html>Bad Gateway</html>");
        assert_eq!(body, ErrorBody::Raw(b"<html>Bad Gateway</html>".to_vec()));
        assert_eq!(body.to_string(), "<html>Bad Gateway</html>");
    }
}
