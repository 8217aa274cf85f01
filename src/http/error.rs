use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    /// Non-success status. `body` is the parsed JSON payload, or `{}` when the
    /// server sent something that is not JSON.
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        body: Value,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

impl HttpError {
    /// Status code for `Status` errors, `None` for transport and codec failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build the error for a non-success response from its raw body.
    #[must_use]
    pub fn from_response(status: u16, raw_body: &[u8]) -> Self {
        let body = serde_json::from_slice::<Value>(raw_body)
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map_or_else(|| format!("HTTP Error {status}"), str::to_string);
        Self::Status {
            status,
            message,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HttpError;
    use serde_json::json;

    #[test]
    fn from_response_uses_server_message() {
        let err = HttpError::from_response(404, br#"{"message":"Not Found","code":"missing"}"#);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "Not Found");
        match err {
            HttpError::Status { body, .. } => {
                assert_eq!(body, json!({"message": "Not Found", "code": "missing"}));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_response_keeps_message_as_sent() {
        let err = HttpError::from_response(404, br#"{"message":" Not Found "}"#);
        assert_eq!(err.to_string(), " Not Found ");

        let empty = HttpError::from_response(400, br#"{"message":""}"#);
        assert_eq!(empty.to_string(), "HTTP Error 400");
    }

    #[test]
    fn from_response_synthesizes_message_for_non_json() {
        let err = HttpError::from_response(502, b"<html>bad gateway</html>");
        assert_eq!(err.to_string(), "HTTP Error 502");
        match err {
            HttpError::Status { body, .. } => assert_eq!(body, json!({})),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_response_ignores_non_string_message() {
        let err = HttpError::from_response(500, br#"{"message":42}"#);
        assert_eq!(err.to_string(), "HTTP Error 500");
        match err {
            HttpError::Status { body, .. } => assert_eq!(body, json!({"message": 42})),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
