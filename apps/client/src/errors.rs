use serde_json::Value;
use thiserror::Error;

use crate::models::profile::Section;

/// Client-level error type.
/// Every backend call and every local validation step funnels into this enum.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),

    #[error("A save for the {0} section is already in progress")]
    SaveInFlight(Section),

    /// Non-2xx response. `detail` is the backend's unpacked `detail` field
    /// when it had a usable one; `message` falls back to the raw body.
    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ClientError {
    /// Builds an `Api` error from a failed response body.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(unpack_detail));
        ClientError::Api {
            status,
            message: detail.clone().unwrap_or_else(|| body.to_string()),
            detail,
        }
    }

    /// True for errors raised before any network call.
    pub fn is_local(&self) -> bool {
        matches!(self, ClientError::Validation(_) | ClientError::SaveInFlight(_))
    }

    /// Reduces the error to something safe to show a user.
    /// Local errors keep their own text; everything else collapses to `fallback`
    /// and the underlying error is logged.
    pub fn user_message(&self, fallback: &str) -> String {
        if self.is_local() {
            return self.to_string();
        }
        tracing::error!("{self}");
        fallback.to_string()
    }
}

/// Unpacks a backend `detail` field.
///
/// A string is returned as is. An array of field errors (`[{"msg": ...}, ...]`)
/// is joined with `", "`. Anything else yields `None`.
pub fn unpack_detail(detail: &Value) -> Option<String> {
    match detail {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join(", "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unpack_string_detail() {
        assert_eq!(
            unpack_detail(&json!("Email already registered")).as_deref(),
            Some("Email already registered")
        );
    }

    #[test]
    fn test_unpack_validation_array_joins_messages() {
        let detail = json!([
            {"loc": ["body", "email"], "msg": "value is not a valid email address"},
            {"loc": ["body", "password"], "msg": "field required"}
        ]);
        assert_eq!(
            unpack_detail(&detail).as_deref(),
            Some("value is not a valid email address, field required")
        );
    }

    #[test]
    fn test_unpack_unknown_shape() {
        assert!(unpack_detail(&json!({"code": 3})).is_none());
        assert!(unpack_detail(&json!([])).is_none());
    }

    #[test]
    fn test_non_json_body_has_no_detail() {
        let err = ClientError::from_response(502, "Bad Gateway");
        assert!(matches!(
            err,
            ClientError::Api { status: 502, ref message, detail: None } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn test_detail_unpacked_from_body() {
        let err = ClientError::from_response(400, r#"{"detail": "Email already registered"}"#);
        assert!(matches!(
            err,
            ClientError::Api { detail: Some(ref d), .. } if d == "Email already registered"
        ));
    }

    #[test]
    fn test_user_message_hides_backend_errors() {
        let err = ClientError::from_response(500, "Traceback ...");
        assert_eq!(err.user_message("Something went wrong"), "Something went wrong");

        let local = ClientError::Validation("Please enter a job description.".to_string());
        assert_eq!(local.user_message("ignored"), "Please enter a job description.");
    }
}
