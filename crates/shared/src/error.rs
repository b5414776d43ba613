use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker substring the remote store puts in access-policy rejections.
pub const ROW_LEVEL_SECURITY_MARKER: &str = "row-level security";

/// Error shape reported by the remote record store.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct StoreError {
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
    pub code: String,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
            hint: None,
            code: code.into(),
        }
    }

    /// True when the failure was caused by an access-control policy rather
    /// than a data or transport problem.
    pub fn is_permission_denied(&self) -> bool {
        self.message.contains(ROW_LEVEL_SECURITY_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_row_level_security_rejections() {
        let err = StoreError::new(
            "42501",
            "new row violates row-level security policy for table \"tasks\"",
        );
        assert!(err.is_permission_denied());

        let err = StoreError::new("500", "connection reset by peer");
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn decodes_full_store_error_body() {
        let raw = r#"{"message":"permission denied","details":null,"hint":"check policies","code":"42501"}"#;
        let err: StoreError = serde_json::from_str(raw).expect("decode");
        assert_eq!(err.code, "42501");
        assert_eq!(err.details, None);
        assert_eq!(err.hint.as_deref(), Some("check policies"));
    }
}
