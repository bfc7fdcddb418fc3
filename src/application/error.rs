//! Plugin errors and their normalized wire form

use serde::Serialize;
use thiserror::Error;

use super::ports::BackendError;
use crate::domain::error::RequestError;
use crate::domain::method::{Method, UnknownMethod};

/// Error code for operations the active backend cannot perform
pub const UNSUPPORTED_OS_VERSION: &str = "unsupported_os_version";
pub const MALFORMED_REQUEST: &str = "malformed_request";
pub const INVALID_TIMESTAMP: &str = "invalid_timestamp";
pub const METHOD_NOT_IMPLEMENTED: &str = "method_not_implemented";

/// Errors from plugin operations
#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    UnknownMethod(#[from] UnknownMethod),

    #[error("{source}")]
    Backend {
        method: Method,
        #[source]
        source: BackendError,
    },

    #[error("Event relay stopped while handling {0}")]
    RelayClosed(Method),
}

impl PluginError {
    /// Tag a backend failure with the operation that hit it
    pub fn backend(method: Method, source: BackendError) -> Self {
        Self::Backend { method, source }
    }

    /// Stable error code for the host
    pub fn code(&self) -> String {
        match self {
            Self::Request(RequestError::Malformed(_)) => MALFORMED_REQUEST.to_string(),
            Self::Request(RequestError::InvalidTimestamp { .. }) => INVALID_TIMESTAMP.to_string(),
            Self::UnknownMethod(_) => METHOD_NOT_IMPLEMENTED.to_string(),
            Self::Backend {
                source: BackendError::Unsupported { .. },
                ..
            } => UNSUPPORTED_OS_VERSION.to_string(),
            Self::Backend { method, .. } | Self::RelayClosed(method) => {
                format!("{}_error", method)
            }
        }
    }
}

/// Uniform error shape returned to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&PluginError> for ErrorEnvelope {
    fn from(err: &PluginError) -> Self {
        let details = match err {
            PluginError::Backend {
                source: BackendError::Center(native),
                ..
            } => Some(format!("{:?}", native)),
            _ => None,
        };
        Self {
            code: err.code(),
            message: err.to_string(),
            details,
        }
    }
}

impl From<PluginError> for ErrorEnvelope {
    fn from(err: PluginError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::CenterError;

    #[test]
    fn center_failure_code_names_method() {
        let err = PluginError::backend(
            Method::ZonedSchedule,
            BackendError::Center(CenterError::AddFailed("denied".into())),
        );
        let envelope = ErrorEnvelope::from(err);
        assert_eq!(envelope.code, "zonedSchedule_error");
        assert_eq!(envelope.message, "Failed to add notification request: denied");
        assert!(envelope.details.unwrap().contains("AddFailed"));
    }

    #[test]
    fn unsupported_maps_to_os_version_code() {
        let err = PluginError::backend(
            Method::GetActiveNotifications,
            BackendError::Unsupported {
                message: "too old".into(),
            },
        );
        let envelope = ErrorEnvelope::from(err);
        assert_eq!(envelope.code, UNSUPPORTED_OS_VERSION);
        assert_eq!(envelope.message, "too old");
        assert_eq!(envelope.details, None);
    }

    #[test]
    fn request_errors_map_to_their_codes() {
        let malformed = PluginError::from(RequestError::malformed("missing field `id`"));
        assert_eq!(malformed.code(), MALFORMED_REQUEST);

        let timestamp = PluginError::from(RequestError::invalid_timestamp("x", "bad"));
        assert_eq!(timestamp.code(), INVALID_TIMESTAMP);
    }

    #[test]
    fn unknown_method_code() {
        let err = PluginError::from(UnknownMethod {
            name: "fly".into(),
        });
        assert_eq!(err.code(), METHOD_NOT_IMPLEMENTED);
    }

    #[test]
    fn envelope_omits_empty_details() {
        let envelope = ErrorEnvelope {
            code: "c".into(),
            message: "m".into(),
            details: None,
        };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            serde_json::json!({ "code": "c", "message": "m" })
        );
    }
}
