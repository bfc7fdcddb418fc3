//! Types shared by both native notification center ports

use thiserror::Error;

use super::legacy_center::LegacyActivation;
use super::modern_center::NativeResponse;

/// Failures reported by a native notification center
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CenterError {
    #[error("Failed to add notification request: {0}")]
    AddFailed(String),

    #[error("Failed to load attachment '{identifier}' from {path}: {reason}")]
    AttachmentFailed {
        identifier: String,
        path: String,
        reason: String,
    },

    #[error("Authorization request failed: {0}")]
    AuthorizationFailed(String),
}

/// A raw interaction callback as delivered by the OS
#[derive(Debug, Clone, PartialEq)]
pub enum NativeCallback {
    /// Response object from the modern center
    Response(NativeResponse),
    /// Activation of a legacy notification
    Activation(LegacyActivation),
}
