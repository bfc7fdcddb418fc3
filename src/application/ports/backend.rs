//! Notification backend port interface

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::native::{CenterError, NativeCallback};
use crate::domain::capability::BackendKind;
use crate::domain::relay::Interaction;
use crate::domain::request::{
    ActionCategory, NotificationRequest, PermissionRequest, PresentationFlags,
};
use crate::domain::schedule::ScheduleIntent;

/// Backend errors
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The operation has no equivalent on this backend
    #[error("{message}")]
    Unsupported { message: String },

    #[error(transparent)]
    Center(#[from] CenterError),
}

/// An entry of a pending or active listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingNotification {
    pub id: i64,
    pub title: Option<String>,
    pub body: Option<String>,
    pub payload: Option<String>,
}

/// Port for a native notification backend.
///
/// Implementations translate requests into their native representation and
/// decode native callbacks back into interactions.
#[async_trait]
pub trait NotificationBackend: Send + Sync {
    /// Which backend this is
    fn kind(&self) -> BackendKind;

    /// Show a notification right away
    async fn show(
        &self,
        request: &NotificationRequest,
        presentation: PresentationFlags,
    ) -> Result<(), BackendError> {
        self.schedule(request, presentation, &ScheduleIntent::Immediate)
            .await
    }

    /// Register a notification for the given schedule.
    ///
    /// # Arguments
    /// * `request` - The notification to show
    /// * `presentation` - Presentation flags already resolved against defaults
    /// * `intent` - When the notification fires
    async fn schedule(
        &self,
        request: &NotificationRequest,
        presentation: PresentationFlags,
        intent: &ScheduleIntent,
    ) -> Result<(), BackendError>;

    /// Remove a pending and delivered notification
    async fn cancel(&self, id: i64) -> Result<(), BackendError>;

    /// Remove every pending and delivered notification
    async fn cancel_all(&self) -> Result<(), BackendError>;

    async fn list_pending(&self) -> Result<Vec<PendingNotification>, BackendError>;

    async fn list_active(&self) -> Result<Vec<PendingNotification>, BackendError>;

    /// Ask the OS for authorization.
    ///
    /// # Returns
    /// The granted flag, or `None` where the backend has no permission concept
    async fn request_permission(
        &self,
        request: PermissionRequest,
    ) -> Result<Option<bool>, BackendError>;

    /// Replace the registered action categories
    async fn register_categories(
        &self,
        categories: &[ActionCategory],
    ) -> Result<(), BackendError>;

    /// Presentation for a notification about to be shown in the foreground.
    /// `None` where the backend does not ask.
    fn foreground_presentation(
        &self,
        _user_info: &Map<String, Value>,
    ) -> Option<PresentationFlags> {
        None
    }

    /// Apply the native side effects of a decoded interaction, such as
    /// removing a notification whose action cancels it.
    async fn acknowledge(&self, _interaction: &Interaction) {}

    /// Decode a native callback. `None` when it does not belong to this
    /// backend or cannot be attributed to a notification.
    fn interaction_from(&self, callback: &NativeCallback) -> Option<Interaction>;
}

/// Parse a native identifier back into a request id
pub fn parse_identifier(identifier: &str) -> Option<i64> {
    identifier.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_identifier_accepts_decimal_only() {
        assert_eq!(parse_identifier("42"), Some(42));
        assert_eq!(parse_identifier("-7"), Some(-7));
        assert_eq!(parse_identifier("abc"), None);
        assert_eq!(parse_identifier(""), None);
    }

    #[test]
    fn unsupported_message_is_verbatim() {
        let err = BackendError::Unsupported {
            message: "not here".to_string(),
        };
        assert_eq!(err.to_string(), "not here");
    }
}
