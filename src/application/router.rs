//! Capability router
//!
//! Holds the one backend chosen at startup and forwards every operation to
//! it, tagging failures with the method that hit them.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::error::PluginError;
use super::ports::{NativeCallback, NotificationBackend, PendingNotification};
use crate::domain::capability::{BackendKind, Capabilities};
use crate::domain::method::Method;
use crate::domain::relay::Interaction;
use crate::domain::request::{
    ActionCategory, NotificationRequest, PermissionRequest, PresentationFlags,
};
use crate::domain::schedule::ScheduleIntent;

pub struct CapabilityRouter {
    backend: Arc<dyn NotificationBackend>,
    capabilities: Capabilities,
}

impl CapabilityRouter {
    pub fn new(backend: Arc<dyn NotificationBackend>, capabilities: Capabilities) -> Self {
        Self {
            backend,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub async fn show(
        &self,
        request: &NotificationRequest,
        presentation: PresentationFlags,
    ) -> Result<(), PluginError> {
        debug!(backend = %self.backend_kind(), id = request.id, "show");
        self.backend
            .show(request, presentation)
            .await
            .map_err(|e| PluginError::backend(Method::Show, e))
    }

    /// Schedule on behalf of `method` (`zonedSchedule` or `periodicallyShow`)
    pub async fn schedule(
        &self,
        method: Method,
        request: &NotificationRequest,
        presentation: PresentationFlags,
        intent: &ScheduleIntent,
    ) -> Result<(), PluginError> {
        debug!(
            backend = %self.backend_kind(),
            id = request.id,
            repeats = intent.repeats(),
            "{}", method
        );
        self.backend
            .schedule(request, presentation, intent)
            .await
            .map_err(|e| PluginError::backend(method, e))
    }

    pub async fn cancel(&self, id: i64) -> Result<(), PluginError> {
        debug!(backend = %self.backend_kind(), id, "cancel");
        self.backend
            .cancel(id)
            .await
            .map_err(|e| PluginError::backend(Method::Cancel, e))
    }

    pub async fn cancel_all(&self) -> Result<(), PluginError> {
        debug!(backend = %self.backend_kind(), "cancelAll");
        self.backend
            .cancel_all()
            .await
            .map_err(|e| PluginError::backend(Method::CancelAll, e))
    }

    pub async fn list_pending(&self) -> Result<Vec<PendingNotification>, PluginError> {
        self.backend
            .list_pending()
            .await
            .map_err(|e| PluginError::backend(Method::PendingNotificationRequests, e))
    }

    pub async fn list_active(&self) -> Result<Vec<PendingNotification>, PluginError> {
        self.backend
            .list_active()
            .await
            .map_err(|e| PluginError::backend(Method::GetActiveNotifications, e))
    }

    /// Request permission on behalf of `method` (`initialize` or `requestPermissions`)
    pub async fn request_permission(
        &self,
        method: Method,
        request: PermissionRequest,
    ) -> Result<Option<bool>, PluginError> {
        debug!(backend = %self.backend_kind(), ?request, "requesting permission");
        self.backend
            .request_permission(request)
            .await
            .map_err(|e| PluginError::backend(method, e))
    }

    pub async fn register_categories(
        &self,
        categories: &[ActionCategory],
    ) -> Result<(), PluginError> {
        debug!(
            backend = %self.backend_kind(),
            count = categories.len(),
            "registering categories"
        );
        self.backend
            .register_categories(categories)
            .await
            .map_err(|e| PluginError::backend(Method::Initialize, e))
    }

    pub fn foreground_presentation(
        &self,
        user_info: &Map<String, Value>,
    ) -> Option<PresentationFlags> {
        self.backend.foreground_presentation(user_info)
    }

    pub fn interaction_from(&self, callback: &NativeCallback) -> Option<Interaction> {
        self.backend.interaction_from(callback)
    }

    pub async fn acknowledge(&self, interaction: &Interaction) {
        self.backend.acknowledge(interaction).await
    }
}
