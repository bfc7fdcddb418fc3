//! Notification plugin use case
//!
//! Entry point for host method calls: unpacks arguments, keeps the
//! process-wide presentation defaults and drives initialization.

use std::sync::RwLock;

use serde_json::{json, Map, Value};
use tracing::{debug, info};

use super::error::{ErrorEnvelope, PluginError};
use super::ports::{NativeCallback, PendingNotification};
use super::relay::RelayHandle;
use super::router::CapabilityRouter;
use crate::domain::capability::{BackendKind, Capabilities};
use crate::domain::method::Method;
use crate::domain::relay::LaunchDetails;
use crate::domain::request::{
    parse_arguments, InitializeArgs, NotificationRequest, PermissionRequest, PresentationFlags,
};
use crate::domain::schedule::ScheduleIntent;

pub struct NotificationPlugin {
    router: CapabilityRouter,
    relay: RelayHandle,
    defaults: RwLock<PresentationFlags>,
}

impl NotificationPlugin {
    pub fn new(router: CapabilityRouter, relay: RelayHandle) -> Self {
        Self {
            router,
            relay,
            defaults: RwLock::new(PresentationFlags::default()),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.router.capabilities()
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.router.backend_kind()
    }

    /// Current process-wide presentation defaults
    pub fn presentation_defaults(&self) -> PresentationFlags {
        *self
            .defaults
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_presentation_defaults(&self, flags: PresentationFlags) {
        *self
            .defaults
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = flags;
    }

    /// Store defaults, register categories and request permissions, then
    /// release any notification tap held since launch.
    ///
    /// # Returns
    /// Whether permission was granted (always true on the legacy backend)
    pub async fn initialize(&self, args: InitializeArgs) -> Result<bool, PluginError> {
        self.set_presentation_defaults(args.presentation_defaults());

        let granted = match self.backend_kind() {
            BackendKind::Modern => {
                if let Some(categories) = &args.notification_categories {
                    self.router.register_categories(categories).await?;
                }
                self.router
                    .request_permission(Method::Initialize, args.permissions())
                    .await?
                    .unwrap_or(false)
            }
            BackendKind::Legacy => true,
        };

        self.relay
            .mark_initialized()
            .await
            .map_err(|_| PluginError::RelayClosed(Method::Initialize))?;
        info!(backend = %self.backend_kind(), granted, "Plugin initialized");

        Ok(granted)
    }

    /// `None` where the backend has no permission concept
    pub async fn request_permissions(
        &self,
        request: PermissionRequest,
    ) -> Result<Option<bool>, PluginError> {
        self.router
            .request_permission(Method::RequestPermissions, request)
            .await
    }

    /// Whether a notification tap launched the process. `None` on the legacy backend.
    pub fn launch_details(&self) -> Option<LaunchDetails> {
        match self.backend_kind() {
            BackendKind::Modern => Some(self.relay.launch_details()),
            BackendKind::Legacy => None,
        }
    }

    pub async fn show(&self, request: &NotificationRequest) -> Result<(), PluginError> {
        let presentation = request.presentation(self.presentation_defaults());
        self.router.show(request, presentation).await
    }

    pub async fn zoned_schedule(
        &self,
        request: &NotificationRequest,
        intent: &ScheduleIntent,
    ) -> Result<(), PluginError> {
        let presentation = request.presentation(self.presentation_defaults());
        self.router
            .schedule(Method::ZonedSchedule, request, presentation, intent)
            .await
    }

    pub async fn periodically_show(
        &self,
        request: &NotificationRequest,
        intent: &ScheduleIntent,
    ) -> Result<(), PluginError> {
        let presentation = request.presentation(self.presentation_defaults());
        self.router
            .schedule(Method::PeriodicallyShow, request, presentation, intent)
            .await
    }

    pub async fn cancel(&self, id: i64) -> Result<(), PluginError> {
        self.router.cancel(id).await
    }

    pub async fn cancel_all(&self) -> Result<(), PluginError> {
        self.router.cancel_all().await
    }

    pub async fn pending_notification_requests(
        &self,
    ) -> Result<Vec<PendingNotification>, PluginError> {
        self.router.list_pending().await
    }

    pub async fn active_notifications(&self) -> Result<Vec<PendingNotification>, PluginError> {
        self.router.list_active().await
    }

    /// Presentation options for a notification arriving while in the foreground
    pub fn foreground_presentation(
        &self,
        user_info: &Map<String, Value>,
    ) -> Option<PresentationFlags> {
        self.router.foreground_presentation(user_info)
    }

    /// Decode a native callback and hand it to the relay.
    ///
    /// # Returns
    /// Whether the callback produced an interaction
    pub async fn deliver_native(&self, callback: &NativeCallback) -> bool {
        match self.router.interaction_from(callback) {
            Some(interaction) => {
                self.router.acknowledge(&interaction).await;
                if self.relay.deliver(interaction).is_err() {
                    debug!("Event relay stopped, dropping interaction");
                    return false;
                }
                true
            }
            None => {
                debug!(?callback, "Ignoring native callback");
                false
            }
        }
    }

    /// Handle an untyped method call from the host
    pub async fn handle(&self, method: &str, arguments: Value) -> Result<Value, ErrorEnvelope> {
        self.dispatch(method, &arguments)
            .await
            .map_err(|e| ErrorEnvelope::from(&e))
    }

    async fn dispatch(&self, method: &str, arguments: &Value) -> Result<Value, PluginError> {
        let method: Method = method.parse()?;
        debug!(%method, "Handling method call");

        match method {
            Method::Initialize => {
                let args: InitializeArgs = parse_arguments(arguments)?;
                Ok(json!(self.initialize(args).await?))
            }
            Method::RequestPermissions => {
                let request: PermissionRequest = parse_arguments(arguments)?;
                Ok(json!(self.request_permissions(request).await?))
            }
            Method::GetLaunchDetails => Ok(json!(self.launch_details())),
            Method::Show => {
                let request = NotificationRequest::from_value(arguments)?;
                self.show(&request).await?;
                Ok(Value::Null)
            }
            Method::ZonedSchedule => {
                let request = NotificationRequest::from_value(arguments)?;
                let intent = ScheduleIntent::zoned_from_value(arguments)?;
                self.zoned_schedule(&request, &intent).await?;
                Ok(Value::Null)
            }
            Method::PeriodicallyShow => {
                let request = NotificationRequest::from_value(arguments)?;
                let intent = ScheduleIntent::periodic_from_value(arguments)?;
                self.periodically_show(&request, &intent).await?;
                Ok(Value::Null)
            }
            Method::Cancel => {
                let id: i64 = parse_arguments(arguments)?;
                self.cancel(id).await?;
                Ok(Value::Null)
            }
            Method::CancelAll => {
                self.cancel_all().await?;
                Ok(Value::Null)
            }
            Method::PendingNotificationRequests => {
                Ok(json!(self.pending_notification_requests().await?))
            }
            Method::GetActiveNotifications => Ok(json!(self.active_notifications().await?)),
        }
    }
}
