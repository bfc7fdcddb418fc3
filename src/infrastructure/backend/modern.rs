//! Modern backend adapter
//!
//! Builds trigger-object requests. Content is completed, attachments included,
//! before anything is added so a failure leaves the center untouched.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ports::{
    parse_identifier, BackendError, CenterError, ModernCenter, ModernContent, ModernRequest,
    NativeCallback, NotificationBackend, PendingNotification, DEFAULT_ACTION_IDENTIFIER,
};
use crate::domain::capability::{BackendKind, Capabilities};
use crate::domain::relay::Interaction;
use crate::domain::request::{
    payload_from_user_info, ActionCategory, NotificationMetadata, NotificationRequest,
    PermissionRequest, PresentationFlags,
};
use crate::domain::schedule::{to_modern, ScheduleIntent};

pub struct ModernBackend {
    center: Arc<dyn ModernCenter>,
    capabilities: Capabilities,
    category_lock: Mutex<()>,
}

impl ModernBackend {
    pub fn new(center: Arc<dyn ModernCenter>, capabilities: Capabilities) -> Self {
        Self {
            center,
            capabilities,
            category_lock: Mutex::new(()),
        }
    }

    async fn build_content(
        &self,
        request: &NotificationRequest,
        presentation: PresentationFlags,
    ) -> Result<ModernContent, CenterError> {
        let options = request.options();

        let mut attachments = Vec::with_capacity(options.attachments.len());
        for attachment in &options.attachments {
            attachments.push(
                self.center
                    .create_attachment(&attachment.identifier, &attachment.file_path)
                    .await?,
            );
        }

        Ok(ModernContent {
            title: request.title.clone(),
            subtitle: request.subtitle.clone(),
            body: request.body.clone(),
            sound: request.sound(presentation),
            badge: options.badge_number,
            thread_identifier: options.thread_identifier,
            category_identifier: options.category_identifier,
            interruption_level: options
                .interruption_level
                .filter(|_| self.capabilities.interruption_level),
            attachments,
            user_info: request.metadata(presentation).to_user_info(),
        })
    }
}

fn to_listing(requests: Vec<ModernRequest>) -> Vec<PendingNotification> {
    requests
        .into_iter()
        .filter_map(|request| {
            Some(PendingNotification {
                id: parse_identifier(&request.identifier)?,
                payload: payload_from_user_info(&request.content.user_info),
                title: request.content.title,
                body: request.content.body,
            })
        })
        .collect()
}

#[async_trait]
impl NotificationBackend for ModernBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Modern
    }

    async fn schedule(
        &self,
        request: &NotificationRequest,
        presentation: PresentationFlags,
        intent: &ScheduleIntent,
    ) -> Result<(), BackendError> {
        let content = self.build_content(request, presentation).await?;
        self.center
            .add(ModernRequest {
                identifier: request.identifier(),
                content,
                trigger: to_modern(intent),
            })
            .await?;
        Ok(())
    }

    async fn cancel(&self, id: i64) -> Result<(), BackendError> {
        let identifiers = [id.to_string()];
        self.center.remove_pending(&identifiers).await;
        self.center.remove_delivered(&identifiers).await;
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), BackendError> {
        self.center.remove_all_pending().await;
        self.center.remove_all_delivered().await;
        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<PendingNotification>, BackendError> {
        Ok(to_listing(self.center.pending_requests().await))
    }

    async fn list_active(&self) -> Result<Vec<PendingNotification>, BackendError> {
        Ok(to_listing(self.center.delivered_notifications().await))
    }

    async fn request_permission(
        &self,
        request: PermissionRequest,
    ) -> Result<Option<bool>, BackendError> {
        if request.is_empty() {
            return Ok(Some(false));
        }
        let granted = self.center.request_authorization(request).await?;
        Ok(Some(granted))
    }

    async fn register_categories(
        &self,
        categories: &[ActionCategory],
    ) -> Result<(), BackendError> {
        if categories.is_empty() {
            return Ok(());
        }

        let _guard = self.category_lock.lock().await;
        let previous = self.center.categories().await;
        let replacement = ActionCategory::dedup(categories);
        debug!(
            previous = previous.len(),
            registered = replacement.len(),
            "Replacing notification categories"
        );
        self.center.set_categories(replacement).await;
        Ok(())
    }

    fn foreground_presentation(
        &self,
        user_info: &Map<String, Value>,
    ) -> Option<PresentationFlags> {
        Some(NotificationMetadata::from_user_info(user_info).presentation)
    }

    async fn acknowledge(&self, interaction: &Interaction) {
        let Interaction::Action {
            notification_id,
            action_id,
            ..
        } = interaction
        else {
            return;
        };
        let identifier = notification_id.to_string();
        let category = self
            .center
            .delivered_notifications()
            .await
            .into_iter()
            .find(|r| r.identifier == identifier)
            .and_then(|r| r.content.category_identifier);
        let Some(category) = category else {
            return;
        };

        let cancels = self
            .center
            .categories()
            .await
            .iter()
            .find(|c| c.identifier == category)
            .and_then(|c| c.action(action_id))
            .is_some_and(|a| a.cancels_notification());
        if cancels {
            debug!(%identifier, %action_id, "Action cancels its notification");
            self.center.remove_delivered(&[identifier]).await;
        }
    }

    fn interaction_from(&self, callback: &NativeCallback) -> Option<Interaction> {
        let NativeCallback::Response(response) = callback else {
            return None;
        };
        let notification_id = parse_identifier(&response.identifier)?;
        let payload = payload_from_user_info(&response.user_info);

        if response.action_identifier == DEFAULT_ACTION_IDENTIFIER {
            return Some(Interaction::Default { payload });
        }
        Some(Interaction::Action {
            notification_id,
            action_id: response.action_identifier.clone(),
            input: response.user_text.clone().unwrap_or_default(),
            payload: payload.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::NativeResponse;
    use crate::domain::capability::OsVersion;
    use crate::domain::request::{InterruptionLevel, Sound};
    use crate::infrastructure::center::InMemoryModernCenter;
    use crate::infrastructure::platform::SystemClock;
    use serde_json::json;

    fn backend_on(version: OsVersion) -> (ModernBackend, Arc<InMemoryModernCenter>) {
        let center = Arc::new(InMemoryModernCenter::new(Arc::new(SystemClock)));
        let backend = ModernBackend::new(center.clone(), Capabilities::detect(version));
        (backend, center)
    }

    fn response(identifier: &str, action: &str, text: Option<&str>) -> NativeCallback {
        let mut user_info = Map::new();
        user_info.insert("payload".into(), json!("p"));
        NativeCallback::Response(NativeResponse {
            identifier: identifier.to_string(),
            action_identifier: action.to_string(),
            user_text: text.map(str::to_string),
            user_info,
        })
    }

    #[tokio::test]
    async fn show_builds_content_from_request() {
        let (backend, center) = backend_on(OsVersion::new(14, 0, 0));
        let request = NotificationRequest::from_value(&json!({
            "id": 42,
            "title": "T",
            "payload": "p1",
            "platformSpecifics": {
                "presentSound": true,
                "badgeNumber": 2,
                "interruptionLevel": 3
            }
        }))
        .unwrap();
        let presentation = request.presentation(PresentationFlags::new(true, false, false));

        backend.show(&request, presentation).await.unwrap();

        let delivered = center.delivered_notifications().await;
        assert_eq!(delivered.len(), 1);
        let native = &delivered[0];
        assert_eq!(native.identifier, "42");
        assert_eq!(native.trigger, None);
        assert_eq!(native.content.sound, Some(Sound::Default));
        assert_eq!(native.content.badge, Some(2));
        assert_eq!(
            native.content.interruption_level,
            Some(InterruptionLevel::Critical)
        );
        assert_eq!(native.content.user_info.get("presentAlert"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn interruption_level_dropped_below_threshold() {
        let (backend, center) = backend_on(OsVersion::new(11, 6, 0));
        let request = NotificationRequest::from_value(&json!({
            "id": 1,
            "platformSpecifics": { "interruptionLevel": 2 }
        }))
        .unwrap();

        backend
            .show(&request, PresentationFlags::default())
            .await
            .unwrap();
        assert_eq!(
            center.delivered_notifications().await[0]
                .content
                .interruption_level,
            None
        );
    }

    #[tokio::test]
    async fn empty_permission_request_skips_prompt() {
        let (backend, center) = backend_on(OsVersion::new(14, 0, 0));
        let granted = backend
            .request_permission(PermissionRequest::default())
            .await
            .unwrap();
        assert_eq!(granted, Some(false));
        assert!(center.authorization_requests().await.is_empty());
    }

    #[test]
    fn default_action_is_a_tap() {
        let (backend, _) = backend_on(OsVersion::new(14, 0, 0));
        assert_eq!(
            backend.interaction_from(&response("3", DEFAULT_ACTION_IDENTIFIER, None)),
            Some(Interaction::Default {
                payload: Some("p".into())
            })
        );
    }

    #[test]
    fn text_action_carries_input() {
        let (backend, _) = backend_on(OsVersion::new(14, 0, 0));
        assert_eq!(
            backend.interaction_from(&response("3", "reply", Some("hello"))),
            Some(Interaction::Action {
                notification_id: 3,
                action_id: "reply".into(),
                input: "hello".into(),
                payload: "p".into(),
            })
        );
    }

    #[test]
    fn non_numeric_identifier_is_dropped() {
        let (backend, _) = backend_on(OsVersion::new(14, 0, 0));
        assert_eq!(backend.interaction_from(&response("abc", "reply", None)), None);
    }

    #[test]
    fn foreground_presentation_reads_metadata() {
        let (backend, _) = backend_on(OsVersion::new(14, 0, 0));
        let mut info = Map::new();
        info.insert("presentAlert".into(), json!(true));
        assert_eq!(
            backend.foreground_presentation(&info),
            Some(PresentationFlags::new(true, false, false))
        );
    }
}
