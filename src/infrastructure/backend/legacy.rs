//! Legacy backend adapter
//!
//! Sets delivery date, zone and repeat fields on a notification object. The
//! legacy surface has no badge, thread, category, interruption level or
//! attachment fields, so those options are ignored.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{
    parse_identifier, ActivationType, BackendError, Clock, LegacyCenter, LegacyNotification,
    NativeCallback, NotificationBackend, PendingNotification,
};
use crate::domain::capability::{BackendKind, MODERN_BACKEND_MIN_VERSION};
use crate::domain::method::Method;
use crate::domain::relay::Interaction;
use crate::domain::request::{
    payload_from_user_info, payload_only_user_info, ActionCategory, NotificationRequest,
    PermissionRequest, PresentationFlags,
};
use crate::domain::schedule::{to_legacy, ScheduleIntent};

pub struct LegacyBackend {
    center: Arc<dyn LegacyCenter>,
    clock: Arc<dyn Clock>,
}

impl LegacyBackend {
    pub fn new(center: Arc<dyn LegacyCenter>, clock: Arc<dyn Clock>) -> Self {
        Self { center, clock }
    }

    fn build_notification(
        &self,
        request: &NotificationRequest,
        presentation: PresentationFlags,
        intent: &ScheduleIntent,
    ) -> LegacyNotification {
        LegacyNotification {
            identifier: request.identifier(),
            title: request.title.clone(),
            subtitle: request.subtitle.clone(),
            informative_text: request.body.clone(),
            sound: request.sound(presentation),
            user_info: payload_only_user_info(request.payload.as_deref()),
            schedule: to_legacy(intent, self.clock.now()),
        }
    }
}

fn unsupported(method: Method) -> BackendError {
    BackendError::Unsupported {
        message: format!(
            "OS version must be {} or newer to use {}",
            MODERN_BACKEND_MIN_VERSION, method
        ),
    }
}

#[async_trait]
impl NotificationBackend for LegacyBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Legacy
    }

    async fn schedule(
        &self,
        request: &NotificationRequest,
        presentation: PresentationFlags,
        intent: &ScheduleIntent,
    ) -> Result<(), BackendError> {
        let notification = self.build_notification(request, presentation, intent);
        match notification.schedule {
            Some(_) => self.center.schedule(notification).await,
            None => self.center.deliver(notification).await,
        }
        Ok(())
    }

    async fn cancel(&self, id: i64) -> Result<(), BackendError> {
        let identifier = id.to_string();
        self.center.remove_scheduled(&identifier).await;
        self.center.remove_delivered(&identifier).await;
        Ok(())
    }

    async fn cancel_all(&self) -> Result<(), BackendError> {
        for notification in self.center.scheduled().await {
            self.center.remove_scheduled(&notification.identifier).await;
        }
        self.center.remove_all_delivered().await;
        Ok(())
    }

    async fn list_pending(&self) -> Result<Vec<PendingNotification>, BackendError> {
        Ok(self
            .center
            .scheduled()
            .await
            .into_iter()
            .filter_map(|notification| {
                Some(PendingNotification {
                    id: parse_identifier(&notification.identifier)?,
                    payload: payload_from_user_info(&notification.user_info),
                    title: notification.title,
                    body: notification.informative_text,
                })
            })
            .collect())
    }

    async fn list_active(&self) -> Result<Vec<PendingNotification>, BackendError> {
        Err(unsupported(Method::GetActiveNotifications))
    }

    async fn request_permission(
        &self,
        _request: PermissionRequest,
    ) -> Result<Option<bool>, BackendError> {
        Ok(None)
    }

    async fn register_categories(
        &self,
        _categories: &[ActionCategory],
    ) -> Result<(), BackendError> {
        Ok(())
    }

    fn interaction_from(&self, callback: &NativeCallback) -> Option<Interaction> {
        let NativeCallback::Activation(activation) = callback else {
            return None;
        };
        parse_identifier(&activation.identifier)?;

        match activation.activation_type {
            ActivationType::ContentsClicked => Some(Interaction::Default {
                payload: payload_from_user_info(&activation.user_info),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::LegacyActivation;
    use crate::domain::request::Sound;
    use crate::domain::schedule::{LegacyRepeat, RepeatUnit};
    use crate::infrastructure::center::InMemoryLegacyCenter;
    use crate::infrastructure::platform::ManualClock;
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::json;

    fn backend() -> (LegacyBackend, Arc<InMemoryLegacyCenter>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        ));
        let center = Arc::new(InMemoryLegacyCenter::new(clock.clone()));
        (LegacyBackend::new(center.clone(), clock), center)
    }

    fn activation(identifier: &str, activation_type: ActivationType) -> NativeCallback {
        NativeCallback::Activation(LegacyActivation {
            identifier: identifier.to_string(),
            activation_type,
            user_info: payload_only_user_info(Some("p")),
        })
    }

    #[tokio::test]
    async fn show_carries_payload_only() {
        let (backend, center) = backend();
        let request = NotificationRequest::from_value(&json!({
            "id": 9,
            "body": "B",
            "payload": "p1",
            "platformSpecifics": { "presentSound": true, "badgeNumber": 3 }
        }))
        .unwrap();
        let presentation = request.presentation(PresentationFlags::default());

        backend.show(&request, presentation).await.unwrap();

        let delivered = center.delivered().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].informative_text.as_deref(), Some("B"));
        assert_eq!(delivered[0].sound, Some(Sound::Default));
        assert_eq!(delivered[0].user_info.len(), 1);
        assert_eq!(delivered[0].user_info.get("payload"), Some(&json!("p1")));
    }

    #[tokio::test]
    async fn periodic_starts_one_interval_out() {
        let (backend, center) = backend();
        backend
            .schedule(
                &NotificationRequest::new(1),
                PresentationFlags::default(),
                &ScheduleIntent::RepeatingInterval(RepeatUnit::Hourly),
            )
            .await
            .unwrap();

        let scheduled = center.scheduled().await;
        let schedule = scheduled[0].schedule.unwrap();
        assert_eq!(
            schedule.delivery_date,
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::hours(1)
        );
        assert_eq!(schedule.repeat, Some(LegacyRepeat::Hour));
    }

    #[tokio::test]
    async fn active_listing_is_unsupported() {
        let (backend, _) = backend();
        let err = backend.list_active().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "OS version must be 10.14 or newer to use getActiveNotifications"
        );
    }

    #[tokio::test]
    async fn permissions_are_not_a_concept() {
        let (backend, _) = backend();
        let granted = backend
            .request_permission(PermissionRequest::new(true, true, true, true))
            .await
            .unwrap();
        assert_eq!(granted, None);
    }

    #[test]
    fn only_contents_clicked_is_relayed() {
        let (backend, _) = backend();
        assert_eq!(
            backend.interaction_from(&activation("1", ActivationType::ContentsClicked)),
            Some(Interaction::Default {
                payload: Some("p".into())
            })
        );
        assert_eq!(
            backend.interaction_from(&activation("1", ActivationType::ActionButtonClicked)),
            None
        );
        assert_eq!(
            backend.interaction_from(&activation("x", ActivationType::ContentsClicked)),
            None
        );
    }
}
