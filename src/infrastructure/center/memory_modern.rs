//! In-memory modern notification center
//!
//! Keeps pending and delivered requests the way the OS would and lets a host
//! advance time and synthesize user responses.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ports::{
    CenterError, Clock, ModernCenter, ModernRequest, NativeAttachment, NativeResponse,
};
use crate::domain::request::{ActionCategory, PermissionRequest};

#[derive(Debug, Clone)]
struct Registered {
    request: ModernRequest,
    anchor: DateTime<Utc>,
    last_fired: Option<DateTime<Utc>>,
}

impl Registered {
    fn next_fire(&self) -> Option<DateTime<Utc>> {
        let trigger = self.request.trigger.as_ref()?;
        trigger.next_fire_after(self.anchor, self.last_fired.unwrap_or(self.anchor))
    }
}

#[derive(Debug, Default)]
struct State {
    pending: Vec<Registered>,
    delivered: Vec<ModernRequest>,
    categories: Vec<ActionCategory>,
    authorization_requests: Vec<PermissionRequest>,
    fail_next_add: Option<String>,
    fail_next_authorization: Option<String>,
}

fn replace_or_push(list: &mut Vec<ModernRequest>, request: ModernRequest) {
    match list.iter_mut().find(|r| r.identifier == request.identifier) {
        Some(existing) => *existing = request,
        None => list.push(request),
    }
}

pub struct InMemoryModernCenter {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
    grant: bool,
}

impl InMemoryModernCenter {
    /// Center that grants every authorization request
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
            grant: true,
        }
    }

    /// Answer authorization requests with `grant`
    pub fn with_authorization(mut self, grant: bool) -> Self {
        self.grant = grant;
        self
    }

    /// Every authorization prompt shown so far
    pub async fn authorization_requests(&self) -> Vec<PermissionRequest> {
        self.state.lock().await.authorization_requests.clone()
    }

    /// Make the next `add` fail with `reason`
    pub async fn fail_next_add(&self, reason: impl Into<String>) {
        self.state.lock().await.fail_next_add = Some(reason.into());
    }

    /// Make the next authorization prompt fail with `reason`
    pub async fn fail_next_authorization(&self, reason: impl Into<String>) {
        self.state.lock().await.fail_next_authorization = Some(reason.into());
    }

    /// Next time a pending request fires
    pub async fn next_fire(&self, identifier: &str) -> Option<DateTime<Utc>> {
        let state = self.state.lock().await;
        state
            .pending
            .iter()
            .find(|r| r.request.identifier == identifier)
            .and_then(Registered::next_fire)
    }

    /// Deliver everything due at the current clock time.
    ///
    /// # Returns
    /// Identifiers delivered, in firing order
    pub async fn deliver_due(&self) -> Vec<String> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let mut fired = Vec::new();

        let pending = std::mem::take(&mut state.pending);
        for mut registered in pending {
            let mut keep = registered.next_fire().is_some();
            if let Some(at) = registered.next_fire().filter(|at| *at <= now) {
                fired.push(registered.request.identifier.clone());
                replace_or_push(&mut state.delivered, registered.request.clone());
                registered.last_fired = Some(at);
                keep = registered.next_fire().is_some();
            }
            if keep {
                state.pending.push(registered);
            }
        }
        fired
    }

    /// Build the response the OS would send when the user interacts with a
    /// known notification. Delivered notifications are searched first.
    pub async fn response_for(
        &self,
        identifier: &str,
        action_identifier: &str,
        user_text: Option<String>,
    ) -> Option<NativeResponse> {
        let state = self.state.lock().await;
        let request = state
            .delivered
            .iter()
            .find(|r| r.identifier == identifier)
            .or_else(|| {
                state
                    .pending
                    .iter()
                    .map(|r| &r.request)
                    .find(|r| r.identifier == identifier)
            })?;
        Some(NativeResponse {
            identifier: request.identifier.clone(),
            action_identifier: action_identifier.to_string(),
            user_text,
            user_info: request.content.user_info.clone(),
        })
    }
}

#[async_trait]
impl ModernCenter for InMemoryModernCenter {
    async fn add(&self, request: ModernRequest) -> Result<(), CenterError> {
        let mut state = self.state.lock().await;
        if let Some(reason) = state.fail_next_add.take() {
            return Err(CenterError::AddFailed(reason));
        }

        debug!(
            identifier = %request.identifier,
            scheduled = request.trigger.is_some(),
            "Adding request"
        );
        state
            .pending
            .retain(|r| r.request.identifier != request.identifier);
        if request.trigger.is_none() {
            replace_or_push(&mut state.delivered, request);
            return Ok(());
        }

        let registered = Registered {
            request,
            anchor: self.clock.now(),
            last_fired: None,
        };
        if registered.next_fire().is_none() {
            debug!(
                identifier = %registered.request.identifier,
                "Dropping request that never fires"
            );
            return Ok(());
        }
        state.pending.push(registered);
        Ok(())
    }

    async fn create_attachment(
        &self,
        identifier: &str,
        path: &str,
    ) -> Result<NativeAttachment, CenterError> {
        let failed = |reason: String| CenterError::AttachmentFailed {
            identifier: identifier.to_string(),
            path: path.to_string(),
            reason,
        };
        let metadata = fs::metadata(path).await.map_err(|e| failed(e.to_string()))?;
        if !metadata.is_file() {
            return Err(failed("not a file".to_string()));
        }
        Ok(NativeAttachment {
            identifier: identifier.to_string(),
            url: PathBuf::from(path),
        })
    }

    async fn remove_pending(&self, identifiers: &[String]) {
        let mut state = self.state.lock().await;
        state
            .pending
            .retain(|r| !identifiers.contains(&r.request.identifier));
    }

    async fn remove_delivered(&self, identifiers: &[String]) {
        let mut state = self.state.lock().await;
        state.delivered.retain(|r| !identifiers.contains(&r.identifier));
    }

    async fn remove_all_pending(&self) {
        self.state.lock().await.pending.clear();
    }

    async fn remove_all_delivered(&self) {
        self.state.lock().await.delivered.clear();
    }

    async fn pending_requests(&self) -> Vec<ModernRequest> {
        let state = self.state.lock().await;
        state.pending.iter().map(|r| r.request.clone()).collect()
    }

    async fn delivered_notifications(&self) -> Vec<ModernRequest> {
        self.state.lock().await.delivered.clone()
    }

    async fn request_authorization(
        &self,
        options: PermissionRequest,
    ) -> Result<bool, CenterError> {
        let mut state = self.state.lock().await;
        if let Some(reason) = state.fail_next_authorization.take() {
            return Err(CenterError::AuthorizationFailed(reason));
        }
        state.authorization_requests.push(options);
        Ok(self.grant)
    }

    async fn categories(&self) -> Vec<ActionCategory> {
        self.state.lock().await.categories.clone()
    }

    async fn set_categories(&self, categories: Vec<ActionCategory>) {
        self.state.lock().await.categories = categories;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ModernContent;
    use crate::domain::schedule::{CalendarTrigger, DateMatch, IntervalTrigger, ModernTrigger};
    use crate::infrastructure::platform::ManualClock;
    use chrono::{Duration, TimeZone};

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn request(identifier: &str, trigger: Option<ModernTrigger>) -> ModernRequest {
        ModernRequest {
            identifier: identifier.to_string(),
            content: ModernContent::default(),
            trigger,
        }
    }

    fn hourly() -> Option<ModernTrigger> {
        Some(ModernTrigger::Interval(IntervalTrigger {
            seconds: 3_600,
            repeats: true,
        }))
    }

    #[tokio::test]
    async fn immediate_request_is_delivered() {
        let center = InMemoryModernCenter::new(clock());
        center.add(request("1", None)).await.unwrap();
        assert!(center.pending_requests().await.is_empty());
        assert_eq!(center.delivered_notifications().await.len(), 1);
    }

    #[tokio::test]
    async fn same_identifier_replaces_pending() {
        let center = InMemoryModernCenter::new(clock());
        center.add(request("1", hourly())).await.unwrap();
        center.add(request("1", hourly())).await.unwrap();
        assert_eq!(center.pending_requests().await.len(), 1);
    }

    #[tokio::test]
    async fn repeating_request_fires_and_stays_pending() {
        let clock = clock();
        let center = InMemoryModernCenter::new(clock.clone());
        center.add(request("1", hourly())).await.unwrap();

        assert!(center.deliver_due().await.is_empty());
        clock.advance(Duration::hours(1));
        assert_eq!(center.deliver_due().await, vec!["1".to_string()]);
        assert!(center.deliver_due().await.is_empty());
        assert_eq!(center.pending_requests().await.len(), 1);
        assert_eq!(
            center.next_fire("1").await,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn past_one_shot_is_dropped() {
        let center = InMemoryModernCenter::new(clock());
        let past = CalendarTrigger {
            components: DateMatch::date_time(
                &Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            ),
            time_zone: chrono_tz::Tz::UTC,
            repeats: false,
        };
        center
            .add(request("1", Some(ModernTrigger::Calendar(past))))
            .await
            .unwrap();

        assert!(center.pending_requests().await.is_empty());
        assert!(center.deliver_due().await.is_empty());
        assert!(center.delivered_notifications().await.is_empty());
    }

    #[tokio::test]
    async fn failed_add_registers_nothing() {
        let center = InMemoryModernCenter::new(clock());
        center.fail_next_add("nope").await;
        assert!(center.add(request("1", hourly())).await.is_err());
        assert!(center.pending_requests().await.is_empty());
        assert!(center.add(request("1", hourly())).await.is_ok());
    }

    #[tokio::test]
    async fn missing_attachment_fails() {
        let center = InMemoryModernCenter::new(clock());
        let err = center
            .create_attachment("img", "/definitely/not/here.png")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CenterError::AttachmentFailed { identifier, .. } if identifier == "img"
        ));
    }

    #[tokio::test]
    async fn response_for_unknown_identifier_is_none() {
        let center = InMemoryModernCenter::new(clock());
        assert!(center.response_for("9", "default", None).await.is_none());
    }
}
