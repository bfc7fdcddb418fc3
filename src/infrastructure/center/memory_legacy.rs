//! In-memory legacy notification center

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ports::{
    ActivationType, Clock, LegacyActivation, LegacyCenter, LegacyNotification,
};

#[derive(Debug, Clone)]
struct Scheduled {
    notification: LegacyNotification,
    registered_at: DateTime<Utc>,
    last_fired: Option<DateTime<Utc>>,
}

impl Scheduled {
    /// Counts from registration when the delivery date has already passed
    fn next_fire(&self) -> Option<DateTime<Utc>> {
        let schedule = self.notification.schedule.as_ref()?;
        let after = self.last_fired.unwrap_or_else(|| {
            (schedule.delivery_date - Duration::seconds(1)).max(self.registered_at)
        });
        schedule.next_fire_after(after)
    }
}

#[derive(Debug, Default)]
struct State {
    scheduled: Vec<Scheduled>,
    delivered: Vec<LegacyNotification>,
}

fn replace_or_push(list: &mut Vec<LegacyNotification>, notification: LegacyNotification) {
    match list
        .iter_mut()
        .find(|n| n.identifier == notification.identifier)
    {
        Some(existing) => *existing = notification,
        None => list.push(notification),
    }
}

pub struct InMemoryLegacyCenter {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLegacyCenter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    /// Next time a scheduled notification fires
    pub async fn next_fire(&self, identifier: &str) -> Option<DateTime<Utc>> {
        let state = self.state.lock().await;
        state
            .scheduled
            .iter()
            .find(|s| s.notification.identifier == identifier)
            .and_then(Scheduled::next_fire)
    }

    /// Deliver everything due at the current clock time.
    ///
    /// # Returns
    /// Identifiers delivered, in firing order
    pub async fn deliver_due(&self) -> Vec<String> {
        let now = self.clock.now();
        let mut state = self.state.lock().await;
        let mut fired = Vec::new();

        let scheduled = std::mem::take(&mut state.scheduled);
        for mut entry in scheduled {
            let mut keep = entry.next_fire().is_some();
            if let Some(at) = entry.next_fire().filter(|at| *at <= now) {
                fired.push(entry.notification.identifier.clone());
                replace_or_push(&mut state.delivered, entry.notification.clone());
                entry.last_fired = Some(at);
                keep = entry.next_fire().is_some();
            }
            if keep {
                state.scheduled.push(entry);
            }
        }
        fired
    }

    /// Build the activation the OS would report for a known notification
    pub async fn activation_for(
        &self,
        identifier: &str,
        activation_type: ActivationType,
    ) -> Option<LegacyActivation> {
        let state = self.state.lock().await;
        let notification = state
            .delivered
            .iter()
            .find(|n| n.identifier == identifier)
            .or_else(|| {
                state
                    .scheduled
                    .iter()
                    .map(|s| &s.notification)
                    .find(|n| n.identifier == identifier)
            })?;
        Some(LegacyActivation {
            identifier: notification.identifier.clone(),
            activation_type,
            user_info: notification.user_info.clone(),
        })
    }
}

#[async_trait]
impl LegacyCenter for InMemoryLegacyCenter {
    async fn deliver(&self, notification: LegacyNotification) {
        debug!(identifier = %notification.identifier, "Delivering notification");
        let mut state = self.state.lock().await;
        state
            .scheduled
            .retain(|s| s.notification.identifier != notification.identifier);
        replace_or_push(&mut state.delivered, notification);
    }

    async fn schedule(&self, notification: LegacyNotification) {
        let mut state = self.state.lock().await;
        state
            .scheduled
            .retain(|s| s.notification.identifier != notification.identifier);

        let entry = Scheduled {
            notification,
            registered_at: self.clock.now(),
            last_fired: None,
        };
        if entry.next_fire().is_none() {
            debug!(
                identifier = %entry.notification.identifier,
                "Dropping notification that never fires"
            );
            return;
        }
        debug!(identifier = %entry.notification.identifier, "Scheduling notification");
        state.scheduled.push(entry);
    }

    async fn scheduled(&self) -> Vec<LegacyNotification> {
        let state = self.state.lock().await;
        state
            .scheduled
            .iter()
            .map(|s| s.notification.clone())
            .collect()
    }

    async fn delivered(&self) -> Vec<LegacyNotification> {
        self.state.lock().await.delivered.clone()
    }

    async fn remove_scheduled(&self, identifier: &str) {
        let mut state = self.state.lock().await;
        state
            .scheduled
            .retain(|s| s.notification.identifier != identifier);
    }

    async fn remove_delivered(&self, identifier: &str) {
        let mut state = self.state.lock().await;
        state.delivered.retain(|n| n.identifier != identifier);
    }

    async fn remove_all_delivered(&self) {
        self.state.lock().await.delivered.clear();
    }
}
