//! Legacy (field-mutation) notification center port

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::request::Sound;
use crate::domain::schedule::LegacySchedule;

/// A legacy notification object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyNotification {
    pub identifier: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub informative_text: Option<String>,
    pub sound: Option<Sound>,
    pub user_info: Map<String, Value>,
    /// Delivery date, delivery zone and repeat fields. `None` for immediate delivery.
    pub schedule: Option<LegacySchedule>,
}

/// How a legacy notification was activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationType {
    None,
    ContentsClicked,
    ActionButtonClicked,
    Replied,
    AdditionalActionClicked,
}

/// Activation of a legacy notification
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyActivation {
    pub identifier: String,
    pub activation_type: ActivationType,
    pub user_info: Map<String, Value>,
}

/// Port for the legacy notification center
#[async_trait]
pub trait LegacyCenter: Send + Sync {
    /// Show a notification now
    async fn deliver(&self, notification: LegacyNotification);

    /// Queue a notification for its delivery date
    async fn schedule(&self, notification: LegacyNotification);

    /// Notifications waiting for delivery, in center order
    async fn scheduled(&self) -> Vec<LegacyNotification>;

    /// Notifications currently shown, in center order
    async fn delivered(&self) -> Vec<LegacyNotification>;

    async fn remove_scheduled(&self, identifier: &str);

    async fn remove_delivered(&self, identifier: &str);

    async fn remove_all_delivered(&self);
}
