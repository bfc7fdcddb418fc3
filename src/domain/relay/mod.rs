//! Interaction events relayed back to the host

mod lifecycle;

pub use lifecycle::{InvalidStateTransition, LifecycleState, RelayLifecycle};

use serde::Serialize;

/// A user interaction with a delivered notification, already decoded by a
/// backend adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// The notification body was tapped
    Default { payload: Option<String> },
    /// An action button was pressed or text was submitted
    Action {
        notification_id: i64,
        action_id: String,
        input: String,
        payload: String,
    },
}

/// Event sent to the host over the outbound channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "arguments", rename_all = "camelCase")]
pub enum OutboundEvent {
    SelectNotification(Option<String>),
    #[serde(rename_all = "camelCase")]
    SelectNotificationAction {
        notification_id: i64,
        action_id: String,
        input: String,
        payload: String,
    },
}

impl From<Interaction> for OutboundEvent {
    fn from(interaction: Interaction) -> Self {
        match interaction {
            Interaction::Default { payload } => Self::SelectNotification(payload),
            Interaction::Action {
                notification_id,
                action_id,
                input,
                payload,
            } => Self::SelectNotificationAction {
                notification_id,
                action_id,
                input,
                payload,
            },
        }
    }
}

/// Whether the process was launched by tapping a notification
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchDetails {
    pub notification_launched_app: bool,
    pub payload: Option<String>,
}
