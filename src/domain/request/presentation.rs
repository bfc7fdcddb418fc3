//! Presentation flags, sound resolution and the metadata carried on notifications

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// User metadata keys shared by both backends
pub const PAYLOAD_KEY: &str = "payload";
pub const PRESENT_ALERT_KEY: &str = "presentAlert";
pub const PRESENT_SOUND_KEY: &str = "presentSound";
pub const PRESENT_BADGE_KEY: &str = "presentBadge";

/// Whether a notification shows an alert, plays a sound and updates the badge
/// while the app is in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PresentationFlags {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
}

impl PresentationFlags {
    pub const fn new(alert: bool, sound: bool, badge: bool) -> Self {
        Self {
            alert,
            sound,
            badge,
        }
    }

    /// Resolve per-request overrides against process-wide defaults.
    /// `None` means "not specified" and falls back; `Some(false)` does not.
    pub fn resolve(
        defaults: PresentationFlags,
        alert: Option<bool>,
        sound: Option<bool>,
        badge: Option<bool>,
    ) -> Self {
        Self {
            alert: alert.unwrap_or(defaults.alert),
            sound: sound.unwrap_or(defaults.sound),
            badge: badge.unwrap_or(defaults.badge),
        }
    }
}

/// Sound attached to a built notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sound {
    /// The platform's default notification sound
    Default,
    /// A named sound resource bundled with the app
    Named(String),
}

impl Sound {
    /// Pick the sound for a notification.
    ///
    /// An explicit name always wins. Otherwise a notification that presents
    /// sound gets the platform default, and one that doesn't gets none.
    pub fn resolve(explicit: Option<&str>, present_sound: bool) -> Option<Self> {
        match explicit {
            Some(name) => Some(Self::Named(name.to_string())),
            None if present_sound => Some(Self::Default),
            None => None,
        }
    }
}

/// Data that travels with a notification through the OS and comes back on
/// presentation and interaction callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationMetadata {
    pub payload: Option<String>,
    pub presentation: PresentationFlags,
}

impl NotificationMetadata {
    pub fn new(payload: Option<String>, presentation: PresentationFlags) -> Self {
        Self {
            payload,
            presentation,
        }
    }

    /// Encode as the opaque user-info map of a modern notification
    pub fn to_user_info(&self) -> Map<String, Value> {
        let mut info = payload_only_user_info(self.payload.as_deref());
        info.insert(PRESENT_ALERT_KEY.into(), Value::Bool(self.presentation.alert));
        info.insert(PRESENT_SOUND_KEY.into(), Value::Bool(self.presentation.sound));
        info.insert(PRESENT_BADGE_KEY.into(), Value::Bool(self.presentation.badge));
        info
    }

    /// Decode from a user-info map. Missing or non-boolean flags read as false.
    pub fn from_user_info(info: &Map<String, Value>) -> Self {
        let flag = |key: &str| info.get(key).and_then(Value::as_bool).unwrap_or(false);
        Self {
            payload: payload_from_user_info(info),
            presentation: PresentationFlags {
                alert: flag(PRESENT_ALERT_KEY),
                sound: flag(PRESENT_SOUND_KEY),
                badge: flag(PRESENT_BADGE_KEY),
            },
        }
    }
}

/// User-info map holding only the payload (legacy notifications)
pub fn payload_only_user_info(payload: Option<&str>) -> Map<String, Value> {
    let mut info = Map::new();
    info.insert(
        PAYLOAD_KEY.into(),
        payload.map_or(Value::Null, |p| Value::String(p.to_string())),
    );
    info
}

/// Read the payload back out of a user-info map
pub fn payload_from_user_info(info: &Map<String, Value>) -> Option<String> {
    info.get(PAYLOAD_KEY)
        .and_then(Value::as_str)
        .map(str::to_string)
}
