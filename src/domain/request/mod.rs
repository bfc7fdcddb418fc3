//! Request model
//!
//! Typed representation of incoming notification requests, parsed from the
//! untyped key-value arguments of a method call.

mod category;
mod permission;
mod presentation;

pub use category::{Action, ActionCategory, ActionOption, CategoryOption};
pub use permission::{InitializeArgs, PermissionRequest};
pub use presentation::{
    payload_from_user_info, payload_only_user_info, NotificationMetadata, PresentationFlags,
    Sound, PAYLOAD_KEY,
};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::domain::error::RequestError;

/// How urgently the system should surface a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub enum InterruptionLevel {
    Passive,
    Active,
    TimeSensitive,
    Critical,
}

impl TryFrom<u8> for InterruptionLevel {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Passive),
            1 => Ok(Self::Active),
            2 => Ok(Self::TimeSensitive),
            3 => Ok(Self::Critical),
            other => Err(format!("unknown interruption level {}", other)),
        }
    }
}

/// A file to attach to the notification
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentSpec {
    pub identifier: String,
    pub file_path: String,
}

/// Platform-specific options of a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOptions {
    pub sound: Option<String>,
    pub badge_number: Option<i64>,
    pub present_alert: Option<bool>,
    pub present_sound: Option<bool>,
    pub present_badge: Option<bool>,
    pub thread_identifier: Option<String>,
    pub category_identifier: Option<String>,
    pub interruption_level: Option<InterruptionLevel>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<AttachmentSpec>,
}

/// A show/schedule request
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub id: i64,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub payload: Option<String>,
    #[serde(rename = "platformSpecifics")]
    pub platform_options: Option<PlatformOptions>,
}

impl NotificationRequest {
    /// Create a bare request with only an identifier
    pub fn new(id: i64) -> Self {
        Self {
            id,
            title: None,
            subtitle: None,
            body: None,
            payload: None,
            platform_options: None,
        }
    }

    /// Parse from method-call arguments
    pub fn from_value(arguments: &Value) -> Result<Self, RequestError> {
        parse_arguments(arguments)
    }

    /// The identifier handed to the native backend
    pub fn identifier(&self) -> String {
        self.id.to_string()
    }

    /// Resolve the presentation flags against process-wide defaults
    pub fn presentation(&self, defaults: PresentationFlags) -> PresentationFlags {
        match &self.platform_options {
            Some(options) => PresentationFlags::resolve(
                defaults,
                options.present_alert,
                options.present_sound,
                options.present_badge,
            ),
            None => defaults,
        }
    }

    /// Sound for the built notification given its resolved presentation
    pub fn sound(&self, presentation: PresentationFlags) -> Option<Sound> {
        let explicit = self
            .platform_options
            .as_ref()
            .and_then(|o| o.sound.as_deref());
        Sound::resolve(explicit, presentation.sound)
    }

    /// Metadata that must travel with the notification
    pub fn metadata(&self, presentation: PresentationFlags) -> NotificationMetadata {
        NotificationMetadata::new(self.payload.clone(), presentation)
    }

    /// Platform options, or an empty set when none were given
    pub fn options(&self) -> PlatformOptions {
        self.platform_options.clone().unwrap_or_default()
    }
}

/// Parse a typed value out of untyped method-call arguments.
///
/// Every shape error becomes `RequestError::Malformed`.
pub fn parse_arguments<T: DeserializeOwned>(arguments: &Value) -> Result<T, RequestError> {
    T::deserialize(arguments).map_err(|e| RequestError::malformed(e.to_string()))
}

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_request() {
        let request = NotificationRequest::from_value(&json!({ "id": 7 })).unwrap();
        assert_eq!(request, NotificationRequest::new(7));
        assert_eq!(request.identifier(), "7");
    }

    #[test]
    fn missing_id_is_malformed() {
        let err = NotificationRequest::from_value(&json!({ "title": "T" })).unwrap_err();
        assert!(matches!(err, RequestError::Malformed(msg) if msg.contains("id")));
    }

    #[test]
    fn wrongly_typed_id_is_malformed() {
        let err = NotificationRequest::from_value(&json!({ "id": "42" })).unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[test]
    fn nulls_are_absent() {
        let request = NotificationRequest::from_value(&json!({
            "id": 1,
            "title": null,
            "platformSpecifics": { "presentSound": null, "attachments": null }
        }))
        .unwrap();
        assert!(request.title.is_none());
        let options = request.options();
        assert!(options.present_sound.is_none());
        assert!(options.attachments.is_empty());
    }

    #[test]
    fn parses_platform_specifics() {
        let request = NotificationRequest::from_value(&json!({
            "id": 3,
            "payload": "p",
            "platformSpecifics": {
                "sound": "chime.aiff",
                "badgeNumber": 4,
                "presentAlert": false,
                "threadIdentifier": "thread",
                "categoryIdentifier": "cat",
                "interruptionLevel": 2,
                "attachments": [{ "identifier": "img", "filePath": "/tmp/a.png" }]
            }
        }))
        .unwrap();
        let options = request.options();
        assert_eq!(options.sound.as_deref(), Some("chime.aiff"));
        assert_eq!(options.badge_number, Some(4));
        assert_eq!(options.present_alert, Some(false));
        assert_eq!(options.interruption_level, Some(InterruptionLevel::TimeSensitive));
        assert_eq!(options.attachments.len(), 1);
        assert_eq!(options.attachments[0].file_path, "/tmp/a.png");
    }

    #[test]
    fn unknown_interruption_level_is_malformed() {
        let err = NotificationRequest::from_value(&json!({
            "id": 3,
            "platformSpecifics": { "interruptionLevel": 9 }
        }))
        .unwrap_err();
        assert!(matches!(err, RequestError::Malformed(_)));
    }

    #[test]
    fn presentation_uses_defaults_without_options() {
        let defaults = PresentationFlags::new(true, false, true);
        assert_eq!(NotificationRequest::new(1).presentation(defaults), defaults);
    }

    #[test]
    fn present_sound_resolves_default_sound() {
        let request = NotificationRequest::from_value(&json!({
            "id": 1,
            "platformSpecifics": { "presentSound": true }
        }))
        .unwrap();
        let presentation = request.presentation(PresentationFlags::default());
        assert!(presentation.sound);
        assert_eq!(request.sound(presentation), Some(Sound::Default));
    }
}
