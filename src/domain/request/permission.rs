//! Permission and initialization arguments

use serde::Deserialize;

use super::{ActionCategory, PresentationFlags};

/// Which kinds of authorization to ask the OS for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct PermissionRequest {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
    pub critical: bool,
}

impl PermissionRequest {
    pub const fn new(alert: bool, sound: bool, badge: bool, critical: bool) -> Self {
        Self {
            alert,
            sound,
            badge,
            critical,
        }
    }

    /// True when no permission at all is being requested
    pub const fn is_empty(&self) -> bool {
        !self.alert && !self.sound && !self.badge && !self.critical
    }
}

/// Arguments of the `initialize` call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeArgs {
    pub default_present_alert: bool,
    pub default_present_sound: bool,
    pub default_present_badge: bool,
    pub request_alert_permission: bool,
    pub request_sound_permission: bool,
    pub request_badge_permission: bool,
    pub request_critical_permission: bool,
    #[serde(default)]
    pub notification_categories: Option<Vec<ActionCategory>>,
}

impl InitializeArgs {
    /// Process-wide presentation defaults
    pub fn presentation_defaults(&self) -> PresentationFlags {
        PresentationFlags::new(
            self.default_present_alert,
            self.default_present_sound,
            self.default_present_badge,
        )
    }

    /// Permissions to request during initialization
    pub fn permissions(&self) -> PermissionRequest {
        PermissionRequest::new(
            self.request_alert_permission,
            self.request_sound_permission,
            self.request_badge_permission,
            self.request_critical_permission,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::RequestError;
    use crate::domain::request::parse_arguments;
    use serde_json::json;

    #[test]
    fn empty_permission_request() {
        assert!(PermissionRequest::default().is_empty());
        assert!(!PermissionRequest::new(false, false, false, true).is_empty());
    }

    #[test]
    fn parses_initialize_arguments() {
        let args: InitializeArgs = parse_arguments(&json!({
            "defaultPresentAlert": true,
            "defaultPresentSound": false,
            "defaultPresentBadge": true,
            "requestAlertPermission": true,
            "requestSoundPermission": false,
            "requestBadgePermission": false,
            "requestCriticalPermission": false
        }))
        .unwrap();

        assert_eq!(
            args.presentation_defaults(),
            PresentationFlags::new(true, false, true)
        );
        assert_eq!(
            args.permissions(),
            PermissionRequest::new(true, false, false, false)
        );
        assert!(args.notification_categories.is_none());
    }

    #[test]
    fn missing_default_flag_is_malformed() {
        let result: Result<InitializeArgs, RequestError> = parse_arguments(&json!({
            "defaultPresentAlert": true
        }));
        assert!(matches!(result, Err(RequestError::Malformed(_))));
    }
}
