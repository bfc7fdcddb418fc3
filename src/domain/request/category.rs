//! Action categories registered before notifications may reference them

use serde::Deserialize;

use super::null_as_default;

/// Behavior options of a single action button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum ActionOption {
    AuthenticationRequired,
    Destructive,
    Foreground,
}

impl TryFrom<u8> for ActionOption {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::AuthenticationRequired),
            1 => Ok(Self::Destructive),
            2 => Ok(Self::Foreground),
            other => Err(format!("unknown action option {}", other)),
        }
    }
}

/// Behavior options of a whole category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum CategoryOption {
    CustomDismissAction,
    AllowInCarPlay,
    HiddenPreviewsShowTitle,
    HiddenPreviewsShowSubtitle,
    AllowAnnouncement,
}

impl TryFrom<u8> for CategoryOption {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::CustomDismissAction),
            1 => Ok(Self::AllowInCarPlay),
            2 => Ok(Self::HiddenPreviewsShowTitle),
            3 => Ok(Self::HiddenPreviewsShowSubtitle),
            4 => Ok(Self::AllowAnnouncement),
            other => Err(format!("unknown category option {}", other)),
        }
    }
}

/// A button shown on a notification of some category
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    Plain {
        identifier: String,
        title: String,
        #[serde(default, deserialize_with = "null_as_default")]
        options: Vec<ActionOption>,
        #[serde(default, deserialize_with = "null_as_default")]
        cancel_notification: bool,
    },
    #[serde(rename = "text", rename_all = "camelCase")]
    TextInput {
        identifier: String,
        title: String,
        #[serde(default, deserialize_with = "null_as_default")]
        options: Vec<ActionOption>,
        #[serde(default, deserialize_with = "null_as_default")]
        cancel_notification: bool,
        button_title: String,
        placeholder: String,
    },
}

impl Action {
    pub fn identifier(&self) -> &str {
        match self {
            Self::Plain { identifier, .. } | Self::TextInput { identifier, .. } => identifier,
        }
    }

    /// Whether choosing this action removes the notification it was shown on
    pub fn cancels_notification(&self) -> bool {
        match self {
            Self::Plain {
                cancel_notification,
                ..
            }
            | Self::TextInput {
                cancel_notification,
                ..
            } => *cancel_notification,
        }
    }
}

/// A named group of actions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCategory {
    pub identifier: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<Action>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<CategoryOption>,
}

impl ActionCategory {
    pub fn action(&self, identifier: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.identifier() == identifier)
    }

    /// Collapse a list into a set unique by identifier.
    ///
    /// A later category replaces an earlier one with the same identifier,
    /// keeping the position of the first occurrence.
    pub fn dedup(categories: &[ActionCategory]) -> Vec<ActionCategory> {
        let mut unique: Vec<ActionCategory> = Vec::with_capacity(categories.len());
        for category in categories {
            match unique
                .iter_mut()
                .find(|c| c.identifier == category.identifier)
            {
                Some(existing) => *existing = category.clone(),
                None => unique.push(category.clone()),
            }
        }
        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::parse_arguments;
    use serde_json::json;

    #[test]
    fn parses_plain_and_text_actions() {
        let category: ActionCategory = parse_arguments(&json!({
            "identifier": "reply",
            "actions": [
                { "type": "plain", "identifier": "ok", "title": "OK", "options": [2] },
                {
                    "type": "text",
                    "identifier": "answer",
                    "title": "Answer",
                    "options": [],
                    "buttonTitle": "Send",
                    "placeholder": "Type here"
                }
            ],
            "options": [0]
        }))
        .unwrap();

        assert_eq!(category.actions.len(), 2);
        assert_eq!(
            category.actions[0],
            Action::Plain {
                identifier: "ok".into(),
                title: "OK".into(),
                options: vec![ActionOption::Foreground],
                cancel_notification: false,
            }
        );
        assert!(matches!(
            &category.actions[1],
            Action::TextInput { button_title, placeholder, .. }
                if button_title == "Send" && placeholder == "Type here"
        ));
        assert_eq!(category.options, vec![CategoryOption::CustomDismissAction]);
    }

    #[test]
    fn cancel_notification_flag_is_read_per_action() {
        let category: ActionCategory = parse_arguments(&json!({
            "identifier": "inbox",
            "actions": [
                {
                    "type": "plain",
                    "identifier": "archive",
                    "title": "Archive",
                    "cancelNotification": true
                },
                {
                    "type": "plain",
                    "identifier": "open",
                    "title": "Open",
                    "cancelNotification": null
                }
            ]
        }))
        .unwrap();

        assert!(category.action("archive").unwrap().cancels_notification());
        assert!(!category.action("open").unwrap().cancels_notification());
        assert!(category.action("missing").is_none());
    }

    #[test]
    fn unknown_action_type_is_rejected() {
        let result: Result<ActionCategory, _> = parse_arguments(&json!({
            "identifier": "c",
            "actions": [{ "type": "slider", "identifier": "x", "title": "X" }]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn dedup_keeps_last_definition() {
        let first = ActionCategory {
            identifier: "a".into(),
            actions: vec![],
            options: vec![],
        };
        let other = ActionCategory {
            identifier: "b".into(),
            actions: vec![],
            options: vec![],
        };
        let replacement = ActionCategory {
            identifier: "a".into(),
            actions: vec![],
            options: vec![CategoryOption::AllowAnnouncement],
        };

        let unique = ActionCategory::dedup(&[first, other, replacement.clone()]);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0], replacement);
        assert_eq!(unique[1].identifier, "b");
    }
}
