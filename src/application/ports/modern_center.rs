//! Modern (trigger-object) notification center port

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::native::CenterError;
use crate::domain::request::{ActionCategory, InterruptionLevel, PermissionRequest, Sound};
use crate::domain::schedule::ModernTrigger;

/// Action identifier the OS reports for a tap on the notification body
pub const DEFAULT_ACTION_IDENTIFIER: &str = "default";

/// An attachment whose file has been loaded by the center
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAttachment {
    pub identifier: String,
    pub url: PathBuf,
}

/// Content of a modern notification request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModernContent {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub body: Option<String>,
    pub sound: Option<Sound>,
    pub badge: Option<i64>,
    pub thread_identifier: Option<String>,
    pub category_identifier: Option<String>,
    pub interruption_level: Option<InterruptionLevel>,
    pub attachments: Vec<NativeAttachment>,
    pub user_info: Map<String, Value>,
}

/// A request handed to the modern center
#[derive(Debug, Clone, PartialEq)]
pub struct ModernRequest {
    pub identifier: String,
    pub content: ModernContent,
    /// `None` delivers right away
    pub trigger: Option<ModernTrigger>,
}

/// Response to an interaction with a modern notification
#[derive(Debug, Clone, PartialEq)]
pub struct NativeResponse {
    /// Identifier of the request the notification came from
    pub identifier: String,
    pub action_identifier: String,
    /// Present only for text-input actions
    pub user_text: Option<String>,
    pub user_info: Map<String, Value>,
}

/// Port for the modern notification center
#[async_trait]
pub trait ModernCenter: Send + Sync {
    /// Add a request. Replaces any pending request with the same identifier.
    async fn add(&self, request: ModernRequest) -> Result<(), CenterError>;

    /// Load an attachment file so it can be put on content
    async fn create_attachment(
        &self,
        identifier: &str,
        path: &str,
    ) -> Result<NativeAttachment, CenterError>;

    async fn remove_pending(&self, identifiers: &[String]);

    async fn remove_delivered(&self, identifiers: &[String]);

    async fn remove_all_pending(&self);

    async fn remove_all_delivered(&self);

    /// Requests waiting for their trigger, in center order
    async fn pending_requests(&self) -> Vec<ModernRequest>;

    /// Notifications currently shown, in center order
    async fn delivered_notifications(&self) -> Vec<ModernRequest>;

    /// Prompt for the given options.
    ///
    /// # Returns
    /// Whether the user granted authorization
    async fn request_authorization(&self, options: PermissionRequest)
        -> Result<bool, CenterError>;

    /// Currently registered categories
    async fn categories(&self) -> Vec<ActionCategory>;

    /// Replace the registered category set
    async fn set_categories(&self, categories: Vec<ActionCategory>);
}
