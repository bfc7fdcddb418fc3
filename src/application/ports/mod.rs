//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod backend;
pub mod config;
pub mod legacy_center;
pub mod modern_center;
pub mod native;
pub mod platform;

// Re-export common types
pub use backend::{parse_identifier, BackendError, NotificationBackend, PendingNotification};
pub use config::ConfigStore;
pub use legacy_center::{ActivationType, LegacyActivation, LegacyCenter, LegacyNotification};
pub use modern_center::{
    ModernCenter, ModernContent, ModernRequest, NativeAttachment, NativeResponse,
    DEFAULT_ACTION_IDENTIFIER,
};
pub use native::{CenterError, NativeCallback};
pub use platform::{CapabilityProbe, Clock};
