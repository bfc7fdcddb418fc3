//! Domain layer - Core notification logic
//!
//! Contains value objects, the trigger translator, the relay state machine
//! and domain errors. This layer has no dependencies on external systems.

pub mod capability;
pub mod config;
pub mod error;
pub mod method;
pub mod relay;
pub mod request;
pub mod schedule;

// Re-export common types
pub use capability::{BackendKind, BackendPreference, Capabilities, OsVersion};
pub use config::AppConfig;
pub use error::*;
pub use method::Method;
pub use relay::{Interaction, LaunchDetails, OutboundEvent, RelayLifecycle};
pub use request::{NotificationRequest, PermissionRequest, PresentationFlags};
pub use schedule::{ScheduleIntent, ScheduledTime};
