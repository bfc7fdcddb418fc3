//! Application layer - Use cases and port interfaces
//!
//! Contains the plugin facade, the capability router, the event relay and
//! the trait definitions for native notification systems.

pub mod error;
pub mod plugin;
pub mod ports;
pub mod relay;
pub mod router;

// Re-export use cases
pub use error::{ErrorEnvelope, PluginError};
pub use plugin::NotificationPlugin;
pub use relay::{relay_channel, EventRelay, RelayClosed, RelayHandle, RelayMessage};
pub use router::CapabilityRouter;
