//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces: the two
//! backend adapters, in-memory native centers, platform probes and
//! config storage.

pub mod backend;
pub mod center;
pub mod config;
pub mod platform;

// Re-export adapters
pub use backend::{create_backend, LegacyBackend, ModernBackend, NativeCenter, SelectedBackend};
pub use center::{InMemoryLegacyCenter, InMemoryModernCenter};
pub use config::XdgConfigStore;
pub use platform::{ManualClock, StaticProbe, SystemClock};
