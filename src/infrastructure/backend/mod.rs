//! Notification backend adapters
//!
//! One adapter per native surface, chosen once at startup by the factory.

mod factory;
mod legacy;
mod modern;

pub use factory::{
    create_backend, select_backend, BackendSelectionError, NativeCenter, SelectedBackend,
};
pub use legacy::LegacyBackend;
pub use modern::ModernBackend;
