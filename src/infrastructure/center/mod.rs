//! Native notification center adapters
//!
//! In-memory centers that behave like the OS surfaces: they hold pending and
//! delivered notifications and can synthesize user interactions.

mod memory_legacy;
mod memory_modern;

pub use memory_legacy::InMemoryLegacyCenter;
pub use memory_modern::InMemoryModernCenter;
