//! local-notify - local notifications over capability-versioned backends
//!
//! This crate accepts notification method calls (show, schedule, cancel,
//! list, permissions), routes them to a modern or legacy native backend
//! chosen once from the OS version, and relays user interactions back to
//! the host as events.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Request model, trigger translation, capabilities and relay lifecycle
//! - **Application**: Plugin facade, capability router, event relay and port interfaces (traits)
//! - **Infrastructure**: Backend adapters, in-memory native centers, platform probes and
//!   config storage
//! - **CLI**: Command-line interface and the JSON-lines method channel

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
