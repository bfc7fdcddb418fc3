//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, the stdio method
//! channel and the app runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod host;
pub mod presenter;

// Re-export commonly used types
pub use app::{run_probe, run_serve, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, HostOptions};
pub use host::Host;
pub use presenter::Presenter;
