//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::capability::{BackendPreference, OsVersion};

/// OS version reported by the static probe when nothing else is configured
pub const DEFAULT_OS_VERSION: OsVersion = OsVersion::new(14, 0, 0);

/// Log filter used when neither config nor `RUST_LOG` sets one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: Option<String>,
    pub os_version: Option<String>,
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            backend: Some(BackendPreference::default().to_string()),
            os_version: Some(DEFAULT_OS_VERSION.to_string()),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            backend: other.backend.or(self.backend),
            os_version: other.os_version.or(self.os_version),
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// Get backend as parsed preference, or auto if not set/invalid
    pub fn backend_or_default(&self) -> BackendPreference {
        self.backend
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get os_version as parsed version, or the default if not set/invalid
    pub fn os_version_or_default(&self) -> OsVersion {
        self.os_version
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_OS_VERSION)
    }

    /// Get log level filter, or "warn" if not set
    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
