//! OS capability thresholds and backend selection values

use std::fmt;
use std::str::FromStr;

use crate::domain::error::OsVersionParseError;

/// First OS version with the trigger-object notification API
pub const MODERN_BACKEND_MIN_VERSION: OsVersion = OsVersion::new(10, 14, 0);

/// First OS version honoring notification interruption levels
pub const INTERRUPTION_LEVEL_MIN_VERSION: OsVersion = OsVersion::new(12, 0, 0);

/// Operating system version as reported by the capability probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OsVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl OsVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for OsVersion {
    type Err = OsVersionParseError;

    /// Parse "14", "10.13" or "12.0.1"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || OsVersionParseError {
            input: s.to_string(),
        };
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(err());
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| err())?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patch == 0 {
            write!(f, "{}.{}", self.major, self.minor)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

/// Which native notification surface serves requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Trigger-object API
    Modern,
    /// Field-mutation API
    Legacy,
}

impl BackendKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preference for backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Pick by OS version (default)
    #[default]
    Auto,
    /// Require the modern backend
    Modern,
    /// Force the legacy backend even when modern is available
    Legacy,
}

/// Valid backend preference values
pub const VALID_BACKEND_PREFERENCES: &[&str] = &["auto", "modern", "legacy"];

impl fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Modern => write!(f, "modern"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

/// Error type for parsing a backend preference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid backend '{value}'. Valid options: auto, modern, legacy")]
pub struct ParseBackendPreferenceError {
    pub value: String,
}

impl FromStr for BackendPreference {
    type Err = ParseBackendPreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "modern" => Ok(Self::Modern),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ParseBackendPreferenceError {
                value: s.to_string(),
            }),
        }
    }
}

/// What the running OS supports, derived once from its version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub os_version: OsVersion,
    pub backend: BackendKind,
    pub interruption_level: bool,
}

impl Capabilities {
    /// Capabilities offered by an OS version
    pub fn detect(os_version: OsVersion) -> Self {
        let backend = if os_version >= MODERN_BACKEND_MIN_VERSION {
            BackendKind::Modern
        } else {
            BackendKind::Legacy
        };
        Self {
            os_version,
            backend,
            interruption_level: os_version >= INTERRUPTION_LEVEL_MIN_VERSION,
        }
    }

    /// Whether the modern backend can run here
    pub fn supports_modern(&self) -> bool {
        self.os_version >= MODERN_BACKEND_MIN_VERSION
    }

    /// Same OS, but served by the given backend
    pub fn with_backend(self, backend: BackendKind) -> Self {
        Self { backend, ..self }
    }
}
