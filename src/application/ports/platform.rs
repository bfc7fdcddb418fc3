//! Platform port interfaces

use chrono::{DateTime, Utc};

use crate::domain::capability::OsVersion;

/// Port for reading the running OS version
pub trait CapabilityProbe: Send + Sync {
    fn os_version(&self) -> OsVersion;
}

/// Port for the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
