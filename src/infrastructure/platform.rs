//! Clock and capability probe adapters

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::application::ports::{CapabilityProbe, Clock};
use crate::domain::capability::OsVersion;

/// Wall clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|p| p.into_inner()) = to;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|p| p.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Probe reporting a configured OS version
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe {
    version: OsVersion,
}

impl StaticProbe {
    pub fn new(version: OsVersion) -> Self {
        Self { version }
    }
}

impl CapabilityProbe for StaticProbe {
    fn os_version(&self) -> OsVersion {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_moves_on_request() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::hours(1));
        assert_eq!(clock.now(), start + Duration::hours(1));

        clock.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn static_probe_reports_version() {
        let probe = StaticProbe::new(OsVersion::new(10, 13, 0));
        assert_eq!(probe.os_version(), OsVersion::new(10, 13, 0));
    }
}
