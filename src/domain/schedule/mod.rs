//! Scheduling intents
//!
//! The four timing shapes a request can ask for, parsed and validated before
//! any backend sees them.

mod trigger;

pub use trigger::{
    resolve_local, to_legacy, to_modern, translate, BackendTrigger, CalendarTrigger, DateMatch,
    IntervalTrigger, LegacyRepeat, LegacySchedule, ModernTrigger,
};

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::error::RequestError;
use crate::domain::request::parse_arguments;

/// Wire format of `scheduledDateTime`
pub const SCHEDULED_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Which calendar components a recurring schedule matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum MatchGranularity {
    TimeOfDay,
    DayOfWeekAndTimeOfDay,
}

impl TryFrom<u8> for MatchGranularity {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::TimeOfDay),
            1 => Ok(Self::DayOfWeekAndTimeOfDay),
            other => Err(format!("unknown matchDateTimeComponents value {}", other)),
        }
    }
}

/// Fixed repeat intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum RepeatUnit {
    EveryMinute,
    Hourly,
    Daily,
    Weekly,
}

impl RepeatUnit {
    /// Length of one interval in seconds
    pub const fn seconds(&self) -> i64 {
        match self {
            Self::EveryMinute => 60,
            Self::Hourly => 60 * 60,
            Self::Daily => 60 * 60 * 24,
            Self::Weekly => 60 * 60 * 24 * 7,
        }
    }
}

impl TryFrom<u8> for RepeatUnit {
    type Error = String;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::EveryMinute),
            1 => Ok(Self::Hourly),
            2 => Ok(Self::Daily),
            3 => Ok(Self::Weekly),
            other => Err(format!("unknown repeatInterval value {}", other)),
        }
    }
}

/// A wall-clock time in a named zone, validated to map onto a real instant.
///
/// Local times inside a DST gap resolve to the first valid instant after the
/// gap; ambiguous local times resolve to the earlier instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTime {
    zone: Tz,
    instant: DateTime<Utc>,
}

impl ScheduledTime {
    pub fn new(local: NaiveDateTime, zone: Tz) -> Result<Self, RequestError> {
        let instant = resolve_local(&zone, local).ok_or_else(|| {
            RequestError::invalid_timestamp(
                local.format(SCHEDULED_DATE_TIME_FORMAT).to_string(),
                format!("does not exist in time zone {}", zone.name()),
            )
        })?;
        Ok(Self { zone, instant })
    }

    /// Parse the wire representation: `yyyy-MM-dd'T'HH:mm:ss` plus an IANA zone name
    pub fn parse(scheduled_date_time: &str, time_zone_name: &str) -> Result<Self, RequestError> {
        let local = NaiveDateTime::parse_from_str(scheduled_date_time, SCHEDULED_DATE_TIME_FORMAT)
            .map_err(|e| RequestError::invalid_timestamp(scheduled_date_time, e.to_string()))?;
        let zone: Tz = time_zone_name.parse().map_err(|_| {
            RequestError::invalid_timestamp(
                time_zone_name,
                "unknown time zone name".to_string(),
            )
        })?;
        Self::new(local, zone)
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// The absolute instant
    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The instant as wall-clock time in its zone
    pub fn local(&self) -> DateTime<Tz> {
        self.instant.with_timezone(&self.zone)
    }
}

/// When a notification should fire. Exactly one shape per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleIntent {
    Immediate,
    OneShotAt(ScheduledTime),
    RepeatingCalendar(ScheduledTime, MatchGranularity),
    RepeatingInterval(RepeatUnit),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZonedArgs {
    scheduled_date_time: String,
    time_zone_name: String,
    match_date_time_components: Option<MatchGranularity>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PeriodicArgs {
    repeat_interval: RepeatUnit,
}

impl ScheduleIntent {
    /// Parse the timing part of `zonedSchedule` arguments
    pub fn zoned_from_value(arguments: &Value) -> Result<Self, RequestError> {
        let args: ZonedArgs = parse_arguments(arguments)?;
        let time = ScheduledTime::parse(&args.scheduled_date_time, &args.time_zone_name)?;
        Ok(match args.match_date_time_components {
            Some(granularity) => Self::RepeatingCalendar(time, granularity),
            None => Self::OneShotAt(time),
        })
    }

    /// Parse the timing part of `periodicallyShow` arguments
    pub fn periodic_from_value(arguments: &Value) -> Result<Self, RequestError> {
        let args: PeriodicArgs = parse_arguments(arguments)?;
        Ok(Self::RepeatingInterval(args.repeat_interval))
    }

    /// Whether the schedule fires more than once
    pub fn repeats(&self) -> bool {
        matches!(
            self,
            Self::RepeatingCalendar(..) | Self::RepeatingInterval(_)
        )
    }
}
