//! Trigger translator
//!
//! Maps a [`ScheduleIntent`] onto the trigger representation each backend
//! understands. Translation is pure: the only time input is the `now` passed
//! in by the caller.
//!
//! Each trigger can compute its next fire time, which is what the OS would do
//! with it. The two backends disagree on repeating intervals across DST
//! transitions (fixed duration vs. fixed wall-clock time) and that difference
//! is kept as-is.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
    Weekday,
};
use chrono_tz::Tz;

use super::{MatchGranularity, RepeatUnit, ScheduleIntent};
use crate::domain::capability::BackendKind;

/// How far ahead a calendar match is searched (covers a Feb 29 match)
const SEARCH_HORIZON_DAYS: i64 = 366 * 4 + 1;

/// Longest DST gap we step through when resolving a local time
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Map a wall-clock time in `zone` to an instant.
///
/// Ambiguous times (DST fall-back) pick the earlier instant. Times inside a
/// gap (DST spring-forward) move to the first valid minute after the gap.
pub fn resolve_local(zone: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    if let Some(resolved) = zone.from_local_datetime(&local).earliest() {
        return Some(resolved.with_timezone(&Utc));
    }

    let start = local.with_second(0)?.with_nanosecond(0)?;
    (1..=MAX_GAP_MINUTES).find_map(|minutes| {
        zone.from_local_datetime(&(start + Duration::minutes(minutes)))
            .earliest()
            .map(|resolved| resolved.with_timezone(&Utc))
    })
}

/// Calendar components a modern calendar trigger matches on.
/// `None` means "any value"; unset time components count as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateMatch {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub weekday: Option<Weekday>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
}

impl DateMatch {
    /// Full date and time
    pub fn date_time<T: Datelike + Timelike>(at: &T) -> Self {
        Self {
            year: Some(at.year()),
            month: Some(at.month()),
            day: Some(at.day()),
            ..Self::time(at)
        }
    }

    /// Time of day only
    pub fn time<T: Timelike>(at: &T) -> Self {
        Self {
            hour: Some(at.hour()),
            minute: Some(at.minute()),
            second: Some(at.second()),
            ..Self::default()
        }
    }

    /// Day of week and time of day
    pub fn weekday_time<T: Datelike + Timelike>(at: &T) -> Self {
        Self {
            weekday: Some(at.weekday()),
            ..Self::time(at)
        }
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        self.year.map_or(true, |y| date.year() == y)
            && self.month.map_or(true, |m| date.month() == m)
            && self.day.map_or(true, |d| date.day() == d)
            && self.weekday.map_or(true, |w| date.weekday() == w)
    }

    fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(
            self.hour.unwrap_or(0),
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
        )
    }
}

/// Modern trigger firing when the wall clock in a zone matches some components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarTrigger {
    pub components: DateMatch,
    pub time_zone: Tz,
    pub repeats: bool,
}

impl CalendarTrigger {
    /// First matching instant strictly after `after`
    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let time = self.components.time_of_day()?;
        let start = after.with_timezone(&self.time_zone).date_naive();

        if let (Some(y), Some(m), Some(d)) = (
            self.components.year,
            self.components.month,
            self.components.day,
        ) {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            if !self.components.matches_date(date) {
                return None;
            }
            return resolve_local(&self.time_zone, date.and_time(time)).filter(|t| *t > after);
        }

        (-1..=SEARCH_HORIZON_DAYS)
            .filter_map(|offset| start.checked_add_signed(Duration::days(offset)))
            .filter(|date| self.components.matches_date(*date))
            .filter_map(|date| resolve_local(&self.time_zone, date.and_time(time)))
            .find(|candidate| *candidate > after)
    }
}

/// Modern trigger firing a fixed duration after it was registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTrigger {
    pub seconds: i64,
    pub repeats: bool,
}

impl IntervalTrigger {
    /// Next fire strictly after `after` for a trigger registered at `anchor`
    pub fn next_fire_after(
        &self,
        anchor: DateTime<Utc>,
        after: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        next_fixed_step(anchor + Duration::seconds(self.seconds), self.seconds, self.repeats, after)
    }
}

/// Trigger value of the modern backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModernTrigger {
    Calendar(CalendarTrigger),
    Interval(IntervalTrigger),
}

impl ModernTrigger {
    pub fn repeats(&self) -> bool {
        match self {
            Self::Calendar(t) => t.repeats,
            Self::Interval(t) => t.repeats,
        }
    }

    /// Next fire strictly after `after`; `anchor` is when the request was added
    pub fn next_fire_after(
        &self,
        anchor: DateTime<Utc>,
        after: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self {
            Self::Calendar(t) => t.next_fire_after(after),
            Self::Interval(t) => t.next_fire_after(anchor, after),
        }
    }
}

/// Repeat field of a legacy notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyRepeat {
    Minute,
    Hour,
    Day,
    Week,
}

impl From<RepeatUnit> for LegacyRepeat {
    fn from(unit: RepeatUnit) -> Self {
        match unit {
            RepeatUnit::EveryMinute => Self::Minute,
            RepeatUnit::Hourly => Self::Hour,
            RepeatUnit::Daily => Self::Day,
            RepeatUnit::Weekly => Self::Week,
        }
    }
}

/// Delivery fields of a legacy notification.
///
/// Minute and hour repeats advance by a fixed duration; day and week repeats
/// keep the wall-clock time in the delivery zone (UTC when none is set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySchedule {
    pub delivery_date: DateTime<Utc>,
    pub time_zone: Option<Tz>,
    pub repeat: Option<LegacyRepeat>,
}

impl LegacySchedule {
    /// Next fire strictly after `after`
    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.delivery_date > after {
            return Some(self.delivery_date);
        }
        match self.repeat? {
            LegacyRepeat::Minute => next_fixed_step(self.delivery_date, 60, true, after),
            LegacyRepeat::Hour => next_fixed_step(self.delivery_date, 3_600, true, after),
            LegacyRepeat::Day => self.next_wall_clock_step(1, after),
            LegacyRepeat::Week => self.next_wall_clock_step(7, after),
        }
    }

    fn next_wall_clock_step(&self, step_days: i64, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let zone = self.time_zone.unwrap_or(Tz::UTC);
        let local = self.delivery_date.with_timezone(&zone).naive_local();
        let mut step = ((after - self.delivery_date).num_days() / step_days).max(1);
        loop {
            let candidate =
                resolve_local(&zone, local.checked_add_signed(Duration::days(step * step_days))?)?;
            if candidate > after {
                return Some(candidate);
            }
            step += 1;
        }
    }
}

fn next_fixed_step(
    first: DateTime<Utc>,
    step_seconds: i64,
    repeats: bool,
    after: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if first > after {
        return Some(first);
    }
    if !repeats || step_seconds <= 0 {
        return None;
    }
    let steps = (after - first).num_seconds() / step_seconds + 1;
    Some(first + Duration::seconds(steps * step_seconds))
}

/// Backend-specific result of translating an intent. `None` means deliver now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendTrigger {
    Modern(Option<ModernTrigger>),
    Legacy(Option<LegacySchedule>),
}

impl BackendTrigger {
    /// Next fire strictly after `after` for a request added at `anchor`.
    /// Immediate delivery fires at `anchor` itself.
    pub fn next_fire_after(
        &self,
        anchor: DateTime<Utc>,
        after: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        match self {
            Self::Modern(Some(trigger)) => trigger.next_fire_after(anchor, after),
            Self::Legacy(Some(schedule)) => schedule.next_fire_after(after),
            Self::Modern(None) | Self::Legacy(None) => Some(anchor).filter(|t| *t > after),
        }
    }
}

/// Translate for the modern backend
pub fn to_modern(intent: &ScheduleIntent) -> Option<ModernTrigger> {
    match intent {
        ScheduleIntent::Immediate => None,
        ScheduleIntent::OneShotAt(time) => Some(ModernTrigger::Calendar(CalendarTrigger {
            components: DateMatch::date_time(&time.local()),
            time_zone: time.zone(),
            repeats: false,
        })),
        ScheduleIntent::RepeatingCalendar(time, granularity) => {
            let local = time.local();
            let components = match granularity {
                MatchGranularity::TimeOfDay => DateMatch::time(&local),
                MatchGranularity::DayOfWeekAndTimeOfDay => DateMatch::weekday_time(&local),
            };
            Some(ModernTrigger::Calendar(CalendarTrigger {
                components,
                time_zone: time.zone(),
                repeats: true,
            }))
        }
        ScheduleIntent::RepeatingInterval(unit) => Some(ModernTrigger::Interval(IntervalTrigger {
            seconds: unit.seconds(),
            repeats: true,
        })),
    }
}

/// Translate for the legacy backend
pub fn to_legacy(intent: &ScheduleIntent, now: DateTime<Utc>) -> Option<LegacySchedule> {
    match intent {
        ScheduleIntent::Immediate => None,
        ScheduleIntent::OneShotAt(time) => Some(LegacySchedule {
            delivery_date: time.instant(),
            time_zone: Some(time.zone()),
            repeat: None,
        }),
        ScheduleIntent::RepeatingCalendar(time, granularity) => Some(LegacySchedule {
            delivery_date: time.instant(),
            time_zone: Some(time.zone()),
            repeat: Some(match granularity {
                MatchGranularity::TimeOfDay => LegacyRepeat::Day,
                MatchGranularity::DayOfWeekAndTimeOfDay => LegacyRepeat::Week,
            }),
        }),
        ScheduleIntent::RepeatingInterval(unit) => Some(LegacySchedule {
            delivery_date: now + Duration::seconds(unit.seconds()),
            time_zone: None,
            repeat: Some(LegacyRepeat::from(*unit)),
        }),
    }
}

/// Translate for whichever backend is active
pub fn translate(
    intent: &ScheduleIntent,
    backend: BackendKind,
    now: DateTime<Utc>,
) -> BackendTrigger {
    match backend {
        BackendKind::Modern => BackendTrigger::Modern(to_modern(intent)),
        BackendKind::Legacy => BackendTrigger::Legacy(to_legacy(intent, now)),
    }
}
