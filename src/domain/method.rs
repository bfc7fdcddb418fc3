//! Host method names

use std::fmt;
use std::str::FromStr;

/// A method the host may call on the plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Initialize,
    RequestPermissions,
    GetLaunchDetails,
    Show,
    ZonedSchedule,
    PeriodicallyShow,
    Cancel,
    CancelAll,
    PendingNotificationRequests,
    GetActiveNotifications,
}

impl Method {
    pub const ALL: [Method; 10] = [
        Self::Initialize,
        Self::RequestPermissions,
        Self::GetLaunchDetails,
        Self::Show,
        Self::ZonedSchedule,
        Self::PeriodicallyShow,
        Self::Cancel,
        Self::CancelAll,
        Self::PendingNotificationRequests,
        Self::GetActiveNotifications,
    ];

    /// Wire name of the method
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::RequestPermissions => "requestPermissions",
            Self::GetLaunchDetails => "getNotificationAppLaunchDetails",
            Self::Show => "show",
            Self::ZonedSchedule => "zonedSchedule",
            Self::PeriodicallyShow => "periodicallyShow",
            Self::Cancel => "cancel",
            Self::CancelAll => "cancelAll",
            Self::PendingNotificationRequests => "pendingNotificationRequests",
            Self::GetActiveNotifications => "getActiveNotifications",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when a method name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Method not implemented: {name}")]
pub struct UnknownMethod {
    pub name: String,
}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownMethod {
                name: s.to_string(),
            })
    }
}
