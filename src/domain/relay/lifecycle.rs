//! Relay lifecycle state machine

use std::fmt;
use thiserror::Error;

use super::{Interaction, LaunchDetails, OutboundEvent};

/// Relay states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Initialized,
}

impl LifecycleState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: LifecycleState,
    pub action: String,
}

/// Relay lifecycle entity.
/// Decides whether an interaction is emitted now or held until the host is ready.
///
/// State machine:
///   UNINITIALIZED -> INITIALIZED (mark_initialized)
///
/// While uninitialized, a default tap is held in a single slot (a later tap
/// replaces an earlier one) and recorded as the launch reason. Action
/// interactions are never held.
#[derive(Debug, Default)]
pub struct RelayLifecycle {
    state: LifecycleState,
    pending: Option<OutboundEvent>,
    launch: LaunchDetails,
}

impl RelayLifecycle {
    /// Create a new lifecycle in uninitialized state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Check if initialization has completed
    pub fn is_initialized(&self) -> bool {
        self.state == LifecycleState::Initialized
    }

    /// Event held for delivery at initialization, if any
    pub fn pending(&self) -> Option<&OutboundEvent> {
        self.pending.as_ref()
    }

    /// Launch details as recorded so far
    pub fn launch_details(&self) -> LaunchDetails {
        self.launch.clone()
    }

    /// Accept an interaction. Returns the event to emit right away, if any.
    pub fn receive(&mut self, interaction: Interaction) -> Option<OutboundEvent> {
        match (&interaction, self.state) {
            (Interaction::Default { payload }, LifecycleState::Uninitialized) => {
                self.launch = LaunchDetails {
                    notification_launched_app: true,
                    payload: payload.clone(),
                };
                self.pending = Some(interaction.into());
                None
            }
            _ => Some(interaction.into()),
        }
    }

    /// Transition from UNINITIALIZED to INITIALIZED, handing back the held
    /// event so it is emitted exactly once. Launch details are sealed.
    pub fn mark_initialized(&mut self) -> Result<Option<OutboundEvent>, InvalidStateTransition> {
        if self.state != LifecycleState::Uninitialized {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: "initialize".to_string(),
            });
        }
        self.state = LifecycleState::Initialized;
        Ok(self.pending.take())
    }
}
