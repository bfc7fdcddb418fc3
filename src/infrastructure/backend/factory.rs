//! Backend factory with capability-based selection

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::ports::{
    ActivationType, CapabilityProbe, Clock, NativeCallback, NotificationBackend,
    DEFAULT_ACTION_IDENTIFIER,
};
use crate::domain::capability::{
    BackendKind, BackendPreference, Capabilities, OsVersion, MODERN_BACKEND_MIN_VERSION,
};
use crate::infrastructure::center::{InMemoryLegacyCenter, InMemoryModernCenter};

use super::legacy::LegacyBackend;
use super::modern::ModernBackend;

/// Errors selecting a backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendSelectionError {
    #[error("Modern backend requires OS version {required} or newer (found {found})")]
    ModernUnavailable { found: OsVersion, required: OsVersion },
}

/// Pick the backend kind for a preference on the probed OS
pub fn select_backend(
    preference: BackendPreference,
    capabilities: Capabilities,
) -> Result<BackendKind, BackendSelectionError> {
    match preference {
        BackendPreference::Auto => Ok(capabilities.backend),
        BackendPreference::Legacy => Ok(BackendKind::Legacy),
        BackendPreference::Modern => {
            if capabilities.supports_modern() {
                Ok(BackendKind::Modern)
            } else {
                Err(BackendSelectionError::ModernUnavailable {
                    found: capabilities.os_version,
                    required: MODERN_BACKEND_MIN_VERSION,
                })
            }
        }
    }
}

/// Native center behind the selected backend, kept so a host can drive it
#[derive(Clone)]
pub enum NativeCenter {
    Modern(Arc<InMemoryModernCenter>),
    Legacy(Arc<InMemoryLegacyCenter>),
}

impl NativeCenter {
    /// The callback the OS would send for a tap on notification `id`
    pub async fn tap(&self, id: i64) -> Option<NativeCallback> {
        let identifier = id.to_string();
        match self {
            Self::Modern(center) => center
                .response_for(&identifier, DEFAULT_ACTION_IDENTIFIER, None)
                .await
                .map(NativeCallback::Response),
            Self::Legacy(center) => center
                .activation_for(&identifier, ActivationType::ContentsClicked)
                .await
                .map(NativeCallback::Activation),
        }
    }

    /// The callback the OS would send for an action button on notification `id`
    pub async fn action(
        &self,
        id: i64,
        action_id: &str,
        input: Option<String>,
    ) -> Option<NativeCallback> {
        let identifier = id.to_string();
        match self {
            Self::Modern(center) => center
                .response_for(&identifier, action_id, input)
                .await
                .map(NativeCallback::Response),
            Self::Legacy(center) => {
                let activation_type = if input.is_some() {
                    ActivationType::Replied
                } else {
                    ActivationType::ActionButtonClicked
                };
                center
                    .activation_for(&identifier, activation_type)
                    .await
                    .map(NativeCallback::Activation)
            }
        }
    }

    /// Deliver whatever is due at the current clock time
    pub async fn deliver_due(&self) -> Vec<String> {
        match self {
            Self::Modern(center) => center.deliver_due().await,
            Self::Legacy(center) => center.deliver_due().await,
        }
    }
}

/// A backend chosen at startup together with what it was chosen for
pub struct SelectedBackend {
    pub backend: Arc<dyn NotificationBackend>,
    pub capabilities: Capabilities,
    pub center: NativeCenter,
}

/// Probe the OS once and build the backend for `preference`.
///
/// Returns an error if `modern` is forced on an OS below the threshold.
pub fn create_backend(
    preference: BackendPreference,
    probe: &dyn CapabilityProbe,
    clock: Arc<dyn Clock>,
) -> Result<SelectedBackend, BackendSelectionError> {
    let detected = Capabilities::detect(probe.os_version());
    let kind = select_backend(preference, detected)?;
    let capabilities = detected.with_backend(kind);
    info!(
        os_version = %capabilities.os_version,
        %preference,
        backend = %kind,
        interruption_level = capabilities.interruption_level,
        "Selected notification backend"
    );

    Ok(match kind {
        BackendKind::Modern => {
            let center = Arc::new(InMemoryModernCenter::new(clock));
            SelectedBackend {
                backend: Arc::new(ModernBackend::new(center.clone(), capabilities)),
                capabilities,
                center: NativeCenter::Modern(center),
            }
        }
        BackendKind::Legacy => {
            let center = Arc::new(InMemoryLegacyCenter::new(clock.clone()));
            SelectedBackend {
                backend: Arc::new(LegacyBackend::new(center.clone(), clock)),
                capabilities,
                center: NativeCenter::Legacy(center),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::{StaticProbe, SystemClock};

    fn caps(version: &str) -> Capabilities {
        Capabilities::detect(version.parse().unwrap())
    }

    #[test]
    fn auto_follows_threshold() {
        assert_eq!(
            select_backend(BackendPreference::Auto, caps("10.13")),
            Ok(BackendKind::Legacy)
        );
        assert_eq!(
            select_backend(BackendPreference::Auto, caps("10.14")),
            Ok(BackendKind::Modern)
        );
    }

    #[test]
    fn legacy_can_be_forced() {
        assert_eq!(
            select_backend(BackendPreference::Legacy, caps("14.0")),
            Ok(BackendKind::Legacy)
        );
    }

    #[test]
    fn modern_cannot_be_forced_on_old_os() {
        let err = select_backend(BackendPreference::Modern, caps("10.12")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Modern backend requires OS version 10.14 or newer (found 10.12)"
        );
    }

    #[test]
    fn create_backend_matches_selection() {
        let probe = StaticProbe::new(OsVersion::new(12, 1, 0));
        let selected =
            create_backend(BackendPreference::Auto, &probe, Arc::new(SystemClock)).unwrap();
        assert_eq!(selected.backend.kind(), BackendKind::Modern);
        assert!(selected.capabilities.interruption_level);
        assert!(matches!(selected.center, NativeCenter::Modern(_)));

        let forced =
            create_backend(BackendPreference::Legacy, &probe, Arc::new(SystemClock)).unwrap();
        assert_eq!(forced.backend.kind(), BackendKind::Legacy);
        assert_eq!(forced.capabilities.backend, BackendKind::Legacy);
    }
}
