//! App runners for serve and probe modes

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::application::ports::{Clock, ConfigStore};
use crate::application::{relay_channel, CapabilityRouter, NotificationPlugin};
use crate::domain::capability::{
    BackendPreference, Capabilities, OsVersion, MODERN_BACKEND_MIN_VERSION,
};
use crate::domain::config::AppConfig;
use crate::infrastructure::backend::select_backend;
use crate::infrastructure::{create_backend, StaticProbe, SystemClock, XdgConfigStore};

use super::args::HostOptions;
use super::host::{stdin_lines, write_lines, Host};
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment overrides
pub const ENV_BACKEND: &str = "LOCAL_NOTIFY_BACKEND";
pub const ENV_OS_VERSION: &str = "LOCAL_NOTIFY_OS_VERSION";

/// Serve method calls from stdin until EOF or Ctrl+C
pub async fn run_serve(options: HostOptions) -> ExitCode {
    let presenter = Presenter::new();

    let probe = StaticProbe::new(options.os_version);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let selected = match create_backend(options.preference, &probe, clock) {
        Ok(selected) => selected,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (responses_tx, responses_rx) = mpsc::unbounded_channel();
    let (relay, relay_handle) = relay_channel(events_tx);
    let relay_task = relay.spawn();
    let writer_task = tokio::spawn(write_lines(tokio::io::stdout(), events_rx, responses_rx));

    if !selected.capabilities.supports_modern() {
        presenter.warn(&format!(
            "OS version {} is below {}; serving with the legacy backend",
            selected.capabilities.os_version, MODERN_BACKEND_MIN_VERSION
        ));
    }

    let router = CapabilityRouter::new(selected.backend, selected.capabilities);
    let host = Host::new(NotificationPlugin::new(router, relay_handle), selected.center);
    info!(backend = %host.plugin().backend_kind(), "Serving method calls on stdin");

    let mut exit_code = EXIT_SUCCESS;
    let mut lines = stdin_lines();

    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let response = host.handle_line(&line).await;
                    if responses_tx.send(response).is_err() {
                        presenter.error("Output channel closed");
                        exit_code = EXIT_ERROR;
                        break;
                    }
                }
                None => {
                    debug!("Reached end of input");
                    break;
                }
                Some(Err(e)) => {
                    presenter.error(&format!("Failed to read input: {}", e));
                    exit_code = EXIT_ERROR;
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    // Dropping the host closes the relay, which closes the event channel.
    drop(host);
    drop(responses_tx);
    let _ = relay_task.await;

    match writer_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            presenter.error(&format!("Failed to write output: {}", e));
            exit_code = EXIT_ERROR;
        }
        Err(e) => {
            presenter.error(&format!("Writer task failed: {}", e));
            exit_code = EXIT_ERROR;
        }
    }

    ExitCode::from(exit_code)
}

/// Print the probed capabilities and the backend the preference selects
pub fn run_probe(options: HostOptions) -> ExitCode {
    let presenter = Presenter::new();
    let capabilities = Capabilities::detect(options.os_version);

    presenter.key_value("os_version", &capabilities.os_version.to_string());
    presenter.key_value("preference", &options.preference.to_string());
    presenter.key_value(
        "interruption_level",
        if capabilities.interruption_level {
            "supported"
        } else {
            "unsupported"
        },
    );

    match select_backend(options.preference, capabilities) {
        Ok(kind) => {
            presenter.key_value("backend", kind.as_str());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_USAGE_ERROR)
        }
    }
}

/// Resolve typed host options from merged configuration
pub fn resolve_options(config: &AppConfig) -> Result<HostOptions, String> {
    let preference = match config.backend.as_deref() {
        Some(raw) => raw
            .parse::<BackendPreference>()
            .map_err(|e| format!("Invalid backend: {}", e))?,
        None => config.backend_or_default(),
    };
    let os_version = match config.os_version.as_deref() {
        Some(raw) => raw
            .parse::<OsVersion>()
            .map_err(|e| format!("Invalid os-version: {}", e))?,
        None => config.os_version_or_default(),
    };

    Ok(HostOptions {
        preference,
        os_version,
    })
}

/// Install the stderr log subscriber.
///
/// An explicit `--log-level` wins over `RUST_LOG`, which wins over the
/// configured level.
pub fn init_logging(cli_level: Option<&str>, configured_level: &str) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(configured_level)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    let env_config = AppConfig {
        backend: env::var(ENV_BACKEND).ok().filter(|s| !s.is_empty()),
        os_version: env::var(ENV_OS_VERSION).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(backend: &str, os_version: &str) -> AppConfig {
        AppConfig {
            backend: Some(backend.into()),
            os_version: Some(os_version.into()),
            log_level: None,
        }
    }

    #[test]
    fn resolve_defaults() {
        let options = resolve_options(&AppConfig::defaults()).unwrap();
        assert_eq!(options.preference, BackendPreference::Auto);
        assert_eq!(options.os_version, OsVersion::new(14, 0, 0));
    }

    #[test]
    fn resolve_explicit_values() {
        let options = resolve_options(&config("Legacy", "10.13")).unwrap();
        assert_eq!(options.preference, BackendPreference::Legacy);
        assert_eq!(options.os_version, OsVersion::new(10, 13, 0));
    }

    #[test]
    fn resolve_rejects_bad_backend() {
        let err = resolve_options(&config("fancy", "14.0")).unwrap_err();
        assert!(err.starts_with("Invalid backend"));
    }

    #[test]
    fn resolve_rejects_bad_os_version() {
        let err = resolve_options(&config("auto", "ten")).unwrap_err();
        assert!(err.starts_with("Invalid os-version"));
    }
}
