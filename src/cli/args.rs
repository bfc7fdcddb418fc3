//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::capability::{BackendPreference, OsVersion};

/// local-notify - local notification host with capability-versioned backends
#[derive(Parser, Debug)]
#[command(name = "local-notify")]
#[command(version)]
#[command(about = "Show and schedule local notifications over a JSON-lines method channel")]
#[command(long_about = None)]
pub struct Cli {
    /// Backend selection
    #[arg(short = 'b', long, value_name = "BACKEND")]
    pub backend: Option<BackendArg>,

    /// OS version reported by the capability probe (e.g., 10.13, 14.2)
    #[arg(long, value_name = "VERSION")]
    pub os_version: Option<String>,

    /// Log filter written to stderr (e.g., warn, debug, local_notify=trace)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve method calls from stdin (default)
    Serve,
    /// Show the probed OS version and the backend that would serve requests
    Probe,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Backend argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Auto,
    Modern,
    Legacy,
}

impl From<BackendArg> for BackendPreference {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => BackendPreference::Auto,
            BackendArg::Modern => BackendPreference::Modern,
            BackendArg::Legacy => BackendPreference::Legacy,
        }
    }
}

/// Parsed options for `serve` and `probe`
#[derive(Debug, Clone, Copy)]
pub struct HostOptions {
    pub preference: BackendPreference,
    pub os_version: OsVersion,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["backend", "os_version", "log_level"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["local-notify"]);
        assert!(cli.backend.is_none());
        assert!(cli.os_version.is_none());
        assert!(cli.log_level.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_backend() {
        let cli = Cli::parse_from(["local-notify", "-b", "legacy"]);
        assert_eq!(cli.backend, Some(BackendArg::Legacy));
    }

    #[test]
    fn cli_rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["local-notify", "--backend", "fancy"]).is_err());
    }

    #[test]
    fn cli_parses_os_version_and_serve() {
        let cli = Cli::parse_from(["local-notify", "--os-version", "10.13", "serve"]);
        assert_eq!(cli.os_version, Some("10.13".to_string()));
        assert!(matches!(cli.command, Some(Commands::Serve)));
    }

    #[test]
    fn cli_parses_probe() {
        let cli = Cli::parse_from(["local-notify", "probe"]);
        assert!(matches!(cli.command, Some(Commands::Probe)));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["local-notify", "config", "set", "backend", "legacy"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "backend");
            assert_eq!(value, "legacy");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn backend_arg_converts_to_preference() {
        assert_eq!(BackendPreference::from(BackendArg::Auto), BackendPreference::Auto);
        assert_eq!(BackendPreference::from(BackendArg::Modern), BackendPreference::Modern);
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("backend"));
        assert!(is_valid_config_key("os_version"));
        assert!(is_valid_config_key("log_level"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
