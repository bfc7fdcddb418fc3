//! local-notify CLI entry point

use std::process::ExitCode;

use clap::Parser;

use local_notify::cli::{
    app::{init_logging, load_merged_config, resolve_options, run_probe, run_serve},
    app::{EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use local_notify::domain::capability::BackendPreference;
use local_notify::domain::config::AppConfig;
use local_notify::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle config before touching the merged config
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        backend: cli.backend.map(|b| BackendPreference::from(b).to_string()),
        os_version: cli.os_version.clone(),
        log_level: cli.log_level.clone(),
    };

    // Merge config
    let config = load_merged_config(cli_config).await;
    init_logging(cli.log_level.as_deref(), config.log_level_or_default());

    let options = match resolve_options(&config) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    match cli.command {
        Some(Commands::Probe) => run_probe(options),
        _ => run_serve(options).await,
    }
}
