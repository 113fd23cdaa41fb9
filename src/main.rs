use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use update_notifier::config::{Config, Settings, ensure_dir};
use update_notifier::version::classifier::classify;

#[derive(Parser)]
#[command(name = "update-notifier")]
#[command(version, about = "Notify a Discord channel about new GitHub releases")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print whether PREVIOUS -> CURRENT counts as a major or minor update
    Check { previous: String, current: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Check { previous, current }) => {
            println!("{}", classify(&previous, &current).as_str());
            ExitCode::SUCCESS
        }
        None => run_once(&cli.settings),
    }
}

fn run_once(settings: &Settings) -> ExitCode {
    if let Err(e) = ensure_dir(&settings.log_dir) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    let _guard = match update_notifier::logging::init(
        &settings.log_level,
        settings.log_format,
        &settings.log_dir,
    ) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Initializing the application");
    let config = match Config::from_settings(settings) {
        Ok(config) => config,
        Err(e) => {
            error!("Initialization error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(update_notifier::app::run(&config)));

    match result {
        Ok(summary) => {
            info!(
                "Run finished: {} tracked, {} updates",
                summary.tracked, summary.updates
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error during execution: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
