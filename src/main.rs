use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};

use deskwatch::{HandlerRegistry, MonitorConfig, watch};

/// X11 desktop activity monitor.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Directory for handler data (default: $XDG_CONFIG_HOME/deskwatch)
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Seconds the loop waits for events before running idle hooks
    #[arg(long, default_value_t = 1)]
    idle_secs: u64,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("deskwatch=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = MonitorConfig::new().with_idle_timeout(Duration::from_secs(cli.idle_secs));
    if let Some(dir) = cli.config_dir {
        config = config.with_config_dir(dir);
    }
    if let Err(err) = std::fs::create_dir_all(&config.config_dir) {
        error!(dir = %config.config_dir.display(), %err, "cannot create config directory");
        return ExitCode::FAILURE;
    }

    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    if let Err(err) = ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Release);
    }) {
        error!(%err, "cannot install signal handler");
        return ExitCode::FAILURE;
    }

    let registry = HandlerRegistry::with_builtins();
    info!(
        handlers = registry.len(),
        dir = %config.config_dir.display(),
        "starting monitor"
    );

    match watch(config, &registry, &stop) {
        Ok(()) => {
            info!("stopped");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(%err, "monitor stopped on fatal error");
            ExitCode::FAILURE
        }
    }
}
