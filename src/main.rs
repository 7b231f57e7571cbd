use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use magnus_drive_runtime::config::{ConfigError, DriveConfig, LOOP_HZ};
use magnus_drive_runtime::profile::{resolve_profile, DEFAULT_PROFILE_NAME};
use magnus_drive_runtime::runtime::{self, RuntimeOptions};

/// Drive runtime for Magnus: driver input in, left/right duty out
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Driver profile name
    #[arg(short, long, default_value = DEFAULT_PROFILE_NAME)]
    profile: String,

    /// JSON file overriding drivetrain constants
    #[arg(long)]
    drive_config: Option<PathBuf>,

    /// Control loop frequency in Hz
    #[arg(long, default_value_t = LOOP_HZ, value_parser = clap::value_parser!(u64).range(1..=1000))]
    loop_hz: u64,

    /// Drive the fixed autonomous intent instead of controller input
    #[arg(long)]
    autonomous: bool,
}

fn resolve_options(args: &Args) -> Result<RuntimeOptions, ConfigError> {
    let profile = resolve_profile(&args.profile)?;
    let drive_config = match &args.drive_config {
        Some(path) => DriveConfig::load(path)?,
        None => DriveConfig::default(),
    };
    Ok(RuntimeOptions {
        profile,
        drive_config,
        loop_hz: args.loop_hz,
        autonomous: args.autonomous,
    })
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let options = match resolve_options(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime::run(options).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
