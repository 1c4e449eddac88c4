//! # datacontract Command-Line Entry Point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Load configuration (defaults when missing)
//!   ├─> Initialize logging (stderr, optional rotating files)
//!   │
//!   ├─> If command provided:
//!   │   └─> new / generate / edit / config
//!   │
//!   └─> Otherwise:
//!       └─> Open the editor on the configured default draft
//! ```
//!
//! ```bash
//! datacontract new orders.json --domain sales
//! datacontract edit orders.json
//! datacontract generate orders.json -o orders.yaml
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;
use datacontract::config::AppConfig;
use datacontract::logging;

/// # Errors
///
/// Returns error if logging cannot be initialized or the command fails.
fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // A broken config file should not lock the author out of the tool
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    logging::init(&config)?;
    if let Some(err) = config_error {
        tracing::warn!("Using default configuration: {err:#}");
    }

    cli::run_command(cli.command, &config)
}
