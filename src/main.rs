//! Entry point for vipconf, the configuration manager of cursor-free-vip.
//!
//! This binary loads environment variables, sets up logging, parses CLI
//! arguments via [`cli`], and dispatches to the chosen subcommand.

mod cli;
mod config;
mod constants;
mod host;
mod i18n;
mod logging;
mod output;
mod printer;

use anyhow::Result;

/// Runs the vipconf CLI.
///
/// Loads `.env` files (silently ignored if absent), installs the tracing
/// subscriber, parses command-line arguments into a [`cli::Cli`] struct,
/// and dispatches the chosen subcommand via [`cli::run`].
fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();
    logging::init(cli.verbose);
    cli::run(cli)
}
