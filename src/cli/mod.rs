//! Command-line interface definition and dispatch for vipconf.
//!
//! Uses [`clap`] derive macros. Every subcommand works on a single
//! [`ConfigStore`] built from the detected platform.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::{ConfigResolver, ConfigStore, Platform, Resolution};
use crate::constants::{ENV_BASE_DIR, ENV_LOCALE};
use crate::host::SystemHost;
use crate::i18n::Translator;
use crate::output::{notice, Level};
use crate::printer::print_config;

/// Top-level CLI structure for vipconf.
#[derive(Parser)]
#[command(
    name = "vipconf",
    about = "Create, repair and inspect the cursor-free-vip config file"
)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Directory used instead of the Documents folder
    #[arg(long, global = true, env = ENV_BASE_DIR)]
    pub base_dir: Option<PathBuf>,
    /// JSON message catalog for translated output
    #[arg(long, global = true, env = ENV_LOCALE)]
    pub locale: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
///
/// The `///` doc comments on variants double as `--help` text.
#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the config (creating or repairing it) and print it
    Show,
    /// Print the config file location
    Path,
    /// Back up, delete and regenerate the config file
    Reset,
}

/// Parses command-line arguments, exiting on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

fn load_translator(locale: Option<&PathBuf>) -> Translator {
    let Some(path) = locale else {
        return Translator::english();
    };
    match Translator::from_file(path) {
        Ok(tr) => tr,
        Err(e) => {
            notice(
                Level::Warning,
                &format!("Could not load locale {}: {:#}", path.display(), e),
            );
            Translator::english()
        }
    }
}

/// Creates an explicit `--base-dir` so it is never silently replaced by the
/// working-directory fallback.
fn prepare_base_dir(dir: Option<&Path>) -> Result<()> {
    if let Some(dir) = dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create base directory {}", dir.display()))?;
    }
    Ok(())
}

fn print_resolution(resolution: Option<&Resolution>, tr: &Translator) {
    let mut stdout = io::stdout().lock();
    print_config(
        resolution.map(|r| &r.config),
        resolution.and_then(|r| r.path.as_deref()),
        tr,
        &mut stdout,
    );
}

/// Dispatches the parsed CLI command to its handler.
pub fn run(cli: Cli) -> Result<()> {
    let tr = load_translator(cli.locale.as_ref());
    prepare_base_dir(cli.base_dir.as_deref())?;
    let platform = Platform::detect();
    let host = SystemHost::new(platform).with_base_dir(cli.base_dir);
    let mut store = ConfigStore::new(ConfigResolver::new(&host, platform, &tr));

    match cli.command {
        Commands::Show => {
            let resolution = store.get();
            print_resolution(Some(resolution), &tr);
        }
        Commands::Path => match &store.get().path {
            Some(path) => println!("{}", path.display()),
            None => {
                println!("{}", tr.text("config.config_not_available").yellow());
                anyhow::bail!("no config file in use");
            }
        },
        Commands::Reset => {
            let resolution = store.force_update();
            print_resolution(resolution, &tr);
            if resolution.is_none() {
                anyhow::bail!("forced update failed");
            }
        }
    }
    Ok(())
}
