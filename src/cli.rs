//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, GlobalFlags};
use crate::commands;

/// Provision and manage hosted applications on the Nimbus platform
#[derive(Parser)]
#[command(
    name = "nimbus",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Path to an alternate config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print debug information (raw responses, version metadata)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Broker request timeout in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an application and clone its repository
    Create(commands::create::CreateArgs),

    /// Destroy an application
    Destroy(commands::destroy::DestroyArgs),

    /// Control an application (start, stop, restart, ...)
    Ctl(commands::ctl::CtlArgs),

    /// List available cartridges
    Cartridges(commands::cartridges::CartridgesArgs),

    /// Show account information
    Info(commands::info::InfoArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error when the command fails; `main` maps it to the
    /// documented exit status.
    pub async fn run(self) -> Result<()> {
        let Cli { config, debug, timeout, no_color, quiet, command } = self;

        if let Command::Version = command {
            return commands::version::run();
        }

        let flags = GlobalFlags { config, debug, timeout, no_color, quiet };
        let app = AppContext::new(&flags)?;

        match command {
            Command::Create(args) => commands::create::run(&args, &app).await,
            Command::Destroy(args) => commands::destroy::run(&args, &app).await,
            Command::Ctl(args) => commands::ctl::run(&args, &app).await,
            Command::Cartridges(args) => commands::cartridges::run(&args, &app).await,
            Command::Info(args) => commands::info::run(&args, &app).await,
            Command::Version => unreachable!("handled above"),
        }
    }
}
