//! Nimbus CLI - provision and manage hosted applications on the Nimbus platform

use clap::Parser;

use nimbus_cli::cli::Cli;
use nimbus_cli::domain::error::exit_code_for;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code_for(&e));
    }
}
