//! `nimbus cartridges` — list the cartridge types the broker offers.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::BrokerClient as _;

/// Arguments for the cartridges command.
#[derive(Args)]
pub struct CartridgesArgs {
    /// Cartridge category to list
    #[arg(long = "type", default_value = "standalone")]
    pub cart_type: String,
}

/// Run `nimbus cartridges`.
///
/// A failing listing is not fatal: a diagnostic is printed and the list is
/// simply empty, so scripts composing over this command keep working.
///
/// # Errors
///
/// This command itself never fails; the `Result` covers output plumbing only.
pub async fn run(args: &CartridgesArgs, app: &AppContext) -> Result<()> {
    app.output
        .info("obtaining list of cartridges (please excuse the delay)...");

    let carts = match app.broker.list_cartridges(&args.cart_type).await {
        Ok(carts) => carts,
        Err(err) => {
            app.output.warn(&format!("could not obtain cartridge list: {err:#}"));
            Vec::new()
        }
    };

    if carts.is_empty() {
        app.output.info("no cartridges available");
    } else {
        for cart in &carts {
            println!("{cart}");
        }
    }
    Ok(())
}
