//! `nimbus version` — print the client version.

use anyhow::Result;

/// Run `nimbus version`.
///
/// # Errors
///
/// Never fails; the `Result` keeps the handler signature uniform.
pub fn run() -> Result<()> {
    println!("nimbus {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
