//! Sleeping infrastructure — implements the `Sleeper` port with tokio timers.

use std::time::Duration;

use crate::application::ports::Sleeper;

/// Production sleeper.
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
