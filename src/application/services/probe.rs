//! Readiness probing — DNS propagation and HTTP health-check loops.
//!
//! Both loops share the same shape: at most [`MAX_RETRIES`] attempts with a
//! sleep interval that doubles after every failure, starting at 2 seconds.
//! Exhausting the attempts returns `false` — the caller decides what that
//! means. Neither loop ever turns "not ready yet" into an error.

use std::time::Duration;

use crate::application::ports::{DnsResolver, HttpProbe, ProgressReporter, Sleeper};
use crate::domain::app::{next_delay, INITIAL_DELAY_SECS, MAX_RETRIES};

/// Grace period before the first DNS attempt, giving the new record a head
/// start on worldwide propagation.
pub const DNS_PROPAGATION_GRACE: Duration = Duration::from_secs(15);

/// Fixed pre-sleep before every health-check attempt.
const HEALTH_PRE_SLEEP: Duration = Duration::from_secs(2);

/// Wait for `fqdn` to become resolvable.
///
/// Returns `true` once the name resolves, `false` after exhausting
/// [`MAX_RETRIES`] attempts. Sleeps between attempts follow the doubling law:
/// 2, 4, 8, … seconds.
pub async fn wait_for_dns(
    resolver: &impl DnsResolver,
    sleeper: &impl Sleeper,
    reporter: &impl ProgressReporter,
    fqdn: &str,
) -> bool {
    sleeper.sleep(DNS_PROPAGATION_GRACE).await;

    let mut interval = INITIAL_DELAY_SECS;
    for attempt in 1..=MAX_RETRIES {
        if resolver.resolves(fqdn).await {
            return true;
        }
        reporter.step(&format!("retry # {attempt} - waiting for DNS: {fqdn}"));
        sleeper.sleep(Duration::from_secs(interval)).await;
        interval = next_delay(interval);
    }
    false
}

/// Poll the application health-check URL until it reports ready.
///
/// An attempt succeeds only when the response status is exactly 200 AND the
/// first body byte is the literal character `'1'`. Transport errors and any
/// other response count as failed attempts. Returns `false` after
/// `max_attempts` — the caller presents this as "may still be starting",
/// not as a failure.
pub async fn wait_for_healthy(
    probe: &impl HttpProbe,
    sleeper: &impl Sleeper,
    reporter: &impl ProgressReporter,
    url: &str,
    max_attempts: u32,
    debug: bool,
) -> bool {
    let mut interval = INITIAL_DELAY_SECS;
    for attempt in 1..=max_attempts {
        reporter.step(&format!("confirming application is available: attempt # {attempt}"));
        sleeper.sleep(HEALTH_PRE_SLEEP).await;

        match probe.get(url).await {
            Ok(resp) if resp.status == 200 && resp.body.first() == Some(&b'1') => {
                return true;
            }
            Ok(resp) => {
                if debug {
                    reporter.step(&format!("server responded with {}", resp.status));
                    if resp.status != 503 {
                        reporter.step(&String::from_utf8_lossy(&resp.body));
                    }
                }
            }
            Err(err) => {
                if debug {
                    reporter.step(&format!("health check attempt failed: {err:#}"));
                }
            }
        }

        if debug {
            reporter.step(&format!("sleeping {interval} seconds"));
        }
        sleeper.sleep(Duration::from_secs(interval)).await;
        interval = next_delay(interval);
    }
    false
}
