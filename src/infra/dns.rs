//! DNS infrastructure — implements `DnsResolver` using `spawn_blocking`.

use crate::application::ports::DnsResolver;

/// Production resolver probe backed by the system resolver.
///
/// Uses `ToSocketAddrs` on a blocking thread; any resolution failure,
/// including "no such host yet", is simply `false`.
pub struct SystemResolver;

impl DnsResolver for SystemResolver {
    async fn resolves(&self, host: &str) -> bool {
        let addr = format!("{host}:443");
        tokio::task::spawn_blocking(move || {
            use std::net::ToSocketAddrs;
            addr.to_socket_addrs()
                .map(|mut addrs| addrs.next().is_some())
                .unwrap_or(false)
        })
        .await
        .unwrap_or(false)
    }
}
