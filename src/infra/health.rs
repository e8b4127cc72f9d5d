//! HTTP health-check infrastructure — implements `HttpProbe` over reqwest.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{HttpProbe, ProbeResponse};

/// Production health-check prober.
pub struct ReqwestProbe {
    http: reqwest::Client,
}

impl ReqwestProbe {
    /// Build a prober with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("building health-check client")?;
        Ok(Self { http })
    }
}

impl HttpProbe for ReqwestProbe {
    async fn get(&self, url: &str) -> Result<ProbeResponse> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetching {url}"))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("reading body from {url}"))?
            .to_vec();
        Ok(ProbeResponse { status, body })
    }
}
