//! HTTP broker client — implements `BrokerClient` over reqwest.
//!
//! Every call is an HTTPS POST of `json_data={...}&password={...}` (form
//! encoded) against `https://{broker_host}/broker/{endpoint}`. The JSON
//! payload always carries the client API version and, when debug is enabled,
//! `debug: true`. Responses are decoded exactly once here into
//! [`BrokerReply`]; callers above only ever see typed results or typed
//! errors.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::json;

use crate::application::ports::{BrokerClient, ControlRequest};
use crate::domain::app::{AppSpec, CreatedApp, Credentials};
use crate::domain::error::BrokerError;
use crate::domain::response::{BrokerReply, ServerVersions, UserInfo};
use crate::infra::config::NimbusConfig;

/// Client API version string, sent in every payload.
pub const API_VERSION: &str = "1.1.1";

/// A raw broker response before decoding.
#[derive(Debug)]
struct RawResponse {
    status: u16,
    content_type: String,
    body: String,
}

/// Production broker client.
pub struct HttpBrokerClient {
    http: reqwest::Client,
    broker_host: String,
    debug: bool,
    /// Last-known-good server versions, refreshed from every decoded reply.
    versions: Mutex<ServerVersions>,
}

impl HttpBrokerClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be constructed.
    pub fn new(config: &NimbusConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            broker_host: config.broker_host.clone(),
            debug: config.debug,
            versions: Mutex::new(ServerVersions::default()),
        })
    }

    /// Snapshot of the last-known-good server versions.
    #[must_use]
    pub fn server_versions(&self) -> ServerVersions {
        self.versions
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("https://{}/broker/{path}", self.broker_host)
    }

    /// Augment a payload with the ambient fields every call carries.
    fn finalize_payload(&self, mut payload: serde_json::Value) -> serde_json::Value {
        if let Some(map) = payload.as_object_mut() {
            map.insert("api".into(), json!(API_VERSION));
            if self.debug {
                map.insert("debug".into(), json!(true));
            }
        }
        payload
    }

    fn print_post_data(&self, payload: &serde_json::Value, password: &str) {
        if !self.debug {
            return;
        }
        println!("Submitting form:");
        if let Some(map) = payload.as_object() {
            for (key, value) in map {
                println!("{key}: {value}");
            }
        }
        println!("password: {}", "X".repeat(password.len()));
    }

    /// POST a payload and classify the transport-level outcome.
    async fn post(
        &self,
        path: &str,
        payload: serde_json::Value,
        password: &str,
    ) -> Result<RawResponse, BrokerError> {
        let payload = self.finalize_payload(payload);
        self.print_post_data(&payload, password);

        let url = self.endpoint(path);
        if self.debug {
            println!("Contacting https://{}", self.broker_host);
        }

        let json_data = payload.to_string();
        let form = [("json_data", json_data.as_str()), ("password", password)];
        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_owned();
        let body = response
            .text()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        // A 404 with an HTML body means we are not talking to a broker at
        // all — wrong address or incompatible server. Fatal, never retried.
        if status == 404 && content_type.starts_with("text/html") {
            return Err(BrokerError::ServerNotFound);
        }

        Ok(RawResponse { status, content_type, body })
    }

    /// Decode a 200 response and absorb its version metadata.
    fn decode(&self, raw: &RawResponse) -> Result<BrokerReply, BrokerError> {
        let reply = BrokerReply::parse(&raw.body)?;
        if let Ok(mut versions) = self.versions.lock() {
            versions.absorb(&reply);
        }
        if self.debug {
            self.print_debug_info(&reply);
        }
        Ok(reply)
    }

    fn print_debug_info(&self, reply: &BrokerReply) {
        if let Some(debug) = reply.debug.as_deref() {
            println!("\nDEBUG:\n{debug}\n");
        }
        // `extra` holds only the keys serde did not recognize.
        for (key, value) in &reply.extra {
            println!("{key}: {value}");
        }
        let versions = self.server_versions();
        println!("API version:    {}", versions.api);
        println!("Broker version: {}", versions.broker);
    }

    /// Turn a non-200 response into the matching typed error.
    fn error_from(&self, raw: &RawResponse) -> BrokerError {
        if self.debug {
            println!("HTTP response from server is {}", raw.body);
        }
        if !raw.content_type.starts_with("application/json") {
            return BrokerError::Server {
                exit_code: Some(1),
                detail: format!(
                    "problem reported from server. Response code was {}.",
                    raw.status
                ),
            };
        }
        match BrokerReply::parse(&raw.body) {
            Ok(reply) => {
                if let Ok(mut versions) = self.versions.lock() {
                    versions.absorb(&reply);
                }
                let mut detail = format!(
                    "problem reported from server. Response code was {}.",
                    raw.status
                );
                if !reply.messages.is_empty() {
                    detail.push_str("\nMESSAGES:\n");
                    detail.push_str(&reply.messages.join("\n"));
                }
                if let Some(result) = reply.result.as_deref() {
                    detail.push_str("\nRESULT:\n");
                    detail.push_str(result);
                }
                BrokerError::Server { exit_code: reply.exit_code, detail }
            }
            Err(_) => BrokerError::Server {
                exit_code: Some(1),
                detail: format!(
                    "problem reported from server. Response code was {}. \
                     The error response could not be decoded.",
                    raw.status
                ),
            },
        }
    }
}

impl BrokerClient for HttpBrokerClient {
    async fn user_info(&self, creds: &Credentials) -> Result<UserInfo> {
        let payload = json!({ "rhlogin": creds.login });
        let raw = self.post("userinfo", payload, &creds.password).await?;
        match raw.status {
            200 => {
                let reply = self.decode(&raw)?;
                Ok(UserInfo::from_reply(&reply)?)
            }
            404 => Err(BrokerError::NoDomain { login: creds.login.clone() }.into()),
            401 => Err(BrokerError::Unauthorized.into()),
            _ => Err(self.error_from(&raw).into()),
        }
    }

    async fn create_app(&self, spec: &AppSpec, creds: &Credentials) -> Result<CreatedApp> {
        let payload = json!({
            "action": "configure",
            "app_name": spec.name,
            "cartridge": spec.cartridge,
            "rhlogin": creds.login,
        });
        let raw = self.post("cartridge", payload, &creds.password).await?;
        if raw.status != 200 {
            return Err(self.error_from(&raw).into());
        }
        let reply = self.decode(&raw)?;
        let data = reply.parse_data()?;
        let uuid = data
            .get("uuid")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| BrokerError::Protocol("uuid missing from response".into()))?
            .to_owned();
        let health_check_path = data
            .get("health_check_path")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("health")
            .to_owned();
        Ok(CreatedApp {
            uuid,
            health_check_path,
            result: reply.result,
            messages: reply.messages,
        })
    }

    async fn destroy_app(&self, app_name: &str, creds: &Credentials) -> Result<()> {
        let payload = json!({
            "action": "deconfigure",
            "app_name": app_name,
            "rhlogin": creds.login,
        });
        // Best-effort: the response body is not required by rollback callers.
        self.post("cartridge", payload, &creds.password).await?;
        Ok(())
    }

    async fn control_app(
        &self,
        req: &ControlRequest<'_>,
        creds: &Credentials,
    ) -> Result<BrokerReply> {
        let mut payload = json!({
            "action": req.action,
            "app_name": req.app_name,
            "rhlogin": creds.login,
        });
        if let Some(map) = payload.as_object_mut() {
            if let Some(framework) = req.framework {
                map.insert("cartridge".into(), json!(framework));
            }
            if let Some(alias) = req.server_alias {
                map.insert("server_alias".into(), json!(alias));
            }
        }
        let endpoint = if req.embedded { "embed_cartridge" } else { "cartridge" };
        let raw = self.post(endpoint, payload, &creds.password).await?;
        if raw.status != 200 {
            return Err(self.error_from(&raw).into());
        }
        Ok(self.decode(&raw)?)
    }

    async fn list_cartridges(&self, cart_type: &str) -> Result<Vec<String>> {
        let payload = json!({ "cart_type": cart_type });
        // The cartridge listing is informational and unauthenticated.
        let raw = self.post("cartlist", payload, "none").await?;
        if raw.status != 200 {
            return Err(self.error_from(&raw).into());
        }
        let reply = self.decode(&raw)?;
        let data = reply.parse_data()?;
        let carts = data
            .get("carts")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| BrokerError::Protocol("carts missing from response".into()))?
            .iter()
            .filter_map(serde_json::Value::as_str)
            .map(str::to_owned)
            .collect();
        Ok(carts)
    }
}
