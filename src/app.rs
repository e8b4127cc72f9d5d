//! Application context — unified state passed to every command handler.
//!
//! `AppContext` is constructed once in `Cli::run()` from the global flags and
//! the config file, and passed as `&AppContext` to all command handlers.
//! Adding a new cross-cutting concern requires only one field change here —
//! zero command signatures change.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::infra::broker::HttpBrokerClient;
use crate::infra::clock::TokioSleeper;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::{NimbusConfig, YamlConfigStore};
use crate::infra::dns::SystemResolver;
use crate::infra::git::GitCli;
use crate::infra::health::ReqwestProbe;
use crate::infra::prompt::TerminalPrompt;
use crate::output::reporter::TerminalReporter;
use crate::output::OutputContext;

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct GlobalFlags {
    /// Explicit config file path.
    pub config: Option<PathBuf>,
    /// Verbose diagnostics.
    pub debug: bool,
    /// Request timeout override in seconds.
    pub timeout: Option<u64>,
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Effective configuration (file values plus CLI overrides).
    pub config: NimbusConfig,
    /// Broker API client.
    pub broker: HttpBrokerClient,
    /// DNS readiness resolver.
    pub dns: SystemResolver,
    /// Local repository manager.
    pub git: GitCli<TokioCommandRunner>,
    /// Application health-check prober.
    pub health: ReqwestProbe,
    /// Real-time sleeper for polling loops.
    pub sleeper: TokioSleeper,
    /// Interactive password prompt.
    pub prompt: TerminalPrompt,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error when the config file is unreadable (exit 253) or the
    /// HTTP clients cannot be built.
    pub fn new(flags: &GlobalFlags) -> Result<Self> {
        let mut config = YamlConfigStore::load(flags.config.as_deref())?;
        if flags.debug {
            config.debug = true;
        }
        if let Some(timeout) = flags.timeout {
            config.timeout_secs = timeout;
        }

        let broker = HttpBrokerClient::new(&config)?;
        let health = ReqwestProbe::new(Duration::from_secs(config.timeout_secs))?;

        Ok(Self {
            output: OutputContext::new(flags.no_color, flags.quiet),
            config,
            broker,
            dns: SystemResolver,
            git: GitCli::new(),
            health,
            sleeper: TokioSleeper,
            prompt: TerminalPrompt,
        })
    }

    /// Fresh progress reporter bound to this context's terminal state.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter {
        TerminalReporter::new(&self.output)
    }
}
