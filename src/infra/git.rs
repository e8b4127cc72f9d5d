//! Local repository management — implements `RepoCloner` over the system git.

use std::path::Path;

use anyhow::Result;

use crate::application::ports::{CommandRunner, RepoCloner};
use crate::domain::error::CloneError;
use crate::infra::command_runner::{TokioCommandRunner, DEFAULT_CLONE_TIMEOUT};

/// Shells out to `git clone`; removal is a plain recursive delete.
pub struct GitCli<R: CommandRunner> {
    runner: R,
}

impl GitCli<TokioCommandRunner> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            runner: TokioCommandRunner::new(DEFAULT_CLONE_TIMEOUT),
        }
    }
}

impl Default for GitCli<TokioCommandRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> GitCli<R> {
    /// Build over a specific runner (used by tests).
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> RepoCloner for GitCli<R> {
    async fn clone_repo(&self, git_url: &str, target_dir: &Path, quiet: bool) -> Result<()> {
        let target = target_dir.display().to_string();
        let mut args = vec!["clone"];
        if quiet {
            args.push("--quiet");
        }
        args.push(git_url);
        args.push(&target);

        let output = self.runner.run("git", &args).await?;
        if !output.status.success() {
            let combined = format!(
                "{}{}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
            return Err(CloneError { output: combined }.into());
        }
        Ok(())
    }

    fn remove_repo(&self, target_dir: &Path) {
        // Rollback-only path; a failed delete must not mask the real error.
        let _ = std::fs::remove_dir_all(target_dir);
    }
}
