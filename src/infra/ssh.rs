//! SSH key discovery.
//!
//! The clone step authenticates over SSH, so before provisioning we check
//! that a usable private key exists and warn (non-fatally) when it does not.
//! Search order: `ssh_key_file` from the config (bare names resolve under
//! `~/.ssh/`), then `~/.ssh/nimbus_id_rsa`, then `~/.ssh/id_rsa`.

use std::path::{Path, PathBuf};

use crate::infra::config::NimbusConfig;

/// Guidance shown when no key can be found.
pub const KEY_GUIDANCE: &str = "Your SSH keys are created either by running ssh-keygen \
(password optional) or by registering a domain, which does it for you. If you created them \
on your own (or want to use an existing keypair), be sure to upload your public key to the \
Nimbus console. The client tools use the value of 'ssh_key_file' in the config to find your \
key, followed by the defaults of nimbus_id_rsa and then id_rsa.";

/// Find the private key the clone step will use, if any.
#[must_use]
pub fn resolve_key_file(config: &NimbusConfig) -> Option<PathBuf> {
    let ssh_dir = dirs::home_dir()?.join(".ssh");

    if let Some(configured) = config.ssh_key_file.as_deref() {
        let candidate = expand(configured, &ssh_dir);
        return candidate.exists().then_some(candidate);
    }

    for name in ["nimbus_id_rsa", "id_rsa"] {
        let candidate = ssh_dir.join(name);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

/// A bare file name resolves under `~/.ssh/`; anything with a separator is a
/// path of its own.
fn expand(configured: &str, ssh_dir: &Path) -> PathBuf {
    let as_path = Path::new(configured);
    if as_path.components().count() == 1 {
        ssh_dir.join(configured)
    } else {
        as_path.to_path_buf()
    }
}
