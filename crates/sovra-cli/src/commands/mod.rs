pub mod auth;
pub mod current;
pub mod init;
pub mod issue;
pub mod present;
pub mod prove_range;
pub mod revocation;
pub mod set;
pub mod show;
pub mod use_identity;
pub mod verify;

use std::path::PathBuf;

use crate::config::CliConfig;
use crate::vault::Vault;

/// Vault of `--vault` if given, otherwise of the active identity.
pub(crate) fn resolve_vault(config: &CliConfig, vault: Option<&PathBuf>) -> anyhow::Result<Vault> {
    if let Some(dir) = vault {
        return Ok(Vault::new(dir));
    }
    let ctx = config.context();
    if !ctx.has_active() {
        anyhow::bail!("no active identity; run 'sovra init <name>' or 'sovra use <name>'");
    }
    Ok(Vault::new(ctx.vault_dir()))
}
