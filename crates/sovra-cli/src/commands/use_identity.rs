//! `sovra use` — Select the active identity.

use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::CliConfig;
use crate::vault::Vault;

#[derive(Args, Debug)]
pub struct UseArgs {
    /// Name of the identity to activate.
    pub name: String,

    /// Root directory for vaults (overrides the configured one).
    pub root: Option<PathBuf>,
}

pub fn run(args: &UseArgs, config: &mut CliConfig, config_path: &Path) -> anyhow::Result<()> {
    if let Some(root) = &args.root {
        config.identity.root_dir = root.clone();
    }
    let vault = Vault::new(config.context().vault_dir_for(&args.name));
    if !vault.exists() {
        anyhow::bail!("no identity '{}' under {}", args.name, config.identity.root_dir.display());
    }

    config.identity.active = args.name.clone();
    config.save(config_path)?;
    println!("Active identity set to '{}'", args.name);
    Ok(())
}
