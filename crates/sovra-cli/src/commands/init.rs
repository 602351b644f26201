//! `sovra init` — Create a new identity vault and make it active.

use clap::Args;
use std::path::{Path, PathBuf};

use sovra_identity::Identity;

use crate::config::CliConfig;
use crate::vault::Vault;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Name of the identity.
    pub name: String,

    /// Root directory for vaults (overrides the configured one).
    #[arg(long)]
    pub root: Option<PathBuf>,
}

pub fn run(args: &InitArgs, config: &mut CliConfig, config_path: &Path) -> anyhow::Result<()> {
    if let Some(root) = &args.root {
        config.identity.root_dir = root.clone();
    }
    let vault = Vault::new(config.context().vault_dir_for(&args.name));

    let identity = Identity::generate();
    vault.init(&identity)?;

    config.identity.active = args.name.clone();
    config.save(config_path)?;

    tracing::info!(name = %args.name, did = %identity.did(), "vault initialized");
    println!("Identity '{}' created", args.name);
    println!("  DID:   {}", identity.did());
    println!("  Vault: {}", vault.dir().display());
    Ok(())
}
