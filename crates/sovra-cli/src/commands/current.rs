//! `sovra current` — Show the active identity.

use clap::Args;

use crate::config::CliConfig;
use crate::vault::Vault;

#[derive(Args, Debug)]
pub struct CurrentArgs {}

pub fn run(_args: &CurrentArgs, config: &CliConfig) -> anyhow::Result<()> {
    let ctx = config.context();
    if !ctx.has_active() {
        println!("No active identity. Use 'sovra use <name>' or run 'sovra init <name>'");
        return Ok(());
    }

    println!("Active identity: {}", ctx.active);
    match Vault::new(ctx.vault_dir()).load() {
        Ok(identity) => println!("  DID: {}", identity.did()),
        Err(e) => println!("  (vault unreadable: {:#})", e),
    }
    Ok(())
}
