//! `sovra revoke`, `sovra check-revoked`, `sovra list-revoked`.

use clap::Args;

use sovra_credentials::RevocationList;

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct RevokeArgs {
    /// Credential identifier.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct CheckRevokedArgs {
    /// Credential identifier.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct ListRevokedArgs {}

fn open(config: &CliConfig) -> anyhow::Result<RevocationList> {
    Ok(RevocationList::open(config.context().revocation_path())?)
}

pub fn revoke(args: &RevokeArgs, config: &CliConfig) -> anyhow::Result<()> {
    open(config)?.revoke(&args.id)?;
    println!("Credential '{}' revoked", args.id);
    Ok(())
}

pub fn check(args: &CheckRevokedArgs, config: &CliConfig) -> anyhow::Result<()> {
    if open(config)?.is_revoked(&args.id) {
        println!("Credential '{}' is revoked", args.id);
    } else {
        println!("Credential '{}' is not revoked", args.id);
    }
    Ok(())
}

pub fn list(_args: &ListRevokedArgs, config: &CliConfig) -> anyhow::Result<()> {
    let mut ids = open(config)?.list();
    ids.sort();
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}
