//! `sovra prove-range` — Produce a standalone range proof for a credential attribute.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

use sovra_credentials::challenge::numeric_attribute;
use sovra_credentials::Credential;

#[derive(Args, Debug)]
pub struct ProveRangeArgs {
    /// Subject field to prove.
    #[arg(long)]
    pub field: String,

    /// Public minimum.
    #[arg(long)]
    pub min: u64,

    /// Path to the credential JSON file.
    #[arg(long)]
    pub cred: PathBuf,
}

pub fn run(args: &ProveRangeArgs) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(&args.cred).with_context(|| format!("read {}", args.cred.display()))?;
    let credential = Credential::from_json(&bytes)?;

    let raw = credential
        .credential_subject
        .get(&args.field)
        .with_context(|| format!("field '{}' not found in credentialSubject", args.field))?;
    let value = numeric_attribute(&args.field, raw)?;

    let proof = sovra_proof::generate_range_proof(value, args.min)?;
    println!("{}", serde_json::to_string_pretty(&proof)?);
    Ok(())
}
