//! `sovra auth-request`, `sovra auth-respond`, `sovra auth-verify`: DID authentication.

use anyhow::Context;
use chrono::{Duration, Utc};
use clap::Args;
use std::path::PathBuf;

use sovra_credentials::{AuthenticationChallenge, AuthenticationResponse};

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct AuthRequestArgs {
    /// Domain of the relying party.
    #[arg(long, default_value = "")]
    pub domain: String,

    /// Validity of the challenge in seconds.
    #[arg(long, default_value_t = 300)]
    pub validity: i64,
}

#[derive(Args, Debug)]
pub struct AuthRespondArgs {
    /// Path to the challenge JSON file.
    pub challenge: PathBuf,

    /// Vault directory (defaults to the active identity).
    #[arg(long)]
    pub vault: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AuthVerifyArgs {
    /// Path to the response JSON file.
    pub response: PathBuf,

    /// DID expected to have signed the challenge.
    #[arg(long)]
    pub did: String,
}

pub fn request(args: &AuthRequestArgs) -> anyhow::Result<()> {
    if args.validity <= 0 {
        anyhow::bail!("validity must be positive, got {}", args.validity);
    }
    let challenge = AuthenticationChallenge::new(&args.domain, Duration::seconds(args.validity));
    println!("{}", serde_json::to_string_pretty(&challenge)?);
    Ok(())
}

pub fn respond(args: &AuthRespondArgs, config: &CliConfig) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.challenge)
        .with_context(|| format!("read {}", args.challenge.display()))?;
    let challenge = AuthenticationChallenge::from_json(&bytes)?;

    let identity = super::resolve_vault(config, args.vault.as_ref())?.load()?;
    let response = challenge.respond(identity.did(), identity.keypair())?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub fn verify(args: &AuthVerifyArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.response)
        .with_context(|| format!("read {}", args.response.display()))?;
    let response = AuthenticationResponse::from_json(&bytes)?;
    response
        .verify(&args.did, Utc::now())
        .context("authentication failed")?;
    println!("Authenticated {}", args.did);
    Ok(())
}
