//! `sovra verify` — Verify a credential or presentation file.

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

use sovra_credentials::presentation::VERIFIABLE_PRESENTATION_TYPE;
use sovra_credentials::{Credential, Presentation, RevocationList, Verifier};

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Path to a credential or presentation JSON file.
    pub file: PathBuf,

    /// Also reject credentials found in the revocation list.
    #[arg(long)]
    pub check_revoked: bool,
}

pub fn run(args: &VerifyArgs, config: &CliConfig) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("read {}", args.file.display()))?;
    let document: serde_json::Value =
        serde_json::from_slice(&bytes).context("invalid JSON document")?;

    let is_presentation = document["type"]
        .as_array()
        .is_some_and(|types| {
            types
                .iter()
                .any(|t| t.as_str() == Some(VERIFIABLE_PRESENTATION_TYPE))
        });

    let verifier = Verifier::new();
    let credential_ids = if is_presentation {
        let presentation = Presentation::from_json(&bytes)?;
        verifier
            .verify_presentation(&presentation)
            .context("presentation verification failed")?;
        println!("Presentation is valid (holder {})", presentation.holder);
        presentation
            .verifiable_credential
            .into_iter()
            .map(|c| c.id)
            .collect()
    } else {
        let credential = Credential::from_json(&bytes)?;
        verifier
            .verify_credential(&credential)
            .context("credential verification failed")?;
        println!("Credential is valid (issuer {})", credential.issuer);
        vec![credential.id]
    };

    if args.check_revoked {
        let revocations = RevocationList::open(config.context().revocation_path())?;
        let revoked: Vec<&String> = credential_ids
            .iter()
            .filter(|id| revocations.is_revoked(id))
            .collect();
        if !revoked.is_empty() {
            anyhow::bail!("revoked credentials: {:?}", revoked);
        }
        println!("No credential is revoked");
    }
    Ok(())
}
