//! `sovra present` — Build and sign a presentation from stored credentials.

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;

use sovra_credentials::credential::timestamp_id;
use sovra_credentials::{build_presentation, Challenge, CredentialStore, PresentationRequest};

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct PresentArgs {
    /// Credential ids to include, comma-separated (defaults to all).
    #[arg(long, value_delimiter = ',')]
    pub creds: Vec<String>,

    /// Subject fields to disclose, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub reveal: Option<Vec<String>>,

    /// Zero-knowledge challenge as type:field:param, e.g. range:age:18.
    #[arg(long = "zkp")]
    pub zkp: Vec<String>,

    /// Vault directory (defaults to the active identity).
    #[arg(long)]
    pub vault: Option<PathBuf>,
}

pub fn run(args: &PresentArgs, config: &CliConfig) -> anyhow::Result<()> {
    let vault = super::resolve_vault(config, args.vault.as_ref())?;
    let identity = vault.load()?;
    let store = vault.credentials();

    let ids = if args.creds.is_empty() {
        store.list_ids()?
    } else {
        args.creds.clone()
    };
    if ids.is_empty() {
        anyhow::bail!("no credentials to present in {}", store.dir().display());
    }

    let credentials = ids
        .iter()
        .map(|id| store.get(id).with_context(|| format!("load credential {}", id)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let challenges = args
        .zkp
        .iter()
        .map(|spec| Challenge::parse_spec(spec))
        .collect::<Result<Vec<_>, _>>()?;
    let request = PresentationRequest {
        reveal: args.reveal.clone(),
        challenges,
    };

    let mut presentation = build_presentation(credentials, identity.did(), &request)?;
    presentation.sign(identity.keypair(), &identity.verification_method_id())?;

    let dir = vault.presentations_dir();
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{}.json", timestamp_id(Utc::now())));
    std::fs::write(&path, presentation.to_json_bytes()?)
        .with_context(|| format!("write {}", path.display()))?;

    println!("Presentation saved to {}", path.display());
    Ok(())
}
