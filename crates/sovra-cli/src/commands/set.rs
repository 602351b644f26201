//! `sovra set` — Set a subject attribute and reissue a credential.

use clap::Args;
use serde_json::Value;

use crate::config::CliConfig;

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Attribute name.
    pub key: String,

    /// Attribute value, stored as a string.
    pub value: String,
}

pub fn run(args: &SetArgs, config: &CliConfig) -> anyhow::Result<()> {
    let vault = super::resolve_vault(config, None)?;

    let mut attributes = vault.attributes()?;
    attributes.insert(args.key.clone(), Value::String(args.value.clone()));
    vault.save_attributes(&attributes)?;

    let id = super::issue::issue_from_attributes(&vault, "")?;
    println!("Attribute '{}' set; credential '{}' issued", args.key, id);
    Ok(())
}
