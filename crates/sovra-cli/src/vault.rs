//! On-disk identity vault.
//!
//! ```text
//! <root>/<name>/did.json
//! <root>/<name>/keystore.json        {"privateKey": "<base58>"}
//! <root>/<name>/attributes.json
//! <root>/<name>/credentials/<id>.json
//! <root>/<name>/presentations/<timestamp>.json
//! ```

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use sovra_credentials::FileCredentialStore;
use sovra_crypto::KeyPair;
use sovra_identity::Identity;

const DID_FILE: &str = "did.json";
const KEYSTORE_FILE: &str = "keystore.json";
const ATTRIBUTES_FILE: &str = "attributes.json";
const CREDENTIALS_DIR: &str = "credentials";
const PRESENTATIONS_DIR: &str = "presentations";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStore {
    private_key: String,
}

/// A single identity's directory.
#[derive(Debug, Clone)]
pub struct Vault {
    dir: PathBuf,
}

impl Vault {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn exists(&self) -> bool {
        self.dir.join(DID_FILE).exists()
    }

    /// Write the identity's DID document and private key.
    pub fn init(&self, identity: &Identity) -> anyhow::Result<()> {
        if self.exists() {
            bail!("vault already exists at {}", self.dir.display());
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create vault dir {}", self.dir.display()))?;

        let document = identity.document().to_json_bytes()?;
        fs::write(self.dir.join(DID_FILE), document).context("write did.json")?;

        let encoded = identity.keypair().to_bs58();
        let keystore = KeyStore {
            private_key: encoded.as_str().to_owned(),
        };
        fs::write(
            self.dir.join(KEYSTORE_FILE),
            serde_json::to_vec_pretty(&keystore)?,
        )
        .context("write keystore.json")?;
        Ok(())
    }

    /// Load the identity, checking the key against the DID document.
    pub fn load(&self) -> anyhow::Result<Identity> {
        let document = fs::read(self.dir.join(DID_FILE))
            .with_context(|| format!("read did.json in {}", self.dir.display()))?;
        let keystore: KeyStore = serde_json::from_slice(
            &fs::read(self.dir.join(KEYSTORE_FILE)).context("read keystore.json")?,
        )
        .context("parse keystore.json")?;
        let keypair = KeyPair::from_bs58(&keystore.private_key).context("decode private key")?;
        Ok(Identity::from_parts(&document, keypair)?)
    }

    pub fn did_document_bytes(&self) -> anyhow::Result<Vec<u8>> {
        fs::read(self.dir.join(DID_FILE)).context("read did.json")
    }

    /// Subject attributes used for issuance. Missing file means none.
    pub fn attributes(&self) -> anyhow::Result<Map<String, Value>> {
        let path = self.dir.join(ATTRIBUTES_FILE);
        if !path.exists() {
            return Ok(Map::new());
        }
        let bytes = fs::read(&path).context("read attributes.json")?;
        serde_json::from_slice(&bytes).context("invalid attributes.json")
    }

    pub fn save_attributes(&self, attributes: &Map<String, Value>) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(
            self.dir.join(ATTRIBUTES_FILE),
            serde_json::to_vec_pretty(attributes)?,
        )
        .context("write attributes.json")
    }

    pub fn credentials(&self) -> FileCredentialStore {
        FileCredentialStore::new(self.dir.join(CREDENTIALS_DIR))
    }

    pub fn presentations_dir(&self) -> PathBuf {
        self.dir.join(PRESENTATIONS_DIR)
    }
}
