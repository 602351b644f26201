use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::credential::Credential;
use crate::error::CredentialError;

/// Persistence of issued credentials keyed by credential id.
pub trait CredentialStore: Send + Sync {
    /// Store a credential, replacing any previous one with the same id.
    fn save(&self, credential: &Credential) -> Result<(), CredentialError>;

    /// Load a credential by id.
    fn get(&self, id: &str) -> Result<Credential, CredentialError>;
}

fn check_id(id: &str) -> Result<(), CredentialError> {
    if id.is_empty() {
        return Err(CredentialError::InvalidCredential(
            "credential id is empty".into(),
        ));
    }
    Ok(())
}

/// Process-local credential store.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: DashMap<String, Credential>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        check_id(&credential.id)?;
        self.credentials
            .insert(credential.id.clone(), credential.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Credential, CredentialError> {
        self.credentials
            .get(id)
            .map(|c| c.value().clone())
            .ok_or_else(|| CredentialError::CredentialNotFound(id.to_string()))
    }
}

/// Credential store writing one pretty-printed `<id>.json` file per
/// credential into a directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    dir: PathBuf,
}

impl FileCredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, CredentialError> {
        check_id(id)?;
        if id.contains(['/', '\\']) || id == "." || id == ".." {
            return Err(CredentialError::InvalidCredential(format!(
                "credential id '{}' is not a valid file name",
                id
            )));
        }
        Ok(self.dir.join(format!("{}.json", id)))
    }

    /// Ids of every stored credential, sorted. A missing directory holds
    /// no credentials.
    pub fn list_ids(&self) -> Result<Vec<String>, CredentialError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl CredentialStore for FileCredentialStore {
    fn save(&self, credential: &Credential) -> Result<(), CredentialError> {
        let path = self.path_for(&credential.id)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, credential.to_json_bytes()?)?;
        tracing::debug!(credential_id = %credential.id, path = %path.display(), "credential saved");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Credential, CredentialError> {
        let path = self.path_for(id)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CredentialError::CredentialNotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Credential::from_json(&bytes)
    }
}
