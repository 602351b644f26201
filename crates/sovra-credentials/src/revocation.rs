//! File-backed revocation registry.
//!
//! The list is loaded once, mutated in memory and flushed to disk on every
//! revocation. Writers in separate processes are not coordinated.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use sovra_core::RevocationStatus;

use crate::error::CredentialError;

/// Set of revoked credential identifiers persisted as a JSON array.
#[derive(Debug)]
pub struct RevocationList {
    path: PathBuf,
    revoked: RwLock<HashSet<String>>,
}

impl RevocationList {
    /// Load the list at `path`. A missing or empty file is an empty list.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let path = path.into();
        let revoked = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => HashSet::new(),
            Ok(bytes) => {
                let ids: Vec<String> = serde_json::from_slice(&bytes).map_err(|e| {
                    CredentialError::InvalidJson(format!("{}: {}", path.display(), e))
                })?;
                ids.into_iter().collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), entries = revoked.len(), "revocation list loaded");
        Ok(Self {
            path,
            revoked: RwLock::new(revoked),
        })
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Revoke an identifier and persist the list before returning.
    ///
    /// The write lock is held across check, insert and flush. If the flush
    /// fails the identifier is removed again.
    pub fn revoke(&self, id: &str) -> Result<(), CredentialError> {
        let mut revoked = self.revoked.write().unwrap_or_else(PoisonError::into_inner);

        // the only failing transition is Revoked -> Revoked
        RevocationStatus::from_membership(revoked.contains(id))
            .revoke()
            .map_err(|_| CredentialError::AlreadyRevoked(id.to_string()))?;

        revoked.insert(id.to_string());
        if let Err(e) = self.persist(&revoked) {
            revoked.remove(id);
            tracing::warn!(credential_id = id, error = %e, "revocation not persisted");
            return Err(e);
        }

        tracing::info!(credential_id = id, "credential revoked");
        Ok(())
    }

    /// Whether an identifier has been revoked.
    pub fn is_revoked(&self, id: &str) -> bool {
        self.revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(id)
    }

    /// Revocation status of an identifier.
    pub fn status(&self, id: &str) -> RevocationStatus {
        RevocationStatus::from_membership(self.is_revoked(id))
    }

    /// Every revoked identifier, in no particular order.
    pub fn list(&self) -> Vec<String> {
        self.revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.revoked
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, revoked: &HashSet<String>) -> Result<(), CredentialError> {
        let mut ids: Vec<&String> = revoked.iter().collect();
        ids.sort();
        let bytes = serde_json::to_vec_pretty(&ids)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}
