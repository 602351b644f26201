use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the shared revocation list under the root directory.
pub const REVOCATION_FILE: &str = "revoked.json";

/// Storage context for operations that touch the filesystem.
///
/// Passed explicitly into every operation that needs a location; there is
/// no process-wide active identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityContext {
    /// Base directory holding one vault directory per identity.
    pub root_dir: PathBuf,
    /// Name of the active identity vault.
    pub active: String,
}

impl IdentityContext {
    /// Create a context for an identity under a root directory.
    pub fn new(root_dir: impl Into<PathBuf>, active: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            active: active.into(),
        }
    }

    /// Whether an active identity has been selected.
    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    /// Directory of the active identity's vault.
    pub fn vault_dir(&self) -> PathBuf {
        self.root_dir.join(&self.active)
    }

    /// Directory of a named identity's vault.
    pub fn vault_dir_for(&self, name: &str) -> PathBuf {
        self.root_dir.join(name)
    }

    /// Path of the revocation list shared by every identity under the root.
    pub fn revocation_path(&self) -> PathBuf {
        self.root_dir.join(REVOCATION_FILE)
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root_dir
    }
}

impl Default for IdentityContext {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("store"),
            active: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = IdentityContext::default();
        assert_eq!(ctx.root(), Path::new("store"));
        assert!(!ctx.has_active());
    }

    #[test]
    fn test_paths() {
        let ctx = IdentityContext::new("/tmp/sovra", "alice");
        assert_eq!(ctx.vault_dir(), PathBuf::from("/tmp/sovra/alice"));
        assert_eq!(ctx.vault_dir_for("bob"), PathBuf::from("/tmp/sovra/bob"));
        assert_eq!(
            ctx.revocation_path(),
            PathBuf::from("/tmp/sovra/revoked.json")
        );
    }

    #[test]
    fn test_context_serde_roundtrip() {
        let ctx = IdentityContext::new("vaults", "issuer");
        let json = serde_json::to_string(&ctx).unwrap();
        let back: IdentityContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }
}
