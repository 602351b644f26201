//! Integration test: revocation registry shared by concurrent writers and
//! reopened from disk.

use std::sync::Arc;
use std::thread;

use serde_json::json;

use sovra_core::{IdentityContext, RevocationStatus};
use sovra_credentials::{verify_credential, CredentialError, RevocationList};
use sovra_identity::Identity;
use sovra_integration_tests::{issue, temp_dir};

#[test]
fn test_revocation_is_independent_of_signature() {
    let root = temp_dir("revocation");
    let ctx = IdentityContext::new(&root, "alice");
    let issuer = Identity::generate();
    let credential = issue(&issuer, "C1", json!({"age": 30}));

    let list = RevocationList::open(ctx.revocation_path()).unwrap();
    list.revoke(&credential.id).unwrap();

    // signature stays valid; trust decisions consult the list
    assert!(verify_credential(&credential).is_ok());
    assert!(list.is_revoked(&credential.id));

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_revocation_monotonic_across_reload() {
    let root = temp_dir("revocation");
    let path = IdentityContext::new(&root, "alice").revocation_path();

    {
        let list = RevocationList::open(&path).unwrap();
        list.revoke("C1").unwrap();
    }

    let list = RevocationList::open(&path).unwrap();
    assert_eq!(list.status("C1"), RevocationStatus::Revoked);
    assert!(matches!(
        list.revoke("C1"),
        Err(CredentialError::AlreadyRevoked(_))
    ));
    list.revoke("C2").unwrap();

    let mut ids = RevocationList::open(&path).unwrap().list();
    ids.sort();
    assert_eq!(ids, vec!["C1", "C2"]);

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn test_concurrent_readers_and_writers() {
    let root = temp_dir("revocation");
    let list = Arc::new(RevocationList::open(root.join("revoked.json")).unwrap());

    let writers: Vec<_> = (0..4)
        .map(|w| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                for i in 0..25 {
                    list.revoke(&format!("w{}-{}", w, i)).unwrap();
                }
            })
        })
        .collect();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let list = Arc::clone(&list);
            thread::spawn(move || {
                for _ in 0..50 {
                    let _ = list.is_revoked("w0-0");
                    let _ = list.list();
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(list.len(), 100);
    assert_eq!(RevocationList::open(list.path()).unwrap().len(), 100);

    let _ = std::fs::remove_dir_all(&root);
}
