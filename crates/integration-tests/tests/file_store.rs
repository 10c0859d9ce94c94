//! File-backed store tests: durability across re-opens, defensive reads.

#![allow(clippy::unwrap_used)]

use std::fs;

use greengrocer_core::{CartLine, Language, ProductId};
use greengrocer_integration_tests::identity_fixture;
use greengrocer_session::state::SessionState;
use greengrocer_session::store::PersistentStore;

#[test]
fn slots_survive_a_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let store = PersistentStore::file(dir.path());
    let identity = identity_fixture(true, Some("jwt-abc"));
    store.set_identity(&identity).unwrap();
    store
        .set_cart(&[CartLine::new(
            ProductId::new("p1"),
            "Rice paper",
            "2.50".parse().unwrap(),
        )])
        .unwrap();
    store.set_language(Language::En).unwrap();
    store.set_token("jwt-abc").unwrap();

    // A fresh adapter over the same directory sees the same values.
    let reopened = PersistentStore::file(dir.path());
    assert_eq!(reopened.identity().unwrap(), identity);
    assert_eq!(reopened.cart().unwrap().len(), 1);
    assert_eq!(reopened.language().unwrap(), Language::En);
    assert_eq!(reopened.token().unwrap(), "jwt-abc");
}

#[test]
fn files_use_upstream_key_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = PersistentStore::file(dir.path());

    store
        .set_identity(&identity_fixture(false, None))
        .unwrap();
    store.set_language(Language::Vi).unwrap();

    assert!(dir.path().join("userDetail").exists());
    assert!(dir.path().join("LANGUAGE").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("LANGUAGE")).unwrap(),
        "vi"
    );
}

#[test]
fn corrupted_identity_file_hydrates_as_anonymous() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("userDetail"), "{definitely not json").unwrap();
    fs::write(dir.path().join("LANGUAGE"), "en").unwrap();

    let state = SessionState::new(PersistentStore::file(dir.path()));
    state.hydrate();

    // Corruption degrades locally; the healthy slot still hydrates.
    assert!(state.identity().is_none());
    assert_eq!(state.language(), Language::En);
}

#[test]
fn stored_language_overrides_default() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("LANGUAGE"), "en").unwrap();

    let state = SessionState::new(PersistentStore::file(dir.path()));
    assert_eq!(state.language(), Language::Vi);
    state.hydrate();
    assert_eq!(state.language(), Language::En);
}
