//! Shared helpers for Greengrocer integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use serde_json::json;

use greengrocer_core::Identity;
use greengrocer_session::config::SessionConfig;
use greengrocer_session::state::SessionState;
use greengrocer_session::store::PersistentStore;

/// A config pointing the profile API at a mock server.
#[must_use]
pub fn config_for(api_uri: &str) -> SessionConfig {
    SessionConfig {
        api_base_url: url::Url::parse(api_uri).unwrap(),
        ..SessionConfig::default()
    }
}

/// An identity fixture as the profile API would describe it.
#[must_use]
pub fn identity_fixture(verified: bool, token: Option<&str>) -> Identity {
    serde_json::from_value(json!({
        "_id": "66b2f0c4e1a2",
        "name": "Lan",
        "lastname": "Nguyen",
        "email": "lan@example.com",
        "number": "0901234567",
        "documentVerified": verified,
        "token": token,
    }))
    .unwrap()
}

/// An in-memory session with a signed-in, unverified user.
#[must_use]
pub fn signed_in_state(token: &str) -> SessionState {
    let state = SessionState::new(PersistentStore::in_memory());
    state.sign_in(identity_fixture(false, Some(token)));
    state
}
