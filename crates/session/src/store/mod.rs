//! Durable slot storage.
//!
//! Four named slots of session state (plus the bearer token) are mirrored
//! to a key-value store that survives restarts. The store is never the
//! source of truth - the in-memory [`crate::state::SessionState`] is - so
//! reads are defensive: malformed stored data degrades to "absent" with a
//! warning instead of failing the caller.
//!
//! Storage keys match the upstream web client so an existing profile
//! survives a client swap.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use greengrocer_core::{CartLine, Identity, Language, ProductId};

/// Errors that can occur when touching the durable store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Value could not be serialized for storage.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The four durable slots of session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Identity,
    Cart,
    Favorites,
    Language,
}

impl Slot {
    /// Storage key for this slot (upstream web client naming).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Identity => "userDetail",
            Self::Cart => "addCartDetail",
            Self::Favorites => "favoriteProducts",
            Self::Language => "LANGUAGE",
        }
    }
}

/// Storage key for the bearer token, read by the refresh service.
pub const TOKEN_KEY: &str = "token";

/// A raw string-keyed durable store.
///
/// Implementations must be independent per key: there is no ordering or
/// transactionality guarantee across keys.
pub trait StorageBackend: Send + Sync {
    /// Read the raw text stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage faults (I/O); an absent key is
    /// `Ok(None)`.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write raw text under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be durably written.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal itself failed.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed adapter over a [`StorageBackend`].
///
/// Identity, cart, and favorites serialize as JSON; the language slot and
/// the bearer token are stored as plain text. Getters never fail: a read
/// or parse problem is logged and reported as "absent".
#[derive(Clone)]
pub struct PersistentStore {
    backend: Arc<dyn StorageBackend>,
}

impl PersistentStore {
    /// Wrap an arbitrary backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// File-backed store rooted at `dir`.
    pub fn file(dir: impl AsRef<Path>) -> Self {
        Self::new(FileStore::new(dir))
    }

    /// Volatile in-memory store (tests, embedders without disk access).
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::default())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Identity
    // ─────────────────────────────────────────────────────────────────────

    /// Stored identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.read_json(Slot::Identity)
    }

    /// Mirror the identity slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the durable write failed.
    pub fn set_identity(&self, identity: &Identity) -> Result<(), StoreError> {
        self.write_json(Slot::Identity, identity)
    }

    /// Drop the identity slot (sign-out).
    ///
    /// # Errors
    ///
    /// Returns an error if the removal failed.
    pub fn remove_identity(&self) -> Result<(), StoreError> {
        self.backend.remove(Slot::Identity.key())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cart
    // ─────────────────────────────────────────────────────────────────────

    /// Stored cart, if any.
    #[must_use]
    pub fn cart(&self) -> Option<Vec<CartLine>> {
        self.read_json(Slot::Cart)
    }

    /// Mirror the cart slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the durable write failed.
    pub fn set_cart(&self, cart: &[CartLine]) -> Result<(), StoreError> {
        self.write_json(Slot::Cart, &cart)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Favorites
    // ─────────────────────────────────────────────────────────────────────

    /// Stored favorites, if any.
    #[must_use]
    pub fn favorites(&self) -> Option<HashSet<ProductId>> {
        self.read_json(Slot::Favorites)
    }

    /// Mirror the favorites slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the durable write failed.
    pub fn set_favorites(&self, favorites: &HashSet<ProductId>) -> Result<(), StoreError> {
        self.write_json(Slot::Favorites, favorites)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Language
    // ─────────────────────────────────────────────────────────────────────

    /// Stored language preference, if any.
    ///
    /// The slot holds the bare locale code, not JSON. Unsupported codes are
    /// treated as absent.
    #[must_use]
    pub fn language(&self) -> Option<Language> {
        let raw = self.read_raw(Slot::Language.key())?;
        match Language::parse(raw.trim()) {
            Ok(language) => Some(language),
            Err(e) => {
                tracing::warn!(slot = Slot::Language.key(), error = %e, "Ignoring malformed stored value");
                None
            }
        }
    }

    /// Mirror the language slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable write failed.
    pub fn set_language(&self, language: Language) -> Result<(), StoreError> {
        self.backend.write(Slot::Language.key(), language.as_str())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Bearer token
    // ─────────────────────────────────────────────────────────────────────

    /// Stored bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.read_raw(TOKEN_KEY)
    }

    /// Mirror the bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable write failed.
    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.backend.write(TOKEN_KEY, token)
    }

    /// Drop the bearer token (sign-out).
    ///
    /// # Errors
    ///
    /// Returns an error if the removal failed.
    pub fn remove_token(&self) -> Result<(), StoreError> {
        self.backend.remove(TOKEN_KEY)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Raw access
    // ─────────────────────────────────────────────────────────────────────

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.backend.read(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Store read failed, treating slot as absent");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, slot: Slot) -> Option<T> {
        let raw = self.read_raw(slot.key())?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(slot = slot.key(), error = %e, "Ignoring malformed stored value");
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, slot: Slot, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.backend.write(slot.key(), &raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity() -> Identity {
        serde_json::from_value(json!({
            "_id": "66b2f0c4e1a2",
            "name": "Lan",
            "documentVerified": true,
            "token": "jwt-token"
        }))
        .unwrap()
    }

    #[test]
    fn test_identity_roundtrip() {
        let store = PersistentStore::in_memory();
        assert!(store.identity().is_none());

        let user = identity();
        store.set_identity(&user).unwrap();
        assert_eq!(store.identity().unwrap(), user);

        store.remove_identity().unwrap();
        assert!(store.identity().is_none());
    }

    #[test]
    fn test_cart_roundtrip() {
        let store = PersistentStore::in_memory();
        let cart = vec![CartLine::new(
            ProductId::new("p1"),
            "Rice paper",
            "2.50".parse().unwrap(),
        )];
        store.set_cart(&cart).unwrap();
        assert_eq!(store.cart().unwrap(), cart);
    }

    #[test]
    fn test_favorites_roundtrip() {
        let store = PersistentStore::in_memory();
        let favorites: HashSet<ProductId> =
            [ProductId::new("p1"), ProductId::new("p2")].into_iter().collect();
        store.set_favorites(&favorites).unwrap();
        assert_eq!(store.favorites().unwrap(), favorites);
    }

    #[test]
    fn test_language_stored_as_plain_text() {
        let store = PersistentStore::in_memory();
        store.set_language(Language::En).unwrap();

        // The slot must hold the bare code, not a JSON string.
        let raw = store.read_raw(Slot::Language.key()).unwrap();
        assert_eq!(raw, "en");
        assert_eq!(store.language().unwrap(), Language::En);
    }

    #[test]
    fn test_malformed_identity_reads_as_absent() {
        let store = PersistentStore::in_memory();
        store
            .backend
            .write(Slot::Identity.key(), "{not json")
            .unwrap();
        assert!(store.identity().is_none());
    }

    #[test]
    fn test_unsupported_language_reads_as_absent() {
        let store = PersistentStore::in_memory();
        store.backend.write(Slot::Language.key(), "xx").unwrap();
        assert!(store.language().is_none());
    }

    #[test]
    fn test_token_roundtrip() {
        let store = PersistentStore::in_memory();
        assert!(store.token().is_none());
        store.set_token("jwt-abc").unwrap();
        assert_eq!(store.token().unwrap(), "jwt-abc");
        store.remove_token().unwrap();
        assert!(store.token().is_none());
    }

    #[test]
    fn test_slots_are_independent() {
        let store = PersistentStore::in_memory();
        store.set_identity(&identity()).unwrap();
        store.set_language(Language::En).unwrap();

        store.remove_identity().unwrap();
        assert_eq!(store.language().unwrap(), Language::En);
    }
}
