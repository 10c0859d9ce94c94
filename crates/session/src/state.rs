//! Session state shared across the client.
//!
//! [`SessionState`] is the single owner of the four session slots:
//! identity, cart, favorites, and display language. Views never touch the
//! durable store directly - every mutation goes through a setter here,
//! which writes through to the [`PersistentStore`] and then notifies the
//! slot's watch channel.
//!
//! Ordering guarantee: the durable write is issued before watchers are
//! notified, so a subscriber that reacts to a notification by reading the
//! store sees the new value.
//!
//! Durable writes are best-effort: a failed write is reported to the
//! observability collaborator and the in-memory value stays authoritative
//! for every subsequent read.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;

use greengrocer_core::{CartLine, Identity, Language, ProductId};

use crate::error;
use crate::store::PersistentStore;

/// Session state shared across all consumers.
///
/// This struct is cheaply cloneable via `Arc`. Each slot is distributed
/// through its own watch channel, so subscribing to one slot never wakes
/// consumers of another.
#[derive(Clone)]
pub struct SessionState {
    inner: Arc<SessionStateInner>,
}

struct SessionStateInner {
    store: PersistentStore,
    identity: watch::Sender<Option<Identity>>,
    cart: watch::Sender<Vec<CartLine>>,
    favorites: watch::Sender<HashSet<ProductId>>,
    language: watch::Sender<Language>,
}

impl SessionState {
    /// Create a new session state over a durable store.
    ///
    /// All slots start at their compiled-in defaults (anonymous, empty,
    /// empty, Vietnamese); call [`hydrate`](Self::hydrate) to load the
    /// stored copies.
    #[must_use]
    pub fn new(store: PersistentStore) -> Self {
        Self {
            inner: Arc::new(SessionStateInner {
                store,
                identity: watch::Sender::new(None),
                cart: watch::Sender::new(Vec::new()),
                favorites: watch::Sender::new(HashSet::new()),
                language: watch::Sender::new(Language::default()),
            }),
        }
    }

    /// Load every slot from the durable store.
    ///
    /// Absent or malformed slots keep their current value (the compiled-in
    /// default at startup). Calling this again with no intervening mutation
    /// re-reads the same values, so it is idempotent.
    pub fn hydrate(&self) {
        if let Some(identity) = self.inner.store.identity() {
            error::set_sentry_user(&identity);
            self.inner.identity.send_replace(Some(identity));
        }
        if let Some(cart) = self.inner.store.cart() {
            self.inner.cart.send_replace(cart);
        }
        if let Some(favorites) = self.inner.store.favorites() {
            self.inner.favorites.send_replace(favorites);
        }
        if let Some(language) = self.inner.store.language() {
            self.inner.language.send_replace(language);
        }
        tracing::debug!("Session state hydrated");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Snapshots
    // ─────────────────────────────────────────────────────────────────────

    /// Current identity, if signed in.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.inner.identity.borrow().clone()
    }

    /// Current cart contents.
    #[must_use]
    pub fn cart(&self) -> Vec<CartLine> {
        self.inner.cart.borrow().clone()
    }

    /// Current favorite products.
    #[must_use]
    pub fn favorites(&self) -> HashSet<ProductId> {
        self.inner.favorites.borrow().clone()
    }

    /// Current display language.
    #[must_use]
    pub fn language(&self) -> Language {
        *self.inner.language.borrow()
    }

    /// Bearer token from the durable store, for the refresh service.
    #[must_use]
    pub fn stored_token(&self) -> Option<String> {
        self.inner.store.token()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Subscriptions
    // ─────────────────────────────────────────────────────────────────────

    /// Watch the identity slot.
    #[must_use]
    pub fn watch_identity(&self) -> watch::Receiver<Option<Identity>> {
        self.inner.identity.subscribe()
    }

    /// Watch the cart slot.
    #[must_use]
    pub fn watch_cart(&self) -> watch::Receiver<Vec<CartLine>> {
        self.inner.cart.subscribe()
    }

    /// Watch the favorites slot.
    #[must_use]
    pub fn watch_favorites(&self) -> watch::Receiver<HashSet<ProductId>> {
        self.inner.favorites.subscribe()
    }

    /// Watch the language slot.
    #[must_use]
    pub fn watch_language(&self) -> watch::Receiver<Language> {
        self.inner.language.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the identity slot.
    pub fn set_identity(&self, identity: Identity) {
        self.write_through("identity", self.inner.store.set_identity(&identity));
        self.inner.identity.send_replace(Some(identity));
    }

    /// Replace the cart slot.
    pub fn set_cart(&self, cart: Vec<CartLine>) {
        self.write_through("cart", self.inner.store.set_cart(&cart));
        self.inner.cart.send_replace(cart);
    }

    /// Replace the favorites slot.
    pub fn set_favorites(&self, favorites: HashSet<ProductId>) {
        self.write_through("favorites", self.inner.store.set_favorites(&favorites));
        self.inner.favorites.send_replace(favorites);
    }

    /// Replace the language slot.
    pub fn set_language(&self, language: Language) {
        self.write_through("language", self.inner.store.set_language(language));
        self.inner.language.send_replace(language);
    }

    /// Sign in: persist the bearer token under its own key, associate the
    /// user with the observability scope, and set the identity slot.
    pub fn sign_in(&self, identity: Identity) {
        if let Some(token) = identity.token.as_deref() {
            self.write_through("token", self.inner.store.set_token(token));
        }
        error::set_sentry_user(&identity);
        self.set_identity(identity);
    }

    /// Sign out: drop the identity and token from memory and durable
    /// storage. Cart, favorites, and language are not scoped to the
    /// identity and stay untouched.
    pub fn clear_identity(&self) {
        self.write_through("identity", self.inner.store.remove_identity());
        self.write_through("token", self.inner.store.remove_token());
        error::clear_sentry_user();
        self.inner.identity.send_replace(None);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Cart & favorites conveniences
    // ─────────────────────────────────────────────────────────────────────

    /// Add a line to the cart, merging quantities when the product is
    /// already present.
    pub fn add_to_cart(&self, line: CartLine) {
        let mut cart = self.cart();
        if let Some(existing) = cart.iter_mut().find(|l| l.product_id == line.product_id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            cart.push(line);
        }
        self.set_cart(cart);
    }

    /// Set the quantity of an existing line; zero removes the line.
    pub fn update_cart_line(&self, product_id: &ProductId, quantity: u32) {
        let mut cart = self.cart();
        if quantity == 0 {
            cart.retain(|l| &l.product_id != product_id);
        } else if let Some(line) = cart.iter_mut().find(|l| &l.product_id == product_id) {
            line.quantity = quantity;
        } else {
            return;
        }
        self.set_cart(cart);
    }

    /// Remove a product's line from the cart.
    pub fn remove_from_cart(&self, product_id: &ProductId) {
        self.update_cart_line(product_id, 0);
    }

    /// Toggle a product's membership in the favorites set.
    pub fn toggle_favorite(&self, product_id: ProductId) {
        let mut favorites = self.favorites();
        if !favorites.remove(&product_id) {
            favorites.insert(product_id);
        }
        self.set_favorites(favorites);
    }

    fn write_through(&self, slot: &str, result: Result<(), crate::store::StoreError>) {
        if let Err(e) = result {
            // In-memory state stays authoritative; the store is one write behind.
            error::report(&format!("Durable write for {slot} slot failed"), &e);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(verified: bool) -> Identity {
        serde_json::from_value(json!({
            "_id": "66b2f0c4e1a2",
            "name": "Lan",
            "lastname": "Nguyen",
            "documentVerified": verified,
            "token": "jwt-token"
        }))
        .unwrap()
    }

    fn line(id: &str, qty: u32) -> CartLine {
        let mut line = CartLine::new(ProductId::new(id), "Fish sauce", "4.75".parse().unwrap());
        line.quantity = qty;
        line
    }

    #[test]
    fn test_defaults_before_hydration() {
        let state = SessionState::new(PersistentStore::in_memory());
        assert!(state.identity().is_none());
        assert!(state.cart().is_empty());
        assert!(state.favorites().is_empty());
        assert_eq!(state.language(), Language::Vi);
    }

    #[test]
    fn test_hydrate_reads_stored_slots() {
        let store = PersistentStore::in_memory();
        store.set_identity(&identity(true)).unwrap();
        store.set_language(Language::En).unwrap();

        let state = SessionState::new(store);
        state.hydrate();

        assert!(state.identity().unwrap().is_verified());
        assert_eq!(state.language(), Language::En);
        // Slots the store does not hold keep their defaults.
        assert!(state.cart().is_empty());
    }

    #[test]
    fn test_hydrate_is_idempotent() {
        let store = PersistentStore::in_memory();
        store.set_language(Language::En).unwrap();

        let state = SessionState::new(store);
        state.hydrate();
        let first = (state.identity(), state.cart(), state.favorites(), state.language());
        state.hydrate();
        let second = (state.identity(), state.cart(), state.favorites(), state.language());
        assert_eq!(first, second);
    }

    #[test]
    fn test_mutation_writes_through() {
        let store = PersistentStore::in_memory();
        let state = SessionState::new(store.clone());

        state.set_cart(vec![line("p1", 2)]);
        assert_eq!(store.cart().unwrap(), vec![line("p1", 2)]);

        state.set_language(Language::En);
        assert_eq!(store.language().unwrap(), Language::En);
    }

    #[test]
    fn test_sign_in_persists_token_separately() {
        let store = PersistentStore::in_memory();
        let state = SessionState::new(store.clone());

        state.sign_in(identity(false));
        assert_eq!(store.token().unwrap(), "jwt-token");
        assert!(store.identity().is_some());
        assert_eq!(state.stored_token().unwrap(), "jwt-token");
    }

    #[test]
    fn test_clear_identity_leaves_other_slots() {
        let store = PersistentStore::in_memory();
        let state = SessionState::new(store.clone());

        state.sign_in(identity(true));
        state.set_cart(vec![line("p1", 1)]);
        state.set_language(Language::En);
        state.toggle_favorite(ProductId::new("p9"));

        state.clear_identity();

        assert!(state.identity().is_none());
        assert!(store.identity().is_none());
        assert!(store.token().is_none());
        assert_eq!(state.cart().len(), 1);
        assert_eq!(state.language(), Language::En);
        assert!(state.favorites().contains(&ProductId::new("p9")));
    }

    #[test]
    fn test_add_to_cart_merges_quantity() {
        let state = SessionState::new(PersistentStore::in_memory());
        state.add_to_cart(line("p1", 2));
        state.add_to_cart(line("p1", 3));
        state.add_to_cart(line("p2", 1));

        let cart = state.cart();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_update_cart_line_zero_removes() {
        let state = SessionState::new(PersistentStore::in_memory());
        state.add_to_cart(line("p1", 2));
        state.update_cart_line(&ProductId::new("p1"), 0);
        assert!(state.cart().is_empty());
    }

    #[test]
    fn test_update_absent_line_is_noop() {
        let state = SessionState::new(PersistentStore::in_memory());
        state.update_cart_line(&ProductId::new("nope"), 4);
        assert!(state.cart().is_empty());
    }

    #[test]
    fn test_toggle_favorite() {
        let state = SessionState::new(PersistentStore::in_memory());
        let p = ProductId::new("p1");
        state.toggle_favorite(p.clone());
        assert!(state.favorites().contains(&p));
        state.toggle_favorite(p.clone());
        assert!(!state.favorites().contains(&p));
    }

    #[tokio::test]
    async fn test_watchers_observe_mutations() {
        let state = SessionState::new(PersistentStore::in_memory());
        let mut lang_rx = state.watch_language();
        let mut cart_rx = state.watch_cart();

        state.set_language(Language::En);
        lang_rx.changed().await.unwrap();
        assert_eq!(*lang_rx.borrow_and_update(), Language::En);

        // Slot isolation: the cart watcher saw no change.
        assert!(!cart_rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_write_through_precedes_notification() {
        let store = PersistentStore::in_memory();
        let state = SessionState::new(store.clone());
        let mut rx = state.watch_cart();

        state.set_cart(vec![line("p1", 7)]);
        rx.changed().await.unwrap();

        // A watcher woken by the notification reads the new durable value.
        assert_eq!(store.cart().unwrap(), vec![line("p1", 7)]);
    }
}
