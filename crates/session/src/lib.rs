//! Greengrocer Session - client session state and visibility gating.
//!
//! This crate is the state backbone of the storefront client. It owns four
//! slots of session state - identity, cart, favorites, and display language -
//! and keeps them synchronized with a durable key-value store, so the user
//! picks up where they left off after a restart.
//!
//! # Architecture
//!
//! - [`store`] - Durable slot storage behind a backend trait (file or
//!   in-memory), with defensive deserialization: malformed stored data
//!   degrades to the compiled-in default, never to an error.
//! - [`state`] - The in-memory [`state::SessionState`] container. Every
//!   mutation writes through to the store, then notifies per-slot watch
//!   channels so consumers never observe a stale slot.
//! - [`profile`] - The identity refresh client. Runs at most once per
//!   application lifetime when an identity is present; success is sticky,
//!   failure is not.
//! - [`visibility`] - The pure decision table gating wholesale prices behind
//!   sign-in and document verification.
//!
//! # Example
//!
//! ```rust,no_run
//! use greengrocer_session::config::SessionConfig;
//! use greengrocer_session::profile::RefreshService;
//! use greengrocer_session::state::SessionState;
//! use greengrocer_session::store::PersistentStore;
//! use greengrocer_session::visibility::{self, PriceTag};
//!
//! # async fn run() -> Result<(), greengrocer_session::error::SessionError> {
//! let config = SessionConfig::from_env()?;
//! let state = SessionState::new(PersistentStore::file(&config.data_dir));
//! state.hydrate();
//!
//! let refresh = RefreshService::new(&config, state.clone());
//! refresh.refresh_if_needed().await;
//!
//! let identity = state.identity();
//! let tag = PriceTag::new("12.5".parse().ok());
//! let view = visibility::render(&tag, identity.as_ref(), &config.currency_symbol);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod profile;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod visibility;
