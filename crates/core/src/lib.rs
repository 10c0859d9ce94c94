//! Greengrocer Core - Shared domain types.
//!
//! This crate provides the common types used by the session layer and any
//! embedding frontend:
//!
//! - [`types::id`] - Typed string IDs (`UserId`, `ProductId`)
//! - [`types::email`] - Structurally validated email addresses
//! - [`types::language`] - Supported locale codes
//! - [`types::identity`] - The signed-in principal
//! - [`types::cart`] - Cart line items
//! - [`types::money`] - Currency display formatting
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP, no storage access.
//! Everything here is plain data that serializes cleanly across the storage
//! and wire boundaries.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
