//! Core types for Greengrocer.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod email;
pub mod id;
pub mod identity;
pub mod language;
pub mod money;

pub use cart::CartLine;
pub use email::{Email, EmailError};
pub use id::*;
pub use identity::Identity;
pub use language::{Language, LanguageError};
pub use money::format_amount;
