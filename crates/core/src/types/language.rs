//! Display language preference.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unsupported locale code.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unsupported language code: {0}")]
pub struct LanguageError(pub String);

/// Supported display languages.
///
/// The storefront ships Vietnamese-first; `vi` is the compiled-in default
/// used whenever the durable store has no language slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Vietnamese (default).
    #[default]
    Vi,
    /// English.
    En,
}

impl Language {
    /// The locale code as stored in the durable `LANGUAGE` slot.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vi => "vi",
            Self::En => "en",
        }
    }

    /// Parse a stored locale code.
    ///
    /// # Errors
    ///
    /// Returns an error for codes outside the supported set; callers fall
    /// back to [`Language::default`].
    pub fn parse(code: &str) -> Result<Self, LanguageError> {
        match code {
            "vi" => Ok(Self::Vi),
            "en" => Ok(Self::En),
            other => Err(LanguageError(other.to_owned())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
