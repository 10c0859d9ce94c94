//! Unified error handling with Sentry integration.
//!
//! Each module carries its own error enum; `SessionError` unifies them for
//! embedders that want a single `Result` type at the application boundary.
//! Failures this layer swallows by design (best-effort durable writes,
//! refresh failures) are reported through [`report`] instead of propagating.

use thiserror::Error;

use greengrocer_core::Identity;

use crate::config::ConfigError;
use crate::profile::ProfileError;
use crate::store::StoreError;

/// Application-level error type for the session layer.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Durable store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Profile API operation failed.
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Result type alias for `SessionError`.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Report a swallowed error to the observability collaborator.
///
/// Logs at error level and captures to Sentry (a no-op when no Sentry
/// client is initialized). Used where a failure must not interrupt the
/// user: write-through and refresh failures.
pub fn report(context: &str, err: &(dyn std::error::Error + 'static)) {
    let event_id = sentry::capture_error(err);
    tracing::error!(error = %err, sentry_event_id = %event_id, "{context}");
}

/// Set the Sentry user context from an identity.
///
/// Call this after sign-in or hydration of a stored identity so captured
/// errors are associated with the user.
pub fn set_sentry_user(identity: &Identity) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(identity.id.to_string()),
            email: identity.email.as_ref().map(ToString::to_string),
            username: Some(identity.display_name()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SessionError::from(ConfigError::InvalidEnvVar(
            "GROCER_API_BASE_URL".to_string(),
            "relative URL without a base".to_string(),
        ));
        assert_eq!(
            err.to_string(),
            "Config error: Invalid environment variable GROCER_API_BASE_URL: relative URL without a base"
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SessionError = StoreError::from(io).into();
        assert!(matches!(err, SessionError::Store(_)));
    }
}
