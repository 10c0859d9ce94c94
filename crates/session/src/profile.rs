//! Remote profile client and the once-per-lifetime identity refresh.
//!
//! The canonical identity record lives behind `GET /v1/api/getProfile`.
//! When a stored identity is present at startup, [`RefreshService`] pulls
//! the canonical record once and merges it into the session, so changes
//! made elsewhere (a completed document verification, most importantly)
//! reach this client without a re-login.
//!
//! The refresh is deliberately asymmetric: a success latches permanently
//! for the application lifetime, a failure leaves the latch open so a later
//! qualifying call may try again. There is no automatic retry.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use greengrocer_core::Identity;

use crate::config::SessionConfig;
use crate::error;
use crate::state::SessionState;

/// Path of the profile endpoint on the API origin.
const PROFILE_PATH: &str = "/v1/api/getProfile";

/// Errors that can occur when fetching the remote profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// HTTP transport failed or the body was not valid JSON.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response from the profile endpoint.
    #[error("Profile request failed with status {0}")]
    Status(u16),

    /// Well-formed response signaling failure (falsy status or no data).
    #[error("Profile request rejected by the API")]
    Rejected,

    /// The data payload does not describe an identity.
    #[error("Malformed profile payload: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    status: bool,
    data: Option<serde_json::Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Profile Client
// ─────────────────────────────────────────────────────────────────────────────

/// Client for the remote profile API.
#[derive(Clone)]
pub struct ProfileClient {
    inner: Arc<ProfileClientInner>,
}

struct ProfileClientInner {
    client: reqwest::Client,
    base_url: url::Url,
}

impl ProfileClient {
    /// Create a new profile client.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            inner: Arc::new(ProfileClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
            }),
        }
    }

    /// Fetch the canonical profile record for the given bearer token.
    ///
    /// Success means a 2xx response whose body carries a truthy `status`
    /// and a `data` object; everything else is an error.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] for transport failures, non-2xx statuses,
    /// and well-formed rejections.
    pub async fn fetch_profile(&self, token: &str) -> Result<serde_json::Value, ProfileError> {
        let url = self
            .inner
            .base_url
            .join(PROFILE_PATH)
            .map_err(|_| ProfileError::Rejected)?;

        let response = self
            .inner
            .client
            .get(url)
            .header("Authorization", format!("jwt {token}"))
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProfileError::Status(status.as_u16()));
        }

        let body: ProfileResponse = response.json().await?;
        if !body.status {
            return Err(ProfileError::Rejected);
        }

        body.data.ok_or(ProfileError::Rejected)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Refresh Service
// ─────────────────────────────────────────────────────────────────────────────

/// Progress of the once-per-lifetime refresh.
///
/// An explicit state field owned by the service instance - not ambient
/// global state. `InFlight` closes the concurrent-call window without
/// holding a lock across the network await; `Completed` never resets
/// within the application lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshPhase {
    Idle,
    InFlight,
    Completed,
}

/// What a call to [`RefreshService::refresh_if_needed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Preconditions not met, or a refresh already ran (or is running).
    Skipped,
    /// The canonical record was fetched and merged.
    Refreshed,
    /// The attempt failed; reported to observability, identity unchanged.
    Failed,
}

/// Pulls the canonical identity once per application lifetime.
pub struct RefreshService {
    client: ProfileClient,
    state: SessionState,
    phase: Mutex<RefreshPhase>,
}

impl RefreshService {
    /// Create a refresh service over the shared session state.
    #[must_use]
    pub fn new(config: &SessionConfig, state: SessionState) -> Self {
        Self::with_client(ProfileClient::new(config), state)
    }

    /// Create a refresh service with an explicit client (tests point this
    /// at a mock server).
    #[must_use]
    pub fn with_client(client: ProfileClient, state: SessionState) -> Self {
        Self {
            client,
            state,
            phase: Mutex::new(RefreshPhase::Idle),
        }
    }

    /// Refresh the identity from the remote profile, at most once per
    /// application lifetime.
    ///
    /// No-ops when the identity is absent, no bearer token is available,
    /// a refresh already completed, or one is in flight. On success the
    /// payload replaces the identity (bearer token carried over) and the
    /// latch closes permanently. On failure the identity keeps its
    /// last-known-good value and the latch reopens.
    ///
    /// Call this on the "identity became present" transition, not from the
    /// render path.
    pub async fn refresh_if_needed(&self) -> RefreshOutcome {
        let Some(current) = self.state.identity() else {
            return RefreshOutcome::Skipped;
        };
        if !current.is_authenticated() {
            return RefreshOutcome::Skipped;
        }
        let Some(token) = current.token.clone().or_else(|| self.state.stored_token()) else {
            tracing::debug!("No bearer token available, skipping profile refresh");
            return RefreshOutcome::Skipped;
        };

        {
            let mut phase = self.phase.lock().await;
            match *phase {
                RefreshPhase::Completed | RefreshPhase::InFlight => {
                    return RefreshOutcome::Skipped;
                }
                RefreshPhase::Idle => *phase = RefreshPhase::InFlight,
            }
        }

        match self.fetch_and_merge(&token).await {
            Ok(()) => {
                *self.phase.lock().await = RefreshPhase::Completed;
                tracing::info!("Profile refreshed");
                RefreshOutcome::Refreshed
            }
            Err(e) => {
                // Failure is not sticky: a later qualifying call may retry.
                *self.phase.lock().await = RefreshPhase::Idle;
                error::report("Profile refresh failed", &e);
                RefreshOutcome::Failed
            }
        }
    }

    async fn fetch_and_merge(&self, token: &str) -> Result<(), ProfileError> {
        let data = self.client.fetch_profile(token).await?;

        // The payload replaces the identity wholesale; only the bearer
        // token is carried over from the session.
        let mut refreshed: Identity = serde_json::from_value(data)?;
        refreshed.token = Some(token.to_owned());

        self.state.set_identity(refreshed);
        Ok(())
    }
}
