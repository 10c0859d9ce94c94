//! The signed-in principal.

use serde::{Deserialize, Serialize};

use crate::types::email::Email;
use crate::types::id::UserId;

/// The signed-in user as the remote profile API describes them.
///
/// Presence of the `_id` field is what makes a session "authenticated";
/// `document_verified` is a separate gate the wholesale price display keys
/// on. The bearer token rides along so a stored identity can authorize the
/// profile refresh on the next launch.
///
/// Profile fields this layer does not interpret (addresses, permit uploads,
/// marketing flags) are kept in `extra` so a store round-trip or a refresh
/// merge never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque document ID. Empty means anonymous (defensive default when
    /// the stored copy is partial).
    #[serde(rename = "_id", default)]
    pub id: UserId,

    /// First name.
    #[serde(default)]
    pub name: String,

    /// Family name.
    #[serde(default)]
    pub lastname: String,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,

    /// Contact phone number.
    #[serde(rename = "number", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Registered business name for wholesale accounts.
    #[serde(
        rename = "businessName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub business_name: Option<String>,

    /// Whether the reseller document check has passed. Missing or malformed
    /// maps to `false`, the more restrictive state.
    #[serde(rename = "documentVerified", default)]
    pub document_verified: bool,

    /// Bearer credential for the profile API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Uninterpreted profile fields, preserved through round-trips.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Identity {
    /// Whether this identity names an actual principal.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.id.is_empty()
    }

    /// Whether the document verification gate has passed.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.document_verified
    }

    /// Display name for greeting and observability scopes.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.name, self.lastname);
        let full = full.trim();
        if full.is_empty() {
            self.id.as_str().to_owned()
        } else {
            full.to_owned()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Identity {
        serde_json::from_value(json!({
            "_id": "66b2f0c4e1a2",
            "name": "Lan",
            "lastname": "Nguyen",
            "email": "lan@example.com",
            "number": "0901234567",
            "documentVerified": true,
            "token": "jwt-token",
            "businessName": "Lan's Kitchen",
            "resellerPermit": "permit.pdf"
        }))
        .unwrap()
    }

    #[test]
    fn test_authenticated_and_verified() {
        let identity = sample();
        assert!(identity.is_authenticated());
        assert!(identity.is_verified());
    }

    #[test]
    fn test_missing_id_is_anonymous() {
        let identity: Identity = serde_json::from_value(json!({ "name": "Lan" })).unwrap();
        assert!(!identity.is_authenticated());
    }

    #[test]
    fn test_missing_verification_flag_defaults_unverified() {
        let identity: Identity =
            serde_json::from_value(json!({ "_id": "66b2f0c4e1a2" })).unwrap();
        assert!(identity.is_authenticated());
        assert!(!identity.is_verified());
    }

    #[test]
    fn test_business_name_is_typed() {
        let identity = sample();
        assert_eq!(identity.business_name.as_deref(), Some("Lan's Kitchen"));
        // A typed field never shadows into the flattened map.
        assert!(!identity.extra.contains_key("businessName"));
    }

    #[test]
    fn test_unknown_fields_survive_roundtrip() {
        let identity = sample();
        assert_eq!(
            identity.extra.get("resellerPermit"),
            Some(&json!("permit.pdf"))
        );

        let json = serde_json::to_value(&identity).unwrap();
        let back: Identity = serde_json::from_value(json).unwrap();
        assert_eq!(back, identity);
        assert_eq!(
            back.extra.get("resellerPermit"),
            Some(&json!("permit.pdf"))
        );
    }

    #[test]
    fn test_display_name() {
        let identity = sample();
        assert_eq!(identity.display_name(), "Lan Nguyen");

        let anonymous: Identity =
            serde_json::from_value(json!({ "_id": "66b2f0c4e1a2" })).unwrap();
        assert_eq!(anonymous.display_name(), "66b2f0c4e1a2");
    }
}
