use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::profile::{Profile, Role};

/// The authoritative user record GoTrue returns for a valid access token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

impl AuthUser {
    /// Phone captured at signup lives in the user metadata blob.
    pub fn metadata_phone(&self) -> Option<String> {
        self.user_metadata
            .get("phone")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Auth record and profile row merged into one identity. The role is what
/// gates the coach dashboard and admin panel.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub registered_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn merge(auth: &AuthUser, profile: &Profile) -> Self {
        Self {
            user_id: auth.id,
            email: auth.email.clone().or_else(|| profile.email.clone()),
            phone: profile.phone.clone().or_else(|| auth.metadata_phone()),
            role: profile.role,
            registered_at: profile.created_at,
        }
    }
}

/// Outcome of session reconciliation. Every failure path collapses to
/// `Unauthenticated` after tearing the session down; there is no partial
/// identity with guessed fields.
#[derive(Debug, Clone)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(Identity),
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Unauthenticated => None,
        }
    }
}
