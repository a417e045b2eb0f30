use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::session::Identity;

#[derive(Deserialize)]
pub struct SignupIn {
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginIn {
    pub email: String,
    pub password: String,
}

/// Token bundle handed back by the auth backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOut {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user_id: Uuid,
    pub next_step: String,
}

/// Login result: the session plus the merged identity. The client routes on
/// `identity.role` (admin panel, coach dashboard, member pages).
#[derive(Serialize)]
pub struct LoginResponse {
    pub session: SessionOut,
    pub identity: Identity,
}
