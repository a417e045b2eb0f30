use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::dtos::auth_dtos::SessionOut;
use crate::models::profile::{NewProfile, Profile};
use crate::models::session::{AuthUser, Identity, SessionState};
use crate::repositories::RepoError;
use crate::repositories::profile_repo::ProfileRepo;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("supabase error: {0}")]
    Supabase(String),
    #[error("profile error: {0}")]
    Repo(#[from] RepoError),
    #[error("parse uuid error")]
    UuidError(#[from] uuid::Error),
}

/// GoTrue client plus the session/role reconciliation flow. Stateless per
/// call: concurrent reconciliations for the same token cannot corrupt each
/// other because nothing is shared between them.
#[derive(Clone)]
pub struct AuthService {
    client: Client,
    auth_base_url: String,
    anon_key: String,
    profiles: ProfileRepo,
}

#[derive(Deserialize)]
struct TokenResp {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    token_type: Option<String>,
    user: Option<AuthUser>,
}

impl AuthService {
    pub fn new(client: Client, config: &Config, profiles: ProfileRepo) -> Self {
        Self {
            client,
            auth_base_url: config.auth_url(),
            anon_key: config.supabase_anon_key.clone(),
            profiles,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.auth_base_url.trim_end_matches('/'), path)
    }

    /// Create the auth account (phone goes into user metadata) and then the
    /// profile row. A failed profile insert is logged and tolerated: the
    /// backend may create the row through a trigger, and reconciliation
    /// creates it lazily on first sign-in either way.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        phone: Option<String>,
    ) -> Result<Uuid, AuthError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": { "phone": phone.clone() },
        });

        let resp = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AuthError::Supabase(signup_error_message(&text, status)));
        }

        let json_val: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| AuthError::Supabase(format!("invalid json: {}", e)))?;
        let user_id_str = json_val
            .get("user")
            .and_then(|u| u.get("id"))
            .or_else(|| json_val.get("id"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| AuthError::Supabase("signup returned no user id".to_string()))?;
        let user_id = Uuid::parse_str(user_id_str)?;

        let profile = NewProfile::user(user_id, Some(email.to_string()), phone);
        if let Err(e) = self.profiles.insert(&profile).await {
            log::warn!("profile insert after signup failed for {}: {}", user_id, e);
        }

        Ok(user_id)
    }

    /// Password grant. Returns the session and the merged identity; a user
    /// without a profile row gets one created here.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(SessionOut, Identity), AuthError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let resp = self
            .client
            .post(self.endpoint("token?grant_type=password"))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AuthError::Supabase(format!(
                "login failed: {} {}",
                status, text
            )));
        }

        let tr: TokenResp = serde_json::from_str(&text)
            .map_err(|e| AuthError::Supabase(format!("invalid json in login response: {}", e)))?;
        let auth_user = tr
            .user
            .ok_or_else(|| AuthError::Supabase("no user info in login response".to_string()))?;

        let profile = match self.load_or_create_profile(&auth_user).await {
            Ok(profile) => profile,
            Err(e) => {
                // fail closed: a session without a profile is torn down
                self.sign_out_best_effort(&tr.access_token).await;
                return Err(e);
            }
        };

        let session = SessionOut {
            access_token: tr.access_token,
            refresh_token: tr.refresh_token,
            expires_in: tr.expires_in,
            token_type: tr.token_type,
        };
        Ok((session, Identity::merge(&auth_user, &profile)))
    }

    /// The authoritative user record for an access token.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let resp = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AuthError::Supabase(format!(
                "get user failed: {} {}",
                status, text
            )));
        }
        serde_json::from_str(&text)
            .map_err(|e| AuthError::Supabase(format!("invalid json in user response: {}", e)))
    }

    /// Revoke the session. Used for explicit logout and as the teardown step
    /// of every reconciliation failure.
    pub async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let resp = self
            .client
            .post(self.endpoint("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AuthError::Supabase(format!(
                "logout failed: {} {}",
                status, text
            )));
        }
        Ok(())
    }

    async fn sign_out_best_effort(&self, access_token: &str) {
        if let Err(e) = self.sign_out(access_token).await {
            log::warn!("session teardown failed: {}", e);
        }
    }

    /// Load the profile for an auth user, creating it on the specific
    /// not-found signal with role `user` and contact data from the auth
    /// record. Any other error propagates.
    pub async fn load_or_create_profile(&self, auth: &AuthUser) -> Result<Profile, AuthError> {
        match self.profiles.get(auth.id).await {
            Ok(profile) => Ok(profile),
            Err(RepoError::NotFound) => {
                let new_profile =
                    NewProfile::user(auth.id, auth.email.clone(), auth.metadata_phone());
                let created = self.profiles.insert(&new_profile).await?;
                log::info!("created profile for first sign-in of {}", auth.id);
                Ok(created)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Session/role reconciliation: token in, `SessionState` out. Every
    /// failure path tears the session down and reports unauthenticated;
    /// the flow never errors outward. Idempotent, safe to invoke
    /// concurrently for the same token.
    pub async fn reconcile(&self, access_token: &str) -> SessionState {
        let auth_user = match self.get_user(access_token).await {
            Ok(user) => user,
            Err(e) => {
                log::debug!("reconcile: no auth user for token: {}", e);
                self.sign_out_best_effort(access_token).await;
                return SessionState::Unauthenticated;
            }
        };

        match self.load_or_create_profile(&auth_user).await {
            Ok(profile) => SessionState::Authenticated(Identity::merge(&auth_user, &profile)),
            Err(e) => {
                log::error!("reconcile: profile load failed for {}: {}", auth_user.id, e);
                self.sign_out_best_effort(access_token).await;
                SessionState::Unauthenticated
            }
        }
    }
}

/// Pull the human-readable message out of a GoTrue error body.
fn signup_error_message(text: &str, status: reqwest::StatusCode) -> String {
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(text) {
        if let Some(msg) = error_json.get("msg").or_else(|| error_json.get("message")) {
            if let Some(msg) = msg.as_str() {
                return msg.to_string();
            }
        }
    }
    format!("signup failed: {} {}", status, text)
}
