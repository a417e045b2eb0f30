use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Access level stored on the profile row. Gates the coach dashboard and the
/// admin panel; everything else is open to `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coach,
    Admin,
    /// Unknown strings collapse to `user`; old rows carry free-form values.
    #[serde(other)]
    User,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Coach => "coach",
            Role::Admin => "admin",
        }
    }
}

/// A `null` role reads as `user`, same as absent.
fn role_or_user<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Role>::deserialize(deserializer)?.unwrap_or_default())
}

/// Row in the `profiles` table. `id` equals the auth user id; the row is
/// created lazily on first sign-in when missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "role_or_user")]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert shape for `profiles`. The server always sets the role; clients
/// never pick their own.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl NewProfile {
    pub fn user(id: Uuid, email: Option<String>, phone: Option<String>) -> Self {
        Self {
            id,
            email,
            phone,
            role: Role::User,
            created_at: Utc::now(),
        }
    }
}
