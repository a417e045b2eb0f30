use serde::Deserialize;
use urlencoding::encode;
use uuid::Uuid;

use crate::models::profile::{NewProfile, Profile, Role};
use crate::repositories::{RepoError, SupabaseRest};

const TABLE: &str = "profiles";

/// `profiles` table access. `id` is the primary key and references the auth
/// user id, so lookups by user are lookups by id.
#[derive(Clone)]
pub struct ProfileRepo {
    rest: SupabaseRest,
}

#[derive(Deserialize)]
struct IdRow {
    id: Uuid,
}

impl ProfileRepo {
    pub fn new(rest: SupabaseRest) -> Self {
        Self { rest }
    }

    /// Get the profile row for a user. `NotFound` is the signal the
    /// reconciliation flow keys its lazy-create behavior on.
    pub async fn get(&self, user_id: Uuid) -> Result<Profile, RepoError> {
        let rows: Vec<Profile> = self
            .rest
            .select(
                TABLE,
                &format!("id=eq.{}&select=*", encode(&user_id.to_string())),
            )
            .await?;
        rows.into_iter().next().ok_or(RepoError::NotFound)
    }

    pub async fn insert(&self, profile: &NewProfile) -> Result<Profile, RepoError> {
        self.rest.insert_returning(TABLE, profile).await
    }

    /// All profiles, newest first; the admin user table.
    pub async fn list_all(&self) -> Result<Vec<Profile>, RepoError> {
        self.rest
            .select(TABLE, "select=*&order=created_at.desc")
            .await
    }

    /// Ids of profiles whose role is coach; used to restrict the admin coach
    /// listing to cards whose owner actually holds the role.
    pub async fn coach_ids(&self) -> Result<Vec<Uuid>, RepoError> {
        let rows: Vec<IdRow> = self.rest.select(TABLE, "role=eq.coach&select=id").await?;
        Ok(rows.into_iter().map(|r| r.id).collect())
    }

    /// Profiles for a set of users (PostgREST `in` membership filter).
    pub async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Profile>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let joined = ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.rest
            .select(TABLE, &format!("id=in.({})&select=*", encode(&joined)))
            .await
    }

    pub async fn set_role(&self, user_id: Uuid, role: Role) -> Result<(), RepoError> {
        self.rest
            .update(
                TABLE,
                &format!("id=eq.{}", encode(&user_id.to_string())),
                &serde_json::json!({ "role": role.as_str() }),
            )
            .await
    }
}
