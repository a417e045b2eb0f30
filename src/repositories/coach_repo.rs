use serde::{Deserialize, Serialize};
use urlencoding::encode;
use uuid::Uuid;

use crate::models::coach::{Coach, NewCoach, WeeklySchedule};
use crate::repositories::{RepoError, SupabaseRest};

const TABLE: &str = "coaches";

/// Full-card update sent by the coach dashboard and the admin panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachCardUpdate {
    pub name: String,
    pub activities: Vec<String>,
    pub schedule: WeeklySchedule,
    pub price: String,
}

/// `coaches` table access. Uniqueness per profile rides on the `user_id`
/// unique constraint; writes go through an explicit upsert so racing
/// promotions and self-registrations stay idempotent.
#[derive(Clone)]
pub struct CoachRepo {
    rest: SupabaseRest,
}

impl CoachRepo {
    pub fn new(rest: SupabaseRest) -> Self {
        Self { rest }
    }

    pub async fn upsert(&self, coach: &NewCoach) -> Result<Coach, RepoError> {
        self.rest.upsert_returning(TABLE, "user_id", coach).await
    }

    pub async fn get(&self, coach_id: Uuid) -> Result<Coach, RepoError> {
        let rows: Vec<Coach> = self
            .rest
            .select(
                TABLE,
                &format!("id=eq.{}&select=*", encode(&coach_id.to_string())),
            )
            .await?;
        rows.into_iter().next().ok_or(RepoError::NotFound)
    }

    pub async fn get_by_user_id(&self, user_id: Uuid) -> Result<Coach, RepoError> {
        let rows: Vec<Coach> = self
            .rest
            .select(
                TABLE,
                &format!("user_id=eq.{}&select=*", encode(&user_id.to_string())),
            )
            .await?;
        rows.into_iter().next().ok_or(RepoError::NotFound)
    }

    /// Every card, newest first. The public trainer listing shows all rows
    /// regardless of the owning profile's current role.
    pub async fn list_all(&self) -> Result<Vec<Coach>, RepoError> {
        self.rest
            .select(TABLE, "select=*&order=created_at.desc")
            .await
    }

    /// Cards owned by the given profiles (PostgREST `in` membership filter).
    pub async fn list_for_users(&self, user_ids: &[Uuid]) -> Result<Vec<Coach>, RepoError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = user_ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.rest
            .select(
                TABLE,
                &format!(
                    "user_id=in.({})&select=*&order=created_at.desc",
                    encode(&ids)
                ),
            )
            .await
    }

    pub async fn update_card(
        &self,
        coach_id: Uuid,
        update: &CoachCardUpdate,
    ) -> Result<(), RepoError> {
        self.rest
            .update(
                TABLE,
                &format!("id=eq.{}", encode(&coach_id.to_string())),
                update,
            )
            .await
    }

    /// Remove the card owned by a profile. Demotions away from coach cascade
    /// here instead of leaving orphaned rows behind.
    pub async fn delete_by_user_id(&self, user_id: Uuid) -> Result<(), RepoError> {
        self.rest
            .delete(
                TABLE,
                &format!("user_id=eq.{}", encode(&user_id.to_string())),
            )
            .await
    }
}
