use serde_json::Value;
use urlencoding::encode;
use uuid::Uuid;

use crate::models::form::{UserForm, UserFormWithProfile};
use crate::repositories::{RepoError, SupabaseRest};

const TABLE: &str = "user_forms";

/// `user_forms` table access. Rows are immutable after creation except for
/// the single update that links a purchase into the payload.
#[derive(Clone)]
pub struct FormRepo {
    rest: SupabaseRest,
}

impl FormRepo {
    pub fn new(rest: SupabaseRest) -> Self {
        Self { rest }
    }

    pub async fn insert(&self, user_id: Uuid, data: Value) -> Result<UserForm, RepoError> {
        self.rest
            .insert_returning(
                TABLE,
                &serde_json::json!({ "user_id": user_id, "data": data }),
            )
            .await
    }

    /// Attach a purchase to a form by merging `purchase_id` into its payload.
    /// A form links to at most one purchase; a second attach is refused.
    pub async fn attach_purchase(
        &self,
        form: &UserForm,
        purchase_id: Uuid,
    ) -> Result<(), RepoError> {
        if form.purchase_id().is_some() {
            return Err(RepoError::Conflict(format!(
                "form {} already has a purchase attached",
                form.id
            )));
        }
        let mut data = form.data.clone();
        if let Value::Object(map) = &mut data {
            map.insert(
                "purchase_id".to_string(),
                Value::String(purchase_id.to_string()),
            );
        } else {
            return Err(RepoError::Conflict(format!(
                "form {} payload is not an object",
                form.id
            )));
        }
        self.rest
            .update(
                TABLE,
                &format!("id=eq.{}", encode(&form.id.to_string())),
                &serde_json::json!({ "data": data }),
            )
            .await
    }

    /// Compensation path for the checkout saga.
    pub async fn delete(&self, form_id: Uuid) -> Result<(), RepoError> {
        self.rest
            .delete(TABLE, &format!("id=eq.{}", encode(&form_id.to_string())))
            .await
    }

    /// Every submission, newest first, with the submitter's contact profile
    /// embedded; the coach dashboard listing.
    pub async fn list_with_profiles(&self) -> Result<Vec<UserFormWithProfile>, RepoError> {
        self.rest
            .select(
                TABLE,
                "select=id,created_at,data,user_id,profiles:user_id(id,phone,role)&order=created_at.desc",
            )
            .await
    }
}
