use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::profile::Role;

/// Tags inside a form's `data` payload that tell intake submissions apart.
pub mod form_type {
    pub const BOOKING: &str = "booking";
    pub const SUBSCRIPTION: &str = "subscription";
    pub const TRAINING_PLAN: &str = "training_plan";
    pub const MEAL_PLAN: &str = "meal_plan";
}

/// Row in the `user_forms` table: one intake submission. The payload is an
/// open-ended JSON tree distinguished by its `form_type` tag; immutable after
/// creation except for the single update that attaches a purchase id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserForm {
    pub id: Uuid,
    pub user_id: Uuid,
    pub data: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserForm {
    pub fn form_type(&self) -> Option<&str> {
        self.data.get("form_type").and_then(Value::as_str)
    }

    pub fn purchase_id(&self) -> Option<Uuid> {
        self.data
            .get("purchase_id")
            .and_then(Value::as_str)
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}

/// Submitter contact embedded by the coach-dashboard listing
/// (`user_forms` joined to `profiles` through `user_id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormProfile {
    pub id: Uuid,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// `user_forms` row with the submitter's profile attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserFormWithProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub data: Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub profiles: Option<FormProfile>,
}
