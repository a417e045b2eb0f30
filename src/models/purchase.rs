use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every purchase is recorded as completed: there is no payment gateway
/// behind this flow, only the record of the card form being submitted.
pub const STATUS_COMPLETED: &str = "completed";

/// Tags that prefix synthetic transaction ids, one per paid flow.
pub mod transaction_tag {
    pub const TRAINING_PLAN: &str = "TRAINING_PLAN";
    pub const MEAL_PLAN: &str = "MEAL_PLAN";
    pub const SUBSCRIPTION: &str = "SUBSCRIPTION";
}

/// Row in the `purchases` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub transaction_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert shape for `purchases`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPurchase {
    pub user_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub transaction_id: String,
}

impl NewPurchase {
    /// Synthetic transaction id: service tag plus the current unix-millis
    /// timestamp, e.g. `TRAINING_PLAN_1722950400000`.
    pub fn completed(user_id: Uuid, amount: i64, tag: &str) -> Self {
        Self {
            user_id,
            amount,
            status: STATUS_COMPLETED.to_string(),
            transaction_id: format!("{}_{}", tag, Utc::now().timestamp_millis()),
        }
    }
}
