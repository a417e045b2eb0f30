use serde::Serialize;
use uuid::Uuid;

use crate::models::coach::{Coach, WeeklySchedule};

/// Fallbacks shown when a card was saved half-filled.
pub const UNKNOWN_TRAINER: &str = "Unknown trainer";
pub const DEFAULT_SESSION_PRICE: &str = "500₽";

/// A trainer card as the public booking page sees it, with display
/// fallbacks already applied.
#[derive(Debug, Serialize)]
pub struct TrainerOut {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub activities: Vec<String>,
    pub schedule: WeeklySchedule,
    pub price: String,
}

impl From<Coach> for TrainerOut {
    fn from(coach: Coach) -> Self {
        Self {
            id: coach.id,
            user_id: coach.user_id,
            name: coach
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_TRAINER.to_string()),
            activities: coach.activities,
            schedule: coach.schedule,
            price: coach
                .price
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SESSION_PRICE.to_string()),
        }
    }
}
