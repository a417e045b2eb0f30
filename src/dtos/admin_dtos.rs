use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::coach::{Coach, DEFAULT_PRICE, WeeklySchedule};
use crate::models::profile::{Profile, Role};

/// Card name given to promoted coaches whose profile has no email.
pub const NEW_COACH_NAME: &str = "New coach";

#[derive(Deserialize)]
pub struct RoleUpdateIn {
    pub role: Role,
    /// Only meaningful when promoting to coach: also create a default card.
    #[serde(default)]
    pub create_card: bool,
}

/// A profile row as the admin user table shows it.
#[derive(Serialize)]
pub struct AdminUserOut {
    pub id: Uuid,
    pub short_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Profile> for AdminUserOut {
    fn from(profile: Profile) -> Self {
        Self {
            short_id: short_id(profile.id),
            id: profile.id,
            email: profile.email,
            phone: profile.phone,
            role: profile.role,
            created_at: profile.created_at,
        }
    }
}

/// Compressed id for table display: first six and last four hex characters.
pub fn short_id(id: Uuid) -> String {
    let s = id.to_string();
    format!("{}...{}", &s[..6], &s[s.len() - 4..])
}

/// Contact data merged next to each coach card in the admin listing.
#[derive(Serialize)]
pub struct CoachContactOut {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
}

/// A coach card as the admin panel shows it, merged with the owning
/// profile and with display defaults filled in.
#[derive(Serialize)]
pub struct AdminCoachOut {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub activities: Vec<String>,
    pub schedule: WeeklySchedule,
    pub price: String,
    pub profile: CoachContactOut,
}

impl AdminCoachOut {
    pub fn merge(coach: Coach, profile: Option<&Profile>) -> Self {
        let email = profile.and_then(|p| p.email.clone());
        Self {
            id: coach.id,
            user_id: coach.user_id,
            name: coach
                .name
                .filter(|n| !n.trim().is_empty())
                .or_else(|| email.clone())
                .unwrap_or_else(|| NEW_COACH_NAME.to_string()),
            activities: coach.activities,
            schedule: coach.schedule,
            price: coach
                .price
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRICE.to_string()),
            profile: CoachContactOut {
                email,
                phone: profile.and_then(|p| p.phone.clone()),
                role: profile.map(|p| p.role).unwrap_or(Role::Coach),
            },
        }
    }
}

#[derive(Serialize)]
pub struct RoleUpdateOut {
    pub user_id: Uuid,
    pub role: Role,
    pub coach_card_created: bool,
    pub coach_card_removed: bool,
}
