use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Activity tag given to cards created without any input (admin promotion).
pub const DEFAULT_ACTIVITY: &str = "Workouts";

/// Price shown on cards that never set one.
pub const DEFAULT_PRICE: &str = "0";

/// Weekly availability: day name to a list of "HH:MM-HH:MM" ranges.
/// All seven days are always present; an empty list means no sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklySchedule {
    pub monday: Vec<String>,
    pub tuesday: Vec<String>,
    pub wednesday: Vec<String>,
    pub thursday: Vec<String>,
    pub friday: Vec<String>,
    pub saturday: Vec<String>,
    pub sunday: Vec<String>,
}

impl WeeklySchedule {
    pub const DAYS: [&'static str; 7] = [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];

    pub fn day(&self, name: &str) -> Option<&[String]> {
        match name {
            "monday" => Some(&self.monday),
            "tuesday" => Some(&self.tuesday),
            "wednesday" => Some(&self.wednesday),
            "thursday" => Some(&self.thursday),
            "friday" => Some(&self.friday),
            "saturday" => Some(&self.saturday),
            "sunday" => Some(&self.sunday),
            _ => None,
        }
    }

    pub fn has_slot(&self, day: &str, time: &str) -> bool {
        self.day(day)
            .map(|slots| slots.iter().any(|s| s == time))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        Self::DAYS
            .iter()
            .all(|d| self.day(d).map(|s| s.is_empty()).unwrap_or(true))
    }
}

/// Old rows store the schedule in assorted shapes (arrays, nulls). Anything
/// that is not the canonical day map reads as an empty week.
fn schedule_or_empty<'de, D>(deserializer: D) -> Result<WeeklySchedule, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

/// Non-array activity values read as the default tag.
fn activities_or_default<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => vec![DEFAULT_ACTIVITY.to_string()],
    })
}

/// Row in the `coaches` table: a coach's public card. One row per profile,
/// enforced by a unique constraint on `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "activities_or_default")]
    pub activities: Vec<String>,
    #[serde(default, deserialize_with = "schedule_or_empty")]
    pub schedule: WeeklySchedule,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Upsert shape for `coaches`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCoach {
    pub user_id: Uuid,
    pub name: String,
    pub activities: Vec<String>,
    pub schedule: WeeklySchedule,
    pub price: String,
}

impl NewCoach {
    /// The card created when an admin promotes a profile to coach: named
    /// after the profile email, default activity, empty week, zero price.
    pub fn default_card(user_id: Uuid, name: String) -> Self {
        Self {
            user_id,
            name,
            activities: vec![DEFAULT_ACTIVITY.to_string()],
            schedule: WeeklySchedule::default(),
            price: DEFAULT_PRICE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_week_has_all_days_empty() {
        let schedule = WeeklySchedule::default();
        assert!(schedule.is_empty());
        for day in WeeklySchedule::DAYS {
            assert_eq!(schedule.day(day), Some(&[][..]));
        }
    }

    #[test]
    fn slot_lookup() {
        let schedule = WeeklySchedule {
            monday: vec!["10:00-11:00".into(), "15:00-16:00".into()],
            ..Default::default()
        };
        assert!(schedule.has_slot("monday", "15:00-16:00"));
        assert!(!schedule.has_slot("monday", "11:00-12:00"));
        assert!(!schedule.has_slot("tuesday", "10:00-11:00"));
        assert!(!schedule.has_slot("someday", "10:00-11:00"));
        assert!(!schedule.is_empty());
    }

    #[test]
    fn legacy_array_schedule_reads_as_empty_week() {
        let coach: Coach = serde_json::from_value(serde_json::json!({
            "id": "3f0e8a10-0000-4000-8000-000000000001",
            "user_id": "3f0e8a10-0000-4000-8000-000000000002",
            "name": "Old Coach",
            "activities": ["Boxing"],
            "schedule": [{"day": "Mon", "time": "10:00-11:00"}],
            "price": "500"
        }))
        .unwrap();
        assert!(coach.schedule.is_empty());
    }

    #[test]
    fn missing_activities_read_as_default_tag() {
        let coach: Coach = serde_json::from_value(serde_json::json!({
            "id": "3f0e8a10-0000-4000-8000-000000000001",
            "user_id": "3f0e8a10-0000-4000-8000-000000000002",
            "activities": null
        }))
        .unwrap();
        assert_eq!(coach.activities, vec![DEFAULT_ACTIVITY.to_string()]);
    }
}
