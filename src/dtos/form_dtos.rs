use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::models::form::form_type;
use crate::services::payment::card_number_is_valid;

/// Training-plan intake. Goals and level mirror the site's fixed options;
/// injuries are free text and optional.
#[derive(Debug, Deserialize)]
pub struct TrainingPlanIn {
    pub name: String,
    pub age: Option<i64>,
    pub gender: String,
    #[serde(default)]
    pub goals: Vec<String>,
    pub level: String,
    #[serde(default)]
    pub injuries: Option<String>,
    pub card_number: String,
}

impl TrainingPlanIn {
    /// Reject incomplete submissions before anything touches the network.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Name is required");
        }
        if self.age.is_none() {
            return Err("Age is required");
        }
        if self.gender.trim().is_empty() {
            return Err("Gender is required");
        }
        if self.goals.iter().all(|g| g.trim().is_empty()) {
            return Err("At least one goal is required");
        }
        if self.level.trim().is_empty() {
            return Err("Level is required");
        }
        if !card_number_is_valid(&self.card_number) {
            return Err("Card number must contain at least 16 digits");
        }
        Ok(())
    }

    pub fn to_payload(&self) -> Value {
        json!({
            "form_type": form_type::TRAINING_PLAN,
            "name": self.name,
            "age": self.age.unwrap_or(0),
            "gender": self.gender,
            "goals": self.goals,
            "level": self.level,
            "injuries": self.injuries.clone().unwrap_or_default(),
        })
    }
}

/// Meal-plan intake.
#[derive(Debug, Deserialize)]
pub struct MealPlanIn {
    pub name: String,
    pub age: Option<i64>,
    pub gender: String,
    #[serde(default)]
    pub goals: Vec<String>,
    pub height: Option<i64>,
    pub measurements: String,
    pub preferences: String,
    #[serde(default)]
    pub restrictions: Option<String>,
    #[serde(default)]
    pub intolerances: Option<String>,
    pub card_number: String,
}

impl MealPlanIn {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("Name is required");
        }
        if self.age.is_none() {
            return Err("Age is required");
        }
        if self.gender.trim().is_empty() {
            return Err("Gender is required");
        }
        if self.goals.iter().all(|g| g.trim().is_empty()) {
            return Err("At least one goal is required");
        }
        if self.height.is_none() {
            return Err("Height is required");
        }
        if self.measurements.trim().is_empty() {
            return Err("Measurements are required");
        }
        if self.preferences.trim().is_empty() {
            return Err("Preferences are required");
        }
        if !card_number_is_valid(&self.card_number) {
            return Err("Card number must contain at least 16 digits");
        }
        Ok(())
    }

    pub fn to_payload(&self) -> Value {
        json!({
            "form_type": form_type::MEAL_PLAN,
            "name": self.name,
            "age": self.age.unwrap_or(0),
            "gender": self.gender,
            "goals": self.goals,
            "height": self.height.unwrap_or(0),
            "measurements": self.measurements,
            "preferences": self.preferences,
            "restrictions": self.restrictions.clone().unwrap_or_default(),
            "intolerances": self.intolerances.clone().unwrap_or_default(),
        })
    }
}

/// Booking of a coaching session: a slot out of the trainer's week plus the
/// card the member typed.
#[derive(Debug, Deserialize)]
pub struct BookingIn {
    pub coach_id: Uuid,
    pub day: String,
    pub time: String,
    pub card_number: String,
}

impl BookingIn {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.day.trim().is_empty() || self.time.trim().is_empty() {
            return Err("Session day and time are required");
        }
        if !card_number_is_valid(&self.card_number) {
            return Err("Card number must contain at least 16 digits");
        }
        Ok(())
    }
}

/// Membership purchase referencing a plan by name. Prices and feature
/// lists are filled in server-side from the fixed plan set.
#[derive(Debug, Deserialize)]
pub struct SubscriptionPurchaseIn {
    pub plan: String,
    pub card_number: String,
}

impl SubscriptionPurchaseIn {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.plan.trim().is_empty() {
            return Err("Plan name is required");
        }
        if !card_number_is_valid(&self.card_number) {
            return Err("Card number must contain at least 16 digits");
        }
        Ok(())
    }
}

/// What a paid submission returns: the stored form and its linked purchase.
#[derive(Serialize)]
pub struct ReceiptOut {
    pub form_id: Uuid,
    pub purchase_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub transaction_id: String,
}

#[derive(Serialize)]
pub struct BookingOut {
    pub form_id: Uuid,
    pub session: String,
    pub price: String,
}
