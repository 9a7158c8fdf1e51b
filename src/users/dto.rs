use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::health::metrics::MacroTargets;
use crate::users::repo::User;

/// The health-input slice of a profile, as the client sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDetailsView {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub dietary_preferences: Option<String>,
    pub allergies: Vec<String>,
    pub medical_conditions: Vec<String>,
    pub health_goals: Option<String>,
}

/// Public profile view: everything except the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_health_details_completed: bool,
    pub health_details: HealthDetailsView,
    pub bmi: Option<f64>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub macronutrients: Option<MacroTargets>,
    pub recommended_sugar_intake: Option<f64>,
    pub recommended_sodium_intake: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        let macronutrients = match (u.protein_target_g, u.fat_target_g, u.carb_target_g) {
            (Some(proteins), Some(fats), Some(carbohydrates)) => Some(MacroTargets {
                proteins,
                fats,
                carbohydrates,
            }),
            _ => None,
        };
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            is_health_details_completed: u.is_health_details_completed,
            health_details: HealthDetailsView {
                age: u.age,
                gender: u.gender,
                weight: u.weight_kg,
                height: u.height_cm,
                activity_level: u.activity_level,
                dietary_preferences: u.dietary_preferences,
                allergies: u.allergies,
                medical_conditions: u.medical_conditions,
                health_goals: u.health_goals,
            },
            bmi: u.bmi,
            bmr: u.bmr,
            tdee: u.tdee,
            macronutrients,
            recommended_sugar_intake: u.recommended_sugar_intake_g,
            recommended_sodium_intake: u.recommended_sodium_intake_mg,
            created_at: u.created_at,
        }
    }
}

/// Body of PUT /users/:id — a partial health-detail edit.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub dietary_preferences: Option<String>,
    pub health_goals: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub message: &'static str,
    pub user: UserView,
}
