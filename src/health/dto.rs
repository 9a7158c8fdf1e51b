use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::health::metrics::{ActivityLevel, Gender, HealthGoal, HealthMetrics};

const DIETARY_PREFERENCES: [&str; 7] = [
    "None",
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Keto",
    "Paleo",
    "Other",
];

/// Validate a client-supplied gender label and return its canonical form.
pub fn canonical_gender(label: &str) -> Result<String, AppError> {
    Gender::from_label(label)
        .map(|g| g.as_label().to_string())
        .ok_or_else(|| AppError::MalformedPayload(format!("Unknown gender: {label}")))
}

pub fn canonical_activity(label: &str) -> Result<String, AppError> {
    ActivityLevel::from_label(label)
        .map(|a| a.as_label().to_string())
        .ok_or_else(|| AppError::MalformedPayload(format!("Unknown activity level: {label}")))
}

pub fn canonical_goal(label: &str) -> Result<String, AppError> {
    HealthGoal::from_label(label)
        .map(|g| g.as_label().to_string())
        .ok_or_else(|| AppError::MalformedPayload(format!("Unknown health goal: {label}")))
}

pub fn canonical_dietary(label: &str) -> Result<String, AppError> {
    if DIETARY_PREFERENCES.contains(&label) {
        Ok(label.to_string())
    } else {
        Err(AppError::MalformedPayload(format!(
            "Unknown dietary preference: {label}"
        )))
    }
}

/// Body of POST /update-health. Fields other than `userId` are merged onto
/// the stored profile; omitted allergy/condition lists reset to empty, as
/// the original client always sent both.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHealthRequest {
    pub user_id: Option<Uuid>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub health_goals: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub medical_conditions: Option<Vec<String>>,
}

/// Shared response for the endpoints that recompute targets. `metrics` is
/// null while the profile is still missing required inputs — a recoverable
/// state, not an error.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub message: &'static str,
    pub metrics: Option<HealthMetrics>,
}
