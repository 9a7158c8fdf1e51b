use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::users::dto::UserView;

/// Signup step 1: identity and credentials, no health data yet.
#[derive(Debug, Deserialize)]
pub struct RegisterStepOneRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStepOneResponse {
    pub message: &'static str,
    pub user_id: Uuid,
}

/// Signup step 2: health details; triggers the first targets computation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStepTwoRequest {
    pub user_id: Option<Uuid>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub activity_level: Option<String>,
    pub health_goals: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub user: UserView,
}
