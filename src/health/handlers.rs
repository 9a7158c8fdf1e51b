use axum::{extract::State, routing::post, Json, Router};
use tracing::{info, instrument, warn};

use crate::{
    error::AppError,
    health::{
        dto::{canonical_activity, canonical_goal, MetricsResponse, UpdateHealthRequest},
        metrics::compute_metrics,
    },
    state::AppState,
    users::repo::User,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/update-health", post(update_health))
}

/// Merge new health details onto the profile, recompute the derived targets
/// and persist both in one write.
#[instrument(skip(state, body))]
async fn update_health(
    State(state): State<AppState>,
    Json(body): Json<UpdateHealthRequest>,
) -> Result<Json<MetricsResponse>, AppError> {
    let user_id = body
        .user_id
        .ok_or(AppError::MissingInput("User ID is required"))?;

    let mut user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if let Some(age) = body.age {
        user.age = Some(age as i32);
    }
    if let Some(weight) = body.weight {
        user.weight_kg = Some(weight);
    }
    if let Some(height) = body.height {
        user.height_cm = Some(height);
    }
    if let Some(activity) = body.activity_level {
        user.activity_level = Some(canonical_activity(&activity)?);
    }
    if let Some(goal) = body.health_goals {
        user.health_goals = Some(canonical_goal(&goal)?);
    }
    user.allergies = body.allergies.unwrap_or_default();
    user.medical_conditions = body.medical_conditions.unwrap_or_default();

    let metrics = compute_metrics(&user.health_profile());
    if metrics.is_none() {
        warn!(user_id = %user.id, "profile still incomplete, clearing derived targets");
    }
    user.apply_metrics(metrics.as_ref());

    let saved = user.persist_health(&state.db).await?;
    info!(user_id = %saved.id, "health details updated");

    Ok(Json(MetricsResponse {
        message: "Health details updated!",
        metrics,
    }))
}
