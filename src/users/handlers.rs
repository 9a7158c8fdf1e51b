use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    error::AppError,
    health::{
        dto::{canonical_activity, canonical_dietary, canonical_gender, canonical_goal},
        metrics::compute_metrics,
    },
    state::AppState,
    users::{
        dto::{UpdateProfileRequest, UpdateProfileResponse, UserView},
        repo::User,
    },
};

pub fn router() -> Router<AppState> {
    Router::new().route("/users/:id", get(get_user).put(update_user))
}

#[instrument(skip(state))]
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserView>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(user.into()))
}

/// Profile edit. Every edit recomputes the derived targets from the merged
/// inputs, so stale targets can never be persisted.
#[instrument(skip(state, body))]
async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, AppError> {
    let mut user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if let Some(age) = body.age {
        user.age = Some(age as i32);
    }
    if let Some(gender) = body.gender {
        user.gender = Some(canonical_gender(&gender)?);
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
    if let Some(dietary) = body.dietary_preferences {
        user.dietary_preferences = Some(canonical_dietary(&dietary)?);
    }
    if let Some(goal) = body.health_goals {
        user.health_goals = Some(canonical_goal(&goal)?);
    }

    let metrics = compute_metrics(&user.health_profile());
    user.apply_metrics(metrics.as_ref());

    let saved = user.persist_health(&state.db).await?;
    info!(user_id = %saved.id, "profile updated");

    Ok(Json(UpdateProfileResponse {
        message: "Profile updated successfully",
        user: saved.into(),
    }))
}
