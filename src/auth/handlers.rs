use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        credentials::{hash_password, is_valid_email, verify_password},
        dto::{
            AuthResponse, LoginRequest, RefreshRequest, RegisterStepOneRequest,
            RegisterStepOneResponse, RegisterStepTwoRequest,
        },
        jwt::{AuthUser, JwtKeys},
    },
    error::AppError,
    health::{
        dto::{canonical_activity, canonical_gender, canonical_goal, MetricsResponse},
        metrics::compute_metrics,
    },
    state::AppState,
    users::{dto::UserView, repo::User},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register-step1", post(register_step_one))
        .route("/auth/register-step2", post(register_step_two))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, body))]
async fn register_step_one(
    State(state): State<AppState>,
    Json(body): Json<RegisterStepOneRequest>,
) -> Result<(StatusCode, Json<RegisterStepOneResponse>), AppError> {
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(AppError::MissingInput("All fields are required"));
    };

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::MalformedPayload("Invalid email".into()));
    }
    if password.len() < 8 {
        warn!("password too short");
        return Err(AppError::MalformedPayload("Password too short".into()));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Conflict("User already exists"));
    }

    let hash = hash_password(&password)?;
    let user = User::create(&state.db, &name, &email, &hash).await?;

    info!(user_id = %user.id, email = %user.email, "user registered (step 1)");
    Ok((
        StatusCode::CREATED,
        Json(RegisterStepOneResponse {
            message: "Step 1 completed! Proceed to step 2",
            user_id: user.id,
        }),
    ))
}

/// Signup step 2: stores the health details and runs the first metrics
/// computation.
#[instrument(skip(state, body))]
async fn register_step_two(
    State(state): State<AppState>,
    Json(body): Json<RegisterStepTwoRequest>,
) -> Result<Json<MetricsResponse>, AppError> {
    let (Some(user_id), Some(age), Some(gender), Some(weight), Some(height), Some(activity), Some(goal)) = (
        body.user_id,
        body.age,
        body.gender,
        body.weight,
        body.height,
        body.activity_level,
        body.health_goals,
    ) else {
        return Err(AppError::MissingInput("Missing required fields"));
    };

    let mut user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    user.age = Some(age as i32);
    user.gender = Some(canonical_gender(&gender)?);
    user.weight_kg = Some(weight);
    user.height_cm = Some(height);
    user.activity_level = Some(canonical_activity(&activity)?);
    user.health_goals = Some(canonical_goal(&goal)?);
    user.is_health_details_completed = true;

    let metrics = compute_metrics(&user.health_profile());
    user.apply_metrics(metrics.as_ref());
    user.persist_health(&state.db).await?;

    info!(user_id = %user_id, "signup completed (step 2)");
    Ok(Json(MetricsResponse {
        message: "Signup completed successfully!",
        metrics,
    }))
}

#[instrument(skip(state, body))]
async fn login(
    State(state): State<AppState>,
    Json(mut body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    body.email = body.email.trim().to_lowercase();

    if !is_valid_email(&body.email) {
        warn!(email = %body.email, "invalid email");
        return Err(AppError::MalformedPayload("Invalid email".into()));
    }

    let user = User::find_by_email(&state.db, &body.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %body.email, "login unknown email");
            AppError::Unauthorized("Invalid credentials")
        })?;

    if !verify_password(&body.password, &user.password_hash)? {
        warn!(email = %body.email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, body))]
async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&body.refresh_token)
        .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token"))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(AppError::Unauthorized("User not found"))?;

    let token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    Ok(Json(AuthResponse {
        token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserView>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found"))?;
    Ok(Json(user.into()))
}
