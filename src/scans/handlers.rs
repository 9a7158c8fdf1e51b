use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    scans::{
        consumption::{self, ConsumptionStatus},
        dto::{
            ConsumptionEnvelope, ConsumptionUpdateResponse, FoodScanView, ScanRequest,
            StoreAnalysisRequest, StoreScanResponse,
        },
        repo::FoodScan,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/foodscan/scan", post(store_scan))
        .route("/foodscan/store-analysis", post(store_analysis))
        .route("/foodscan/history", get(history))
}

/// POST /foodscan/scan — store a scan whose analysis arrives as plain JSON.
#[instrument(skip(state, body))]
async fn store_scan(
    State(state): State<AppState>,
    Json(body): Json<ScanRequest>,
) -> Result<(StatusCode, Json<FoodScanView>), AppError> {
    let user_id = body.user_id.ok_or(AppError::MissingInput("Missing userId"))?;
    let analysis = body.analysis.unwrap_or_else(|| Value::Object(Default::default()));

    let scan = FoodScan::create(&state.db, user_id, body.image_url.as_deref(), &analysis).await?;
    info!(scan_id = %scan.id, user_id = %user_id, "food scan stored");

    Ok((StatusCode::CREATED, Json(scan.into())))
}

/// POST /foodscan/store-analysis — either resolves a consumption declaration
/// (`consumptionResponse` present) or stores a new scan analysis.
#[instrument(skip(state, body))]
async fn store_analysis(
    State(state): State<AppState>,
    Json(body): Json<StoreAnalysisRequest>,
) -> Result<Response, AppError> {
    if let Some(raw) = body.consumption_response {
        let updated = resolve_consumption(&state, raw).await?;
        return Ok((
            StatusCode::OK,
            Json(ConsumptionUpdateResponse {
                success: true,
                food_scan: updated.into(),
            }),
        )
            .into_response());
    }

    let user_id = body.user_id.ok_or(AppError::MissingInput("Missing userId"))?;
    let mut analysis = match (body.analysis, body.analysis_data) {
        (Some(value), _) => value,
        (None, Some(text)) => serde_json::from_str(&text).map_err(|e| {
            AppError::MalformedPayload(format!("Invalid JSON format in analysisData: {e}"))
        })?,
        (None, None) => return Err(AppError::MissingInput("Missing analysisData")),
    };
    clean_micronutrients(&mut analysis);

    let scan = FoodScan::create(&state.db, user_id, body.image_url.as_deref(), &analysis).await?;
    info!(scan_id = %scan.id, user_id = %user_id, "food scan stored");

    Ok((
        StatusCode::CREATED,
        Json(StoreScanResponse {
            success: true,
            message: "Food scan stored successfully!",
            food_scan: scan.into(),
        }),
    )
        .into_response())
}

/// GET /foodscan/history — the caller's scans, newest first.
#[instrument(skip(state))]
async fn history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<FoodScanView>>, AppError> {
    let scans = FoodScan::list_by_user(&state.db, user_id).await?;
    Ok(Json(scans.into_iter().map(FoodScanView::from).collect()))
}

/// Runs a consumption declaration against its scan: parse the envelope,
/// compute the outcome from the stored analysis, then take the conditional
/// pending→resolved transition.
async fn resolve_consumption(state: &AppState, raw: Value) -> Result<FoodScan, AppError> {
    let envelope = parse_consumption_envelope(raw)?;
    let (Some(scan_id), Some(consumed)) = (envelope.food_scan_id, envelope.consumed) else {
        return Err(AppError::MissingInput(
            "Missing foodScanId or consumed flag in consumptionResponse",
        ));
    };

    let scan = FoodScan::find_by_id(&state.db, scan_id)
        .await?
        .ok_or(AppError::NotFound("FoodScan record"))?;
    if scan.consumption_status != ConsumptionStatus::Pending.as_str() {
        return Err(AppError::AlreadyResolved);
    }

    let percentage = if consumed {
        envelope.percentage.unwrap_or(0.0)
    } else {
        0.0
    };
    let outcome = consumption::resolve(&scan.analysis, consumed, percentage);

    // A concurrent declaration may have won between the read and this write;
    // the conditional update surfaces that as a conflict instead of
    // overwriting.
    let updated = FoodScan::apply_consumption(&state.db, scan_id, &outcome)
        .await?
        .ok_or(AppError::AlreadyResolved)?;

    info!(scan_id = %scan_id, status = %updated.consumption_status, "consumption recorded");
    Ok(updated)
}

/// The original client sent `consumptionResponse` either as a JSON object or
/// as a JSON-encoded string; accept both, rejecting unparseable strings
/// before anything is persisted.
fn parse_consumption_envelope(raw: Value) -> Result<ConsumptionEnvelope, AppError> {
    let value = match raw {
        Value::String(text) => serde_json::from_str(&text).map_err(|e| {
            AppError::MalformedPayload(format!("Invalid JSON format in consumptionResponse: {e}"))
        })?,
        other => other,
    };
    serde_json::from_value(value).map_err(|e| {
        AppError::MalformedPayload(format!("Invalid consumptionResponse: {e}"))
    })
}

/// Drop null/zero entries from a `microNutrients` map before persisting.
fn clean_micronutrients(analysis: &mut Value) {
    if let Some(Value::Object(map)) = analysis.get_mut("microNutrients") {
        map.retain(|_, v| !v.is_null() && v.as_f64() != Some(0.0));
    }
}
