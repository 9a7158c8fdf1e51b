use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::consumption::ConsumedMacros;
use super::repo::FoodScan;

/// Body of POST /foodscan/store-analysis. Two request shapes share the
/// endpoint, as in the original client: a consumption declaration (when
/// `consumptionResponse` is present) or a new scan to store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreAnalysisRequest {
    /// Either a JSON object or a JSON-encoded string; parsed leniently.
    pub consumption_response: Option<Value>,
    pub user_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub analysis: Option<Value>,
    /// Stringified alternative to `analysis`.
    pub analysis_data: Option<String>,
}

/// The consumption declaration inside `consumptionResponse`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionEnvelope {
    pub food_scan_id: Option<Uuid>,
    pub consumed: Option<bool>,
    pub percentage: Option<f64>,
}

/// Body of POST /foodscan/scan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub user_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub analysis: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionView {
    pub status: String,
    pub percentage: f64,
    pub consumed_macros: ConsumedMacros,
    pub sugar_consumed: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodScanView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: Option<String>,
    pub analysis: Value,
    pub consumption: ConsumptionView,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<FoodScan> for FoodScanView {
    fn from(s: FoodScan) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            image_url: s.image_url,
            analysis: s.analysis,
            consumption: ConsumptionView {
                status: s.consumption_status,
                percentage: s.consumption_percentage,
                consumed_macros: ConsumedMacros {
                    carbohydrates: s.consumed_carbohydrates_g,
                    fats: s.consumed_fats_g,
                    proteins: s.consumed_proteins_g,
                },
                sugar_consumed: s.sugar_consumed_g,
            },
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionUpdateResponse {
    pub success: bool,
    pub food_scan: FoodScanView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreScanResponse {
    pub success: bool,
    pub message: &'static str,
    pub food_scan: FoodScanView,
}
