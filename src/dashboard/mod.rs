//! Daily consumption roll-up: sums the consumed amounts of one local
//! calendar day's scans and averages their health scores.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, Duration, OffsetDateTime, UtcOffset};
use tracing::instrument;

use crate::{
    auth::jwt::AuthUser,
    error::AppError,
    scans::{
        analysis::AnalysisReport,
        consumption::{ConsumedMacros, ConsumptionStatus},
        repo::FoodScan,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard/summary", get(summary))
}

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    /// Calendar day as YYYY-MM-DD; defaults to today in server-local time.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: String,
    pub consumed_macros: ConsumedMacros,
    pub sugar_consumed: f64,
    /// Mean analysis health score over the day's consumed scans that carry
    /// a usable one; absent for an empty day.
    pub average_health_score: Option<f64>,
    pub scans_counted: usize,
}

/// Pure reduction over one day's scans. Non-consumed entries are skipped;
/// scans without a parseable health score still count toward the sums but
/// not the average.
pub fn summarize_day(date: Date, scans: &[FoodScan]) -> DailySummary {
    let mut macros = ConsumedMacros::ZERO;
    let mut sugar = 0.0;
    let mut score_sum = 0.0;
    let mut score_count = 0usize;
    let mut counted = 0usize;

    for scan in scans {
        if scan.consumption_status != ConsumptionStatus::Consumed.as_str() {
            continue;
        }
        counted += 1;
        macros.carbohydrates += scan.consumed_carbohydrates_g;
        macros.fats += scan.consumed_fats_g;
        macros.proteins += scan.consumed_proteins_g;
        sugar += scan.sugar_consumed_g;
        if let Some(score) = AnalysisReport::new(&scan.analysis).health_score() {
            score_sum += score;
            score_count += 1;
        }
    }

    DailySummary {
        date: date.to_string(),
        consumed_macros: macros,
        sugar_consumed: sugar,
        average_health_score: (score_count > 0).then(|| score_sum / score_count as f64),
        scans_counted: counted,
    }
}

#[instrument(skip(state))]
async fn summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(params): Query<SummaryParams>,
) -> Result<Json<DailySummary>, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let date = match params.date {
        Some(text) => Date::parse(&text, format_description!("[year]-[month]-[day]"))
            .map_err(|_| AppError::MalformedPayload("Invalid date, expected YYYY-MM-DD".into()))?,
        None => OffsetDateTime::now_utc().to_offset(offset).date(),
    };

    let start = date.midnight().assume_offset(offset);
    let end = start + Duration::days(1);

    let scans = FoodScan::list_consumed_between(&state.db, user_id, start, end).await?;
    Ok(Json(summarize_day(date, &scans)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::date;
    use uuid::Uuid;

    fn scan(status: &str, carbs: f64, fats: f64, proteins: f64, sugar: f64, score: serde_json::Value) -> FoodScan {
        FoodScan {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            image_url: None,
            analysis: json!({ "healthScore": score }),
            consumption_status: status.into(),
            consumption_percentage: 100.0,
            consumed_carbohydrates_g: carbs,
            consumed_fats_g: fats,
            consumed_proteins_g: proteins,
            sugar_consumed_g: sugar,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn empty_day_sums_to_zero_with_no_average() {
        let summary = summarize_day(date!(2024 - 03 - 01), &[]);
        assert_eq!(summary.consumed_macros, ConsumedMacros::ZERO);
        assert_eq!(summary.sugar_consumed, 0.0);
        assert!(summary.average_health_score.is_none());
        assert_eq!(summary.scans_counted, 0);
        assert_eq!(summary.date, "2024-03-01");
    }

    #[test]
    fn sums_and_averages_consumed_scans() {
        let scans = vec![
            scan("consumed", 20.0, 5.0, 10.0, 4.0, json!(80)),
            scan("consumed", 10.0, 2.5, 5.0, 2.0, json!(60)),
        ];
        let summary = summarize_day(date!(2024 - 03 - 01), &scans);
        assert_eq!(summary.consumed_macros.carbohydrates, 30.0);
        assert_eq!(summary.consumed_macros.fats, 7.5);
        assert_eq!(summary.consumed_macros.proteins, 15.0);
        assert_eq!(summary.sugar_consumed, 6.0);
        assert_eq!(summary.average_health_score, Some(70.0));
        assert_eq!(summary.scans_counted, 2);
    }

    #[test]
    fn skips_pending_and_not_consumed_scans() {
        let scans = vec![
            scan("consumed", 10.0, 1.0, 2.0, 1.0, json!(50)),
            scan("pending", 99.0, 99.0, 99.0, 99.0, json!(90)),
            scan("not consumed", 0.0, 0.0, 0.0, 0.0, json!(90)),
        ];
        let summary = summarize_day(date!(2024 - 03 - 01), &scans);
        assert_eq!(summary.scans_counted, 1);
        assert_eq!(summary.consumed_macros.carbohydrates, 10.0);
        assert_eq!(summary.average_health_score, Some(50.0));
    }

    #[test]
    fn unscored_scans_count_toward_sums_but_not_average() {
        let scans = vec![
            scan("consumed", 10.0, 1.0, 2.0, 1.0, json!(40)),
            scan("consumed", 5.0, 1.0, 1.0, 0.5, json!("N/A")),
        ];
        let summary = summarize_day(date!(2024 - 03 - 01), &scans);
        assert_eq!(summary.scans_counted, 2);
        assert_eq!(summary.consumed_macros.carbohydrates, 15.0);
        assert_eq!(summary.average_health_score, Some(40.0));
    }

    #[test]
    fn summary_serializes_with_wire_casing() {
        let summary = summarize_day(date!(2024 - 03 - 01), &[]);
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"consumedMacros\""));
        assert!(json.contains("\"sugarConsumed\""));
        assert!(json.contains("\"averageHealthScore\":null"));
        assert!(json.contains("\"scansCounted\":0"));
    }
}
