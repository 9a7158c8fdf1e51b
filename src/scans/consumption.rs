//! Consumption resolver: turns a user's "did you eat it, and how much"
//! declaration into consumed nutrient amounts derived from the scan's
//! analysis report.
//!
//! The arithmetic here is pure; the conditional pending→resolved persistence
//! step lives in the repo layer.

use serde::Serialize;
use serde_json::Value;

use super::analysis::{AnalysisReport, MACRO_CARBOHYDRATES, MACRO_FATS, MACRO_PROTEINS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumptionStatus {
    Pending,
    Consumed,
    NotConsumed,
}

impl ConsumptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Consumed => "consumed",
            Self::NotConsumed => "not consumed",
        }
    }
}

/// Grams of each macro actually consumed. Wire keys keep the capitalized
/// macro names the analysis report and the client use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumedMacros {
    #[serde(rename = "Carbohydrates")]
    pub carbohydrates: f64,
    #[serde(rename = "Fats")]
    pub fats: f64,
    #[serde(rename = "Proteins")]
    pub proteins: f64,
}

impl ConsumedMacros {
    pub const ZERO: ConsumedMacros = ConsumedMacros {
        carbohydrates: 0.0,
        fats: 0.0,
        proteins: 0.0,
    };
}

/// The resolved consumption sub-record, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionOutcome {
    pub status: ConsumptionStatus,
    pub percentage: f64,
    pub macros: ConsumedMacros,
    pub sugar_g: f64,
}

impl ConsumptionOutcome {
    pub fn not_consumed() -> Self {
        Self {
            status: ConsumptionStatus::NotConsumed,
            percentage: 0.0,
            macros: ConsumedMacros::ZERO,
            sugar_g: 0.0,
        }
    }
}

/// Rounds to 2 decimal places, the precision consumed amounts are stored at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes the consumption outcome for a declaration against an analysis
/// report.
///
/// `consumed = false` is a reset: percentage and every consumed amount go to
/// zero regardless of the report. Otherwise the percentage is clamped to
/// [0, 100] and each amount is the leniently-parsed report quantity scaled by
/// it. Malformed report content degrades to zero and can never fail this.
pub fn resolve(analysis: &Value, consumed: bool, percentage: f64) -> ConsumptionOutcome {
    if !consumed {
        return ConsumptionOutcome::not_consumed();
    }

    let pct = percentage.clamp(0.0, 100.0);
    let report = AnalysisReport::new(analysis);
    let portion = |total: f64| round2(total * pct / 100.0);

    ConsumptionOutcome {
        status: ConsumptionStatus::Consumed,
        percentage: pct,
        macros: ConsumedMacros {
            carbohydrates: portion(report.macro_quantity(MACRO_CARBOHYDRATES)),
            fats: portion(report.macro_quantity(MACRO_FATS)),
            proteins: portion(report.macro_quantity(MACRO_PROTEINS)),
        },
        sugar_g: portion(report.total_sugar()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_analysis() -> Value {
        json!({
            "macros": {
                "Carbohydrates": { "quantity": "40" },
                "Fats": { "quantity": "10" },
                "Proteins": { "quantity": "20" }
            },
            "sugarContent": { "totalSugar": "8" }
        })
    }

    #[test]
    fn not_consumed_resets_everything() {
        let outcome = resolve(&sample_analysis(), false, 85.0);
        assert_eq!(outcome.status, ConsumptionStatus::NotConsumed);
        assert_eq!(outcome.percentage, 0.0);
        assert_eq!(outcome.macros, ConsumedMacros::ZERO);
        assert_eq!(outcome.sugar_g, 0.0);
    }

    #[test]
    fn not_consumed_ignores_the_report_entirely() {
        // Same outcome for any report and any percentage.
        let a = resolve(&sample_analysis(), false, 200.0);
        let b = resolve(&json!(null), false, -3.0);
        assert_eq!(a, b);
    }

    #[test]
    fn half_portion_halves_every_quantity() {
        let outcome = resolve(&sample_analysis(), true, 50.0);
        assert_eq!(outcome.status, ConsumptionStatus::Consumed);
        assert_eq!(outcome.percentage, 50.0);
        assert_eq!(outcome.macros.carbohydrates, 20.0);
        assert_eq!(outcome.macros.fats, 5.0);
        assert_eq!(outcome.macros.proteins, 10.0);
        assert_eq!(outcome.sugar_g, 4.0);
    }

    #[test]
    fn malformed_quantity_degrades_to_zero() {
        let analysis = json!({
            "macros": {
                "Carbohydrates": { "quantity": "40" },
                "Fats": { "quantity": "N/A" },
                "Proteins": { "quantity": "20" }
            }
        });
        let outcome = resolve(&analysis, true, 50.0);
        assert_eq!(outcome.macros.fats, 0.0);
        assert_eq!(outcome.macros.carbohydrates, 20.0);
        // No sugar fields at all: tolerated, zero.
        assert_eq!(outcome.sugar_g, 0.0);
    }

    #[test]
    fn percentage_is_clamped() {
        let over = resolve(&sample_analysis(), true, 150.0);
        assert_eq!(over.percentage, 100.0);
        assert_eq!(over.macros.carbohydrates, 40.0);

        let under = resolve(&sample_analysis(), true, -5.0);
        assert_eq!(under.percentage, 0.0);
        assert_eq!(under.macros, ConsumedMacros::ZERO);
    }

    #[test]
    fn amounts_round_to_two_decimals() {
        let analysis = json!({
            "macros": { "Proteins": { "quantity": "10" } }
        });
        // 10 * 33.33 / 100 = 3.333 → 3.33
        let outcome = resolve(&analysis, true, 33.33);
        assert_eq!(outcome.macros.proteins, 3.33);
    }

    #[test]
    fn resolving_a_null_report_never_panics() {
        let outcome = resolve(&json!(null), true, 75.0);
        assert_eq!(outcome.status, ConsumptionStatus::Consumed);
        assert_eq!(outcome.macros, ConsumedMacros::ZERO);
    }

    #[test]
    fn consumed_macros_serialize_with_capitalized_keys() {
        let json = serde_json::to_string(&ConsumedMacros {
            carbohydrates: 20.0,
            fats: 5.0,
            proteins: 10.0,
        })
        .unwrap();
        assert!(json.contains("\"Carbohydrates\":20.0"));
        assert!(json.contains("\"Fats\":5.0"));
        assert!(json.contains("\"Proteins\":10.0"));
    }
}
