//! Defensive access into the vendor-produced nutrition report.
//!
//! The analysis payload is written by a third-party language model and stored
//! opaquely; quantities may arrive as numbers, numeric strings, unit-suffixed
//! strings ("32g") or garbage. Every accessor here is total: malformed input
//! degrades to zero (or `None` for optional fields), never to an error.

use serde_json::Value;

pub const MACRO_CARBOHYDRATES: &str = "Carbohydrates";
pub const MACRO_FATS: &str = "Fats";
pub const MACRO_PROTEINS: &str = "Proteins";

/// Read-only view over a raw analysis document.
pub struct AnalysisReport<'a> {
    raw: &'a Value,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    /// Total grams reported for one macro key (`macros.<key>.quantity`).
    pub fn macro_quantity(&self, key: &str) -> f64 {
        lenient_quantity(
            self.raw
                .get("macros")
                .and_then(|m| m.get(key))
                .and_then(|m| m.get("quantity")),
        )
    }

    /// Total grams of sugar: `sugarContent.totalSugar`, falling back to a
    /// top-level `totalSugar` when the nested field is absent.
    pub fn total_sugar(&self) -> f64 {
        let nested = self
            .raw
            .get("sugarContent")
            .and_then(|s| s.get("totalSugar"));
        match nested {
            Some(v) => lenient_quantity(Some(v)),
            None => lenient_quantity(self.raw.get("totalSugar")),
        }
    }

    /// The report's 0-100 health score, if it carries a usable one.
    pub fn health_score(&self) -> Option<f64> {
        match self.raw.get("healthScore") {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// Parses a quantity that may be a number, a numeric string, or anything
/// else. Strings are read up to their numeric prefix ("32g" → 32.0);
/// non-numeric values yield 0.
pub fn lenient_quantity(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => leading_float(s),
        _ => 0.0,
    }
}

/// Longest-numeric-prefix float parse, 0.0 when no digits lead the string.
fn leading_float(s: &str) -> f64 {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut i = 0;
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    while i < bytes.len() {
        match bytes[i] {
            b'0'..=b'9' => {
                seen_digit = true;
                i += 1;
                end = i;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                i += 1;
                if seen_digit {
                    end = i;
                }
            }
            _ => break,
        }
    }

    if !seen_digit {
        return 0.0;
    }
    t[..end].parse().unwrap_or(0.0)
}
