//! Health-metrics calculator: derives BMI, BMR, TDEE, macronutrient targets
//! and recommended daily sugar/sodium intake from a user's biometric profile.
//!
//! Pure and deterministic: no I/O, no clock, and the adjustment order below is
//! fixed so results are reproducible bit-for-bit.

use serde::Serialize;

// === Constants ===

/// kcal per gram of sugar.
pub const KCAL_PER_GRAM_SUGAR: f64 = 4.0;

/// Baseline sodium allowance (mg) for a 2000 kcal diet.
pub const BASE_SODIUM_MG: f64 = 2300.0;

/// Calorie baseline the sodium allowance is scaled against.
pub const SODIUM_BASELINE_KCAL: f64 = 2000.0;

/// Sodium reduction applied per risk condition present.
pub const SODIUM_RISK_STEP: f64 = 0.15;

/// Floor for the combined sodium risk multiplier (max 30% reduction).
pub const MIN_SODIUM_RISK_MULTIPLIER: f64 = 0.7;

/// Age (years) from which the senior sugar/sodium reductions apply.
pub const SENIOR_AGE: u32 = 65;

/// Medical conditions that each shave [`SODIUM_RISK_STEP`] off the sodium
/// risk multiplier. Compared case-insensitively.
const SODIUM_RISK_CONDITIONS: [&str; 3] = ["diabetes", "diabetes management", "hypertension"];

// === Profile inputs ===

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
}

impl ActivityLevel {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Sedentary" => Some(Self::Sedentary),
            "Lightly Active" => Some(Self::LightlyActive),
            "Moderately Active" => Some(Self::ModeratelyActive),
            "Very Active" => Some(Self::VeryActive),
            _ => None,
        }
    }

    /// Lenient variant for labels read back from storage: an unrecognized
    /// label falls back to [`Self::Sedentary`] (multiplier 1.2).
    pub fn from_label_lossy(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Self::Sedentary)
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary",
            Self::LightlyActive => "Lightly Active",
            Self::ModeratelyActive => "Moderately Active",
            Self::VeryActive => "Very Active",
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthGoal {
    WeightLoss,
    MuscleGain,
    GeneralWellness,
    LowSodiumDiet,
    HeartHealth,
    DiabetesManagement,
}

impl HealthGoal {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Weight Loss" => Some(Self::WeightLoss),
            "Muscle Gain" => Some(Self::MuscleGain),
            "General Wellness" => Some(Self::GeneralWellness),
            "Low-Sodium Diet" => Some(Self::LowSodiumDiet),
            "Heart Health" => Some(Self::HeartHealth),
            "Diabetes Management" => Some(Self::DiabetesManagement),
            _ => None,
        }
    }

    /// Lenient variant for labels read back from storage: an unrecognized
    /// label falls back to [`Self::GeneralWellness`] (the default factors).
    pub fn from_label_lossy(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Self::GeneralWellness)
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::WeightLoss => "Weight Loss",
            Self::MuscleGain => "Muscle Gain",
            Self::GeneralWellness => "General Wellness",
            Self::LowSodiumDiet => "Low-Sodium Diet",
            Self::HeartHealth => "Heart Health",
            Self::DiabetesManagement => "Diabetes Management",
        }
    }

    /// Per-kilogram macro factors (grams per kg of bodyweight per day).
    fn macro_factors(&self) -> (f64, f64, f64) {
        match self {
            Self::WeightLoss => (1.8, 0.8, 3.0),
            Self::MuscleGain => (2.2, 1.2, 6.0),
            _ => (1.6, 1.0, 4.5),
        }
    }
}

/// Biometric and goal inputs the calculator consumes. Missing fields are a
/// normal state during partial signup, not an error.
#[derive(Debug, Clone, Default)]
pub struct HealthProfile {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub health_goal: Option<HealthGoal>,
    pub medical_conditions: Vec<String>,
}

// === Derived targets ===

/// Daily macronutrient targets in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroTargets {
    pub proteins: f64,
    pub fats: f64,
    pub carbohydrates: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub bmi: f64,
    /// Basal metabolic rate, kcal/day.
    pub bmr: f64,
    /// Total daily energy expenditure, kcal/day.
    pub tdee: f64,
    pub macronutrients: MacroTargets,
    /// Grams of added sugar per day.
    pub recommended_sugar_intake: f64,
    /// Milligrams of sodium per day, rounded to the nearest integer.
    pub recommended_sodium_intake: f64,
}

// === Calculator ===

/// Derives the full set of nutritional targets from a profile.
///
/// Returns `None` iff any of weight, height, age, gender, activity level or
/// health goal is missing or non-positive. Callers must treat `None` as
/// "insufficient data", a recoverable state during partial signup.
pub fn compute_metrics(profile: &HealthProfile) -> Option<HealthMetrics> {
    let weight = profile.weight_kg.filter(|w| *w > 0.0)?;
    let height = profile.height_cm.filter(|h| *h > 0.0)?;
    let age = profile.age.filter(|a| *a > 0)?;
    let gender = profile.gender?;
    let activity = profile.activity_level?;
    let goal = profile.health_goal?;

    let height_m = height / 100.0;
    let bmi = weight / (height_m * height_m);

    // Mifflin-St Jeor. Other shares the Female constant; see DESIGN.md.
    let bmr = match gender {
        Gender::Male => 10.0 * weight + 6.25 * height - 5.0 * age as f64 + 5.0,
        Gender::Female | Gender::Other => 10.0 * weight + 6.25 * height - 5.0 * age as f64 - 161.0,
    };

    let tdee = bmr * activity.multiplier();

    let (protein_factor, fat_factor, carb_factor) = goal.macro_factors();
    let macronutrients = MacroTargets {
        proteins: weight * protein_factor,
        fats: weight * fat_factor,
        carbohydrates: weight * carb_factor,
    };

    let conditions: Vec<String> = profile
        .medical_conditions
        .iter()
        .map(|c| c.to_lowercase())
        .collect();
    let has_condition = |c: &str| conditions.iter().any(|x| x == c);

    // Sugar: share of TDEE, adjusted in this order.
    let mut sugar_pct = if goal == HealthGoal::WeightLoss { 0.05 } else { 0.10 };
    if has_condition("diabetes") || has_condition("diabetes management") {
        sugar_pct *= 0.8;
    }
    if age >= SENIOR_AGE {
        sugar_pct *= 0.9;
    }
    let recommended_sugar_intake = (tdee * sugar_pct) / KCAL_PER_GRAM_SUGAR;

    // Sodium: calorie-scaled baseline, then risk, goal and age reductions.
    let mut sodium = BASE_SODIUM_MG * (tdee / SODIUM_BASELINE_KCAL);
    let mut risk_multiplier = 1.0;
    for condition in SODIUM_RISK_CONDITIONS {
        if has_condition(condition) {
            risk_multiplier -= SODIUM_RISK_STEP;
        }
    }
    if risk_multiplier < MIN_SODIUM_RISK_MULTIPLIER {
        risk_multiplier = MIN_SODIUM_RISK_MULTIPLIER;
    }
    sodium *= risk_multiplier;
    if goal == HealthGoal::WeightLoss {
        sodium *= 0.9;
    }
    if age >= SENIOR_AGE {
        sodium *= 0.95;
    }
    let recommended_sodium_intake = sodium.round();

    Some(HealthMetrics {
        bmi,
        bmr,
        tdee,
        macronutrients,
        recommended_sugar_intake,
        recommended_sodium_intake,
    })
}

// === Unit Tests ===

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn reference_profile() -> HealthProfile {
        HealthProfile {
            age: Some(30),
            gender: Some(Gender::Male),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            activity_level: Some(ActivityLevel::ModeratelyActive),
            health_goal: Some(HealthGoal::GeneralWellness),
            medical_conditions: vec![],
        }
    }

    #[test]
    fn reference_profile_values() {
        let m = compute_metrics(&reference_profile()).expect("complete profile");

        // BMI = 70 / 1.75^2
        assert!(approx_eq(m.bmi, 22.857142857142858, 1e-9));
        // BMR = 10*70 + 6.25*175 - 5*30 + 5
        assert_eq!(m.bmr, 1648.75);
        // TDEE = BMR * 1.55
        assert_eq!(m.tdee, 1648.75 * 1.55);
        // General Wellness factors: 1.6 / 1.0 / 4.5 per kg
        assert_eq!(m.macronutrients.proteins, 112.0);
        assert_eq!(m.macronutrients.fats, 70.0);
        assert_eq!(m.macronutrients.carbohydrates, 315.0);
        // 10% of TDEE at 4 kcal/g
        assert!(approx_eq(m.recommended_sugar_intake, m.tdee * 0.10 / 4.0, 1e-9));
        // 2300 scaled by TDEE/2000, no reductions, rounded
        assert_eq!(
            m.recommended_sodium_intake,
            (2300.0 * (m.tdee / 2000.0)).round()
        );
    }

    #[test]
    fn is_deterministic() {
        let profile = reference_profile();
        let a = compute_metrics(&profile).unwrap();
        let b = compute_metrics(&profile).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn returns_none_when_any_required_field_missing() {
        let complete = reference_profile();
        assert!(compute_metrics(&complete).is_some());

        let mut p = complete.clone();
        p.age = None;
        assert!(compute_metrics(&p).is_none());

        let mut p = complete.clone();
        p.gender = None;
        assert!(compute_metrics(&p).is_none());

        let mut p = complete.clone();
        p.weight_kg = None;
        assert!(compute_metrics(&p).is_none());

        let mut p = complete.clone();
        p.height_cm = None;
        assert!(compute_metrics(&p).is_none());

        let mut p = complete.clone();
        p.activity_level = None;
        assert!(compute_metrics(&p).is_none());

        let mut p = complete.clone();
        p.health_goal = None;
        assert!(compute_metrics(&p).is_none());
    }

    #[test]
    fn returns_none_on_non_positive_inputs() {
        let mut p = reference_profile();
        p.weight_kg = Some(0.0);
        assert!(compute_metrics(&p).is_none());

        let mut p = reference_profile();
        p.height_cm = Some(-170.0);
        assert!(compute_metrics(&p).is_none());

        let mut p = reference_profile();
        p.age = Some(0);
        assert!(compute_metrics(&p).is_none());
    }

    #[test]
    fn other_gender_uses_female_coefficients() {
        let mut female = reference_profile();
        female.gender = Some(Gender::Female);
        let mut other = reference_profile();
        other.gender = Some(Gender::Other);

        let f = compute_metrics(&female).unwrap();
        let o = compute_metrics(&other).unwrap();
        assert_eq!(f.bmr, o.bmr);
        // 166 kcal below the male constant set
        let m = compute_metrics(&reference_profile()).unwrap();
        assert_eq!(m.bmr - f.bmr, 166.0);
    }

    #[test]
    fn sugar_and_sodium_adjustments_compose_in_order() {
        // Weight Loss + diabetes + age 70: pct = 0.05 * 0.8 * 0.9 = 0.036
        let profile = HealthProfile {
            age: Some(70),
            gender: Some(Gender::Male),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            activity_level: Some(ActivityLevel::ModeratelyActive),
            health_goal: Some(HealthGoal::WeightLoss),
            medical_conditions: vec!["Diabetes".into()],
        };
        let m = compute_metrics(&profile).unwrap();

        // BMR = 10*70 + 6.25*175 - 5*70 + 5 = 1448.75, TDEE = *1.55
        assert_eq!(m.tdee, 1448.75 * 1.55);
        assert!(approx_eq(m.recommended_sugar_intake, m.tdee * 0.036 / 4.0, 1e-9));

        // sodium: base * scale * 0.85 (one risk) * 0.9 (weight loss) * 0.95 (senior)
        let expected = (2300.0 * (m.tdee / 2000.0) * 0.85 * 0.9 * 0.95).round();
        assert_eq!(m.recommended_sodium_intake, expected);
    }

    #[test]
    fn sodium_risk_multiplier_is_clamped() {
        let mut profile = reference_profile();
        profile.medical_conditions = vec![
            "Diabetes".into(),
            "Hypertension".into(),
            "Diabetes Management".into(),
        ];
        let m = compute_metrics(&profile).unwrap();

        // 1.0 - 3*0.15 = 0.55 would exceed the 30% cap; clamps to 0.7
        let expected = (2300.0 * (m.tdee / 2000.0) * 0.7).round();
        assert_eq!(m.recommended_sodium_intake, expected);
    }

    #[test]
    fn condition_matching_is_case_insensitive() {
        let mut profile = reference_profile();
        profile.medical_conditions = vec!["DIABETES".into()];
        let m = compute_metrics(&profile).unwrap();
        assert!(approx_eq(m.recommended_sugar_intake, m.tdee * 0.08 / 4.0, 1e-9));
    }

    #[test]
    fn senior_boundary_is_inclusive() {
        let mut at_65 = reference_profile();
        at_65.age = Some(65);
        let mut at_64 = reference_profile();
        at_64.age = Some(64);

        let older = compute_metrics(&at_65).unwrap();
        let younger = compute_metrics(&at_64).unwrap();

        assert!(approx_eq(older.recommended_sugar_intake, older.tdee * 0.09 / 4.0, 1e-9));
        assert!(approx_eq(younger.recommended_sugar_intake, younger.tdee * 0.10 / 4.0, 1e-9));
    }

    #[test]
    fn unknown_stored_labels_fall_back() {
        assert_eq!(
            ActivityLevel::from_label_lossy("Couch Potato"),
            ActivityLevel::Sedentary
        );
        assert_eq!(
            HealthGoal::from_label_lossy("Marathon Prep"),
            HealthGoal::GeneralWellness
        );
        assert!(ActivityLevel::from_label("Couch Potato").is_none());
        assert!(Gender::from_label("male").is_none());
    }

    #[test]
    fn metrics_serialize_with_wire_casing() {
        let m = compute_metrics(&reference_profile()).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("recommendedSugarIntake"));
        assert!(json.contains("recommendedSodiumIntake"));
        assert!(json.contains("\"macronutrients\":{\"proteins\""));
    }
}
