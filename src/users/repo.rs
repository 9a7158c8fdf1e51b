use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::health::metrics::{
    ActivityLevel, Gender, HealthGoal, HealthMetrics, HealthProfile,
};

/// One account row: identity, health inputs, and the derived targets the
/// metrics calculator maintains. Derived columns are only ever written
/// together with the inputs they were computed from.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_health_details_completed: bool,

    pub age: Option<i32>,
    pub gender: Option<String>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<String>,
    pub dietary_preferences: Option<String>,
    pub allergies: Vec<String>,
    pub medical_conditions: Vec<String>,
    pub health_goals: Option<String>,

    pub bmi: Option<f64>,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    pub protein_target_g: Option<f64>,
    pub fat_target_g: Option<f64>,
    pub carb_target_g: Option<f64>,
    pub recommended_sugar_intake_g: Option<f64>,
    pub recommended_sodium_intake_mg: Option<f64>,

    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT * FROM users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new account with identity and credentials only (signup
    /// step 1); health columns stay NULL until step 2.
    pub async fn create(
        db: &PgPool,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Persist the health inputs and derived targets of this row in one
    /// write, keeping the derived-targets invariant intact.
    pub async fn persist_health(&self, db: &PgPool) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                age = $2,
                gender = $3,
                weight_kg = $4,
                height_cm = $5,
                activity_level = $6,
                dietary_preferences = $7,
                allergies = $8,
                medical_conditions = $9,
                health_goals = $10,
                is_health_details_completed = $11,
                bmi = $12,
                bmr = $13,
                tdee = $14,
                protein_target_g = $15,
                fat_target_g = $16,
                carb_target_g = $17,
                recommended_sugar_intake_g = $18,
                recommended_sodium_intake_mg = $19
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(self.id)
        .bind(self.age)
        .bind(&self.gender)
        .bind(self.weight_kg)
        .bind(self.height_cm)
        .bind(&self.activity_level)
        .bind(&self.dietary_preferences)
        .bind(&self.allergies)
        .bind(&self.medical_conditions)
        .bind(&self.health_goals)
        .bind(self.is_health_details_completed)
        .bind(self.bmi)
        .bind(self.bmr)
        .bind(self.tdee)
        .bind(self.protein_target_g)
        .bind(self.fat_target_g)
        .bind(self.carb_target_g)
        .bind(self.recommended_sugar_intake_g)
        .bind(self.recommended_sodium_intake_mg)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Typed calculator input assembled from the stored labels. Unknown
    /// stored activity/goal labels degrade to their documented fallbacks;
    /// an unknown gender stays missing (insufficient data).
    pub fn health_profile(&self) -> HealthProfile {
        HealthProfile {
            age: self.age.and_then(|a| u32::try_from(a).ok()),
            gender: self.gender.as_deref().and_then(Gender::from_label),
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            activity_level: self
                .activity_level
                .as_deref()
                .map(ActivityLevel::from_label_lossy),
            health_goal: self.health_goals.as_deref().map(HealthGoal::from_label_lossy),
            medical_conditions: self.medical_conditions.clone(),
        }
    }

    /// Write freshly computed targets onto the row, or clear them when the
    /// profile is incomplete. Always paired with [`Self::persist_health`].
    pub fn apply_metrics(&mut self, metrics: Option<&HealthMetrics>) {
        match metrics {
            Some(m) => {
                self.bmi = Some(m.bmi);
                self.bmr = Some(m.bmr);
                self.tdee = Some(m.tdee);
                self.protein_target_g = Some(m.macronutrients.proteins);
                self.fat_target_g = Some(m.macronutrients.fats);
                self.carb_target_g = Some(m.macronutrients.carbohydrates);
                self.recommended_sugar_intake_g = Some(m.recommended_sugar_intake);
                self.recommended_sodium_intake_mg = Some(m.recommended_sodium_intake);
            }
            None => {
                self.bmi = None;
                self.bmr = None;
                self.tdee = None;
                self.protein_target_g = None;
                self.fat_target_g = None;
                self.carb_target_g = None;
                self.recommended_sugar_intake_g = None;
                self.recommended_sodium_intake_mg = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::metrics::compute_metrics;

    fn bare_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test".into(),
            email: "test@example.com".into(),
            password_hash: "hash".into(),
            is_health_details_completed: false,
            age: None,
            gender: None,
            weight_kg: None,
            height_cm: None,
            activity_level: None,
            dietary_preferences: None,
            allergies: vec![],
            medical_conditions: vec![],
            health_goals: None,
            bmi: None,
            bmr: None,
            tdee: None,
            protein_target_g: None,
            fat_target_g: None,
            carb_target_g: None,
            recommended_sugar_intake_g: None,
            recommended_sodium_intake_mg: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn incomplete_row_yields_insufficient_profile() {
        let user = bare_user();
        assert!(compute_metrics(&user.health_profile()).is_none());
    }

    #[test]
    fn complete_row_round_trips_through_profile_and_metrics() {
        let mut user = bare_user();
        user.age = Some(30);
        user.gender = Some("Male".into());
        user.weight_kg = Some(70.0);
        user.height_cm = Some(175.0);
        user.activity_level = Some("Moderately Active".into());
        user.health_goals = Some("General Wellness".into());

        let metrics = compute_metrics(&user.health_profile());
        assert!(metrics.is_some());

        user.apply_metrics(metrics.as_ref());
        assert_eq!(user.protein_target_g, Some(112.0));
        assert_eq!(user.bmr, Some(1648.75));

        user.apply_metrics(None);
        assert!(user.bmi.is_none());
        assert!(user.recommended_sodium_intake_mg.is_none());
    }

    #[test]
    fn negative_stored_age_is_treated_as_missing() {
        let mut user = bare_user();
        user.age = Some(-3);
        assert!(user.health_profile().age.is_none());
    }
}
