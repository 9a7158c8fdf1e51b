use serde_json::Value;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::consumption::ConsumptionOutcome;

/// One persisted food-label scan: the opaque analysis report plus the
/// consumption outcome derived from the user's declaration.
#[derive(Debug, Clone, FromRow)]
pub struct FoodScan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub image_url: Option<String>,
    pub analysis: Value,
    pub consumption_status: String,
    pub consumption_percentage: f64,
    pub consumed_carbohydrates_g: f64,
    pub consumed_fats_g: f64,
    pub consumed_proteins_g: f64,
    pub sugar_consumed_g: f64,
    pub created_at: OffsetDateTime,
}

impl FoodScan {
    /// Store a new scan. The consumption sub-record starts pending with all
    /// amounts zero (column defaults).
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        image_url: Option<&str>,
        analysis: &Value,
    ) -> anyhow::Result<FoodScan> {
        let scan = sqlx::query_as::<_, FoodScan>(
            r#"
            INSERT INTO food_scans (user_id, image_url, analysis)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(image_url)
        .bind(analysis)
        .fetch_one(db)
        .await?;
        Ok(scan)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<FoodScan>> {
        let scan = sqlx::query_as::<_, FoodScan>(
            r#"SELECT * FROM food_scans WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(scan)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<FoodScan>> {
        let scans = sqlx::query_as::<_, FoodScan>(
            r#"
            SELECT * FROM food_scans
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(scans)
    }

    /// Consumed scans created inside [start, end), oldest first — the
    /// dashboard's one-day window.
    pub async fn list_consumed_between(
        db: &PgPool,
        user_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<FoodScan>> {
        let scans = sqlx::query_as::<_, FoodScan>(
            r#"
            SELECT * FROM food_scans
            WHERE user_id = $1
              AND consumption_status = 'consumed'
              AND created_at >= $2
              AND created_at < $3
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
        Ok(scans)
    }

    /// Conditional pending→resolved transition. Returns the updated row, or
    /// `None` when the scan is missing or its consumption was already
    /// recorded — in which case nothing was written.
    pub async fn apply_consumption(
        db: &PgPool,
        id: Uuid,
        outcome: &ConsumptionOutcome,
    ) -> anyhow::Result<Option<FoodScan>> {
        let scan = sqlx::query_as::<_, FoodScan>(
            r#"
            UPDATE food_scans SET
                consumption_status = $2,
                consumption_percentage = $3,
                consumed_carbohydrates_g = $4,
                consumed_fats_g = $5,
                consumed_proteins_g = $6,
                sugar_consumed_g = $7
            WHERE id = $1 AND consumption_status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(outcome.status.as_str())
        .bind(outcome.percentage)
        .bind(outcome.macros.carbohydrates)
        .bind(outcome.macros.fats)
        .bind(outcome.macros.proteins)
        .bind(outcome.sugar_g)
        .fetch_optional(db)
        .await?;
        Ok(scan)
    }
}
