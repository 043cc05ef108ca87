use anyhow::Context;
use sqlx::PgPool;
use time::Date;

use super::repo_types::DailySummary;

/// Sums `nutrient * quantity` over the user's entries for `date`. SQL `SUM`
/// over an empty group yields NULL, which is passed through as `None`.
pub async fn summarize(db: &PgPool, user_id: i64, date: Date) -> anyhow::Result<DailySummary> {
    let summary = sqlx::query_as::<_, DailySummary>(
        r#"
        SELECT SUM(f.calories * e.quantity) AS total_calories,
               SUM(f.protein  * e.quantity) AS total_protein,
               SUM(f.carbs    * e.quantity) AS total_carbs,
               SUM(f.fat      * e.quantity) AS total_fat
          FROM diary_entries e
          JOIN foods f ON e.food_id = f.id
         WHERE e.user_id = $1 AND e.date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(db)
    .await
    .context("summarize diary day")?;
    Ok(summary)
}
