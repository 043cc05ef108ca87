use anyhow::Context;
use sqlx::{PgConnection, PgPool};
use time::Date;

use super::repo_types::DiaryRow;

/// Append one ledger row. Repeated (user, food, date) rows are allowed and
/// add up.
pub async fn append(
    conn: &mut PgConnection,
    user_id: i64,
    food_id: i64,
    date: Date,
    quantity: f64,
) -> anyhow::Result<i64> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO diary_entries (user_id, food_id, date, quantity)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(food_id)
    .bind(date)
    .bind(quantity)
    .fetch_one(conn)
    .await
    .context("insert diary entry")?;
    Ok(id)
}

/// Entries of `user_id` on exactly `date`, in the order they were logged.
pub async fn list_by_date(db: &PgPool, user_id: i64, date: Date) -> anyhow::Result<Vec<DiaryRow>> {
    let rows = sqlx::query_as::<_, DiaryRow>(
        r#"
        SELECT f.name, f.calories, f.protein, f.carbs, f.fat, e.quantity
          FROM diary_entries e
          JOIN foods f ON e.food_id = f.id
         WHERE e.user_id = $1 AND e.date = $2
         ORDER BY e.id ASC
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await
    .context("list diary entries by date")?;
    Ok(rows)
}
