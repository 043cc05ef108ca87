use anyhow::Context;
use sqlx::{PgConnection, PgExecutor};
use tracing::debug;

use super::{Food, NewFood};

/// Exact, case-sensitive lookup by name.
pub async fn find_by_name<'e, E>(db: E, name: &str) -> anyhow::Result<Option<Food>>
where
    E: PgExecutor<'e>,
{
    let food = sqlx::query_as::<_, Food>(
        r#"
        SELECT id, name, calories, protein, carbs, fat
          FROM foods
         WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await
    .context("find food by name")?;
    Ok(food)
}

/// Returns the id of the food called `food.name`, inserting it with the
/// given nutrients if it does not exist yet. An existing row is never
/// modified; the supplied nutrients are ignored in that case.
///
/// Relies on `UNIQUE(name)`: a concurrent insert of the same name makes ours
/// a no-op and the follow-up read returns the winner's row.
pub async fn find_or_create(conn: &mut PgConnection, food: &NewFood) -> anyhow::Result<i64> {
    if let Some(existing) = find_by_name(&mut *conn, &food.name).await? {
        return Ok(existing.id);
    }

    let inserted = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO foods (name, calories, protein, carbs, fat)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (name) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&food.name)
    .bind(food.calories)
    .bind(food.protein)
    .bind(food.carbs)
    .bind(food.fat)
    .fetch_optional(&mut *conn)
    .await
    .context("insert food")?;

    if let Some(id) = inserted {
        debug!(food_id = id, name = %food.name, "food created");
        return Ok(id);
    }

    let existing = find_by_name(&mut *conn, &food.name)
        .await?
        .context("food vanished after insert conflict")?;
    Ok(existing.id)
}
