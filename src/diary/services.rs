use anyhow::Context;
use sqlx::PgPool;

use super::{dto::ValidatedEntry, repo};
use crate::foods;

/// Resolves the food in the catalog and appends the ledger row in one
/// transaction. Dropping `tx` on any error rolls both writes back.
pub async fn log_food(db: &PgPool, user_id: i64, entry: &ValidatedEntry) -> anyhow::Result<i64> {
    let mut tx = db.begin().await.context("begin tx")?;
    let food_id = foods::repo::find_or_create(&mut tx, &entry.food).await?;
    let entry_id = repo::append(&mut tx, user_id, food_id, entry.date, entry.quantity).await?;
    tx.commit().await.context("commit tx")?;
    Ok(entry_id)
}
