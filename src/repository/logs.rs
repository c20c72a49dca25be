use anyhow::Context;
use chrono::NaiveDateTime;
use uuid::Uuid;

use super::PgTransaction;

#[tracing::instrument(skip(transaction), fields(selected = tracing::field::Empty))]
pub async fn select_logs_before(
    transaction: &mut PgTransaction,
    cutoff: NaiveDateTime,
) -> Result<Vec<Uuid>, anyhow::Error> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM "Logs"
        WHERE log_time < $1
        "#,
    )
    .bind(cutoff)
    .fetch_all(&mut **transaction)
    .await
    .context("Failed to select logs older than the cutoff")?;

    tracing::Span::current().record("selected", ids.len());
    Ok(ids)
}

#[tracing::instrument(skip_all, fields(count = ids.len()))]
pub async fn delete_logs(transaction: &mut PgTransaction, ids: &[Uuid]) -> Result<(), anyhow::Error> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(r#"DELETE FROM "Logs" WHERE id = ANY($1)"#)
        .bind(ids)
        .execute(&mut **transaction)
        .await
        .context("Failed to delete logs")?;

    Ok(())
}
