use anyhow::Context;
use chrono::NaiveDateTime;
use uuid::Uuid;

use super::PgTransaction;
use crate::domain::QueueField;

/// A queue element as seen by an anonymize pass.
#[derive(sqlx::FromRow, Debug)]
pub struct QueueFieldRecord {
    pub id: Uuid,
    pub has_value: bool,
}

#[tracing::instrument(skip(transaction), fields(selected = tracing::field::Empty))]
pub async fn select_queue_elements_before(
    transaction: &mut PgTransaction,
    cutoff: NaiveDateTime,
) -> Result<Vec<Uuid>, anyhow::Error> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM "Queues"
        WHERE created_date < $1
        "#,
    )
    .bind(cutoff)
    .fetch_all(&mut **transaction)
    .await
    .context("Failed to select queue elements older than the cutoff")?;

    tracing::Span::current().record("selected", ids.len());
    Ok(ids)
}

#[tracing::instrument(skip_all, fields(count = ids.len()))]
pub async fn delete_queue_elements(
    transaction: &mut PgTransaction,
    ids: &[Uuid],
) -> Result<(), anyhow::Error> {
    if ids.is_empty() {
        return Ok(());
    }

    sqlx::query(r#"DELETE FROM "Queues" WHERE id = ANY($1)"#)
        .bind(ids)
        .execute(&mut **transaction)
        .await
        .context("Failed to delete queue elements")?;

    Ok(())
}

/// Every queue element older than `cutoff`, with whether `field` is set.
#[tracing::instrument(skip(transaction), fields(selected = tracing::field::Empty))]
pub async fn select_queue_field_before(
    transaction: &mut PgTransaction,
    field: QueueField,
    cutoff: NaiveDateTime,
) -> Result<Vec<QueueFieldRecord>, anyhow::Error> {
    // `column()` is a fixed identifier, never user input
    let query = format!(
        r#"
        SELECT id, {column} IS NOT NULL AS has_value
        FROM "Queues"
        WHERE created_date < $1
        "#,
        column = field.column()
    );

    let records = sqlx::query_as::<_, QueueFieldRecord>(&query)
        .bind(cutoff)
        .fetch_all(&mut **transaction)
        .await
        .with_context(|| format!("Failed to select queue {} older than the cutoff", field.column()))?;

    tracing::Span::current().record("selected", records.len());
    Ok(records)
}

#[tracing::instrument(skip(transaction, ids), fields(count = ids.len()))]
pub async fn clear_queue_field(
    transaction: &mut PgTransaction,
    field: QueueField,
    ids: &[Uuid],
) -> Result<(), anyhow::Error> {
    if ids.is_empty() {
        return Ok(());
    }

    let query = format!(
        r#"UPDATE "Queues" SET {column} = NULL WHERE id = ANY($1)"#,
        column = field.column()
    );

    sqlx::query(&query)
        .bind(ids)
        .execute(&mut **transaction)
        .await
        .with_context(|| format!("Failed to clear queue {}", field.column()))?;

    Ok(())
}
