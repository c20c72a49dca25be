use std::future::Future;

use anyhow::Context;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    clear_queue_field, delete_logs, delete_queue_elements, select_logs_before,
    select_queue_elements_before, select_queue_field_before,
};
use crate::domain::QueueField;

/// One committed retention pass per call. Each returns the number of rows the
/// pass affected.
pub trait RetentionStore: Sync {
    /// Deletes every log record with a timestamp before `cutoff`.
    fn purge_logs(
        &self,
        cutoff: NaiveDateTime,
    ) -> impl Future<Output = Result<u64, anyhow::Error>> + Send;

    /// Deletes every queue element created before `cutoff`.
    fn purge_queue_elements(
        &self,
        cutoff: NaiveDateTime,
    ) -> impl Future<Output = Result<u64, anyhow::Error>> + Send;

    /// Nulls `field` on every queue element created before `cutoff`. Only
    /// elements whose field was set are counted.
    fn anonymize_queue_field(
        &self,
        field: QueueField,
        cutoff: NaiveDateTime,
    ) -> impl Future<Output = Result<u64, anyhow::Error>> + Send;
}

pub struct PgRetentionStore {
    pool: PgPool,
}

impl PgRetentionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl RetentionStore for PgRetentionStore {
    #[tracing::instrument(skip(self))]
    async fn purge_logs(&self, cutoff: NaiveDateTime) -> Result<u64, anyhow::Error> {
        // rolled back on drop if anything below fails
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to start a transaction")?;

        let ids = select_logs_before(&mut transaction, cutoff).await?;
        delete_logs(&mut transaction, &ids).await?;

        transaction
            .commit()
            .await
            .context("Failed to commit the log purge")?;
        Ok(ids.len() as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn purge_queue_elements(&self, cutoff: NaiveDateTime) -> Result<u64, anyhow::Error> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to start a transaction")?;

        let ids = select_queue_elements_before(&mut transaction, cutoff).await?;
        delete_queue_elements(&mut transaction, &ids).await?;

        transaction
            .commit()
            .await
            .context("Failed to commit the queue element purge")?;
        Ok(ids.len() as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn anonymize_queue_field(
        &self,
        field: QueueField,
        cutoff: NaiveDateTime,
    ) -> Result<u64, anyhow::Error> {
        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to start a transaction")?;

        let records = select_queue_field_before(&mut transaction, field, cutoff).await?;
        let populated: Vec<Uuid> = records
            .into_iter()
            .filter(|record| record.has_value)
            .map(|record| record.id)
            .collect();
        clear_queue_field(&mut transaction, field, &populated).await?;

        transaction
            .commit()
            .await
            .with_context(|| format!("Failed to commit the queue {} anonymization", field.column()))?;
        Ok(populated.len() as u64)
    }
}
