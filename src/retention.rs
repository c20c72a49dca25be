use std::fmt::{self, Debug, Formatter};

use anyhow::Context;
use chrono::Local;

use crate::domain::{Operation, RetentionPolicy, cutoff_before};
use crate::orchestrator::ProcessLog;
use crate::repository::RetentionStore;
use crate::utils;

#[derive(thiserror::Error)]
pub enum RetentionError {
    #[error("{0}")]
    InvalidPolicy(String),

    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for RetentionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        utils::error_chain_fmt(self, f)
    }
}

/// Rows affected per operation; `None` for operations that were skipped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RetentionReport {
    affected: [Option<u64>; Operation::ALL.len()],
}

impl RetentionReport {
    pub fn affected(&self, operation: Operation) -> Option<u64> {
        self.affected[Self::slot(operation)]
    }

    fn record(&mut self, operation: Operation, affected: u64) {
        self.affected[Self::slot(operation)] = Some(affected);
    }

    // declaration order matches `Operation::ALL`
    fn slot(operation: Operation) -> usize {
        operation as usize
    }
}

pub struct RetentionRunner<S, L> {
    store: S,
    log: L,
}

impl<S, L> RetentionRunner<S, L>
where
    S: RetentionStore,
    L: ProcessLog,
{
    pub fn new(store: S, log: L) -> Self {
        Self { store, log }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Runs every operation in order. The first error stops the run; passes
    /// that already committed stay committed.
    #[tracing::instrument(name = "Running retention policy", skip(self))]
    pub async fn run(&self, policy: &RetentionPolicy) -> Result<RetentionReport, RetentionError> {
        self.log_info("Starting GDPR process.").await?;

        let mut report = RetentionReport::default();
        for operation in Operation::ALL {
            if !policy.is_enabled(operation) {
                self.log_info(operation.skip_message()).await?;
                continue;
            }

            let affected = self.execute(operation, policy.threshold(operation)).await?;
            report.record(operation, affected);
        }

        Ok(report)
    }

    #[tracing::instrument(skip(self, operation), fields(operation = operation.name()))]
    async fn execute(&self, operation: Operation, days: i64) -> Result<u64, RetentionError> {
        let now = Local::now().naive_local();
        let cutoff = cutoff_before(now, days).ok_or_else(|| {
            RetentionError::InvalidPolicy(format!(
                "Invalid retention policy: {} days for {} is out of range.",
                days,
                operation.name()
            ))
        })?;

        self.log_info(&operation.cutoff_message(cutoff)).await?;

        let affected = match (operation, operation.queue_field()) {
            (_, Some(field)) => self.store.anonymize_queue_field(field, cutoff).await,
            (Operation::DeleteLogs, None) => self.store.purge_logs(cutoff).await,
            (_, None) => self.store.purge_queue_elements(cutoff).await,
        }
        .with_context(|| format!("{} failed", operation.name()))?;

        tracing::info!(affected, %cutoff, "Retention pass committed");
        self.log_info(&operation.count_message(affected)).await?;
        Ok(affected)
    }

    async fn log_info(&self, message: &str) -> Result<(), RetentionError> {
        self.log
            .log_info(message)
            .await
            .context("Failed to report progress to the orchestrator")?;
        Ok(())
    }
}
