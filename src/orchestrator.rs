use std::future::Future;

use anyhow::Context;
use chrono::Local;
use sqlx::PgPool;
use tokio::time::Duration;
use uuid::Uuid;

/// Pause after every orchestrator log message.
///
/// The orchestrator's log viewer orders rows by a coarse timestamp, so messages
/// written back to back can show up out of order. Every message is followed by
/// this pause. Do not remove it.
pub const LOG_SPACING: Duration = Duration::from_millis(10);

/// Where a run reports its progress.
pub trait ProcessLog: Sync {
    /// Writes a single informational message, without pacing.
    fn write_info(&self, message: &str) -> impl Future<Output = Result<(), anyhow::Error>> + Send;

    /// Writes `message` and then waits [`LOG_SPACING`] before returning.
    fn log_info(&self, message: &str) -> impl Future<Output = Result<(), anyhow::Error>> + Send {
        async move {
            self.write_info(message).await?;
            tokio::time::sleep(LOG_SPACING).await;
            Ok(())
        }
    }
}

/// Log sink backed by the orchestrator's own `Logs` table.
pub struct OrchestratorConnection {
    pool: PgPool,
    process_name: String,
}

impl OrchestratorConnection {
    pub fn new(pool: PgPool, process_name: String) -> Self {
        Self { pool, process_name }
    }
}

impl ProcessLog for OrchestratorConnection {
    async fn write_info(&self, message: &str) -> Result<(), anyhow::Error> {
        tracing::info!(process_name = %self.process_name, "{message}");

        // the level is a literal so it also fits an enum-typed column
        sqlx::query(
            r#"
            INSERT INTO "Logs" (id, log_time, log_level, process_name, log_message)
            VALUES ($1, $2, 'INFO', $3, $4)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(Local::now().naive_local())
        .bind(&self.process_name)
        .bind(message)
        .execute(&self.pool)
        .await
        .context("Failed to write a log message to the orchestrator")?;

        Ok(())
    }
}
