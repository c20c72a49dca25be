use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::configuration::{Configuration, DatabaseConfigs};
use crate::domain::RetentionPolicy;
use crate::orchestrator::OrchestratorConnection;
use crate::repository::PgRetentionStore;
use crate::retention::{RetentionError, RetentionReport, RetentionRunner};

/// A single run of the retention policy against the orchestrator database.
pub struct Job {
    pool: PgPool,
    policy: RetentionPolicy,
    runner: RetentionRunner<PgRetentionStore, OrchestratorConnection>,
}

impl Job {
    /// Parses the process arguments. Fails before touching the database when
    /// they are not a valid policy.
    pub fn build(config: Configuration, process_arguments: &str) -> Result<Self, RetentionError> {
        let policy =
            RetentionPolicy::parse(process_arguments).map_err(RetentionError::InvalidPolicy)?;

        let pool = get_connection_pool(&config.database);
        let runner = RetentionRunner::new(
            PgRetentionStore::new(pool.clone()),
            OrchestratorConnection::new(pool.clone(), config.process.name),
        );

        Ok(Self {
            pool,
            policy,
            runner,
        })
    }

    /// Runs the policy and closes the pool, whether or not the run succeeded.
    pub async fn run_to_completion(self) -> Result<RetentionReport, RetentionError> {
        let outcome = self.runner.run(&self.policy).await;
        self.pool.close().await;
        outcome
    }
}

pub fn get_connection_pool(config: &DatabaseConfigs) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.connect_options())
}
