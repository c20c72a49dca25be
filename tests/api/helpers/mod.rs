
use chrono::NaiveDateTime;
use gdprbot::configuration::{self, Configuration, DatabaseConfigs};
use gdprbot::retention::{RetentionError, RetentionReport};
use gdprbot::startup::{self, Job};
use gdprbot::telemetry;
use secrecy::Secret;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::sync::OnceLock;
use uuid::Uuid;

pub use seed::*;

/// Process name the job under test writes its own log rows with.
pub const JOB_PROCESS_NAME: &str = "GDPR Bot under test";

pub struct TestDatabase {
    pub db_pool: PgPool,
    pub config: Configuration,
}

static TRACING: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let default_filter_level = "info".to_string();
        let subscriber_name = "test".to_string();

        if std::env::var("TEST_LOG").is_ok() {
            let subscriber = telemetry::get_subscriber(
                subscriber_name,
                default_filter_level,
                std::io::stdout,
            );
            telemetry::init_subscriber(subscriber).expect("Failed to init tracing");
        } else {
            let subscriber =
                telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
            telemetry::init_subscriber(subscriber).expect("Failed to init tracing");
        };
    });
}

pub async fn spawn_database() -> TestDatabase {
    init_tracing();

    let config = {
        let mut c = configuration::get_config().expect("Failed to read configuration.");
        c.database.database_name = Uuid::new_v4().to_string();
        c.process.name = JOB_PROCESS_NAME.to_string();
        c
    };

    let db_pool = configure_database(&config.database).await;

    TestDatabase { db_pool, config }
}

impl TestDatabase {
    /// Builds and runs a job the way the binary does, with `arguments` as the
    /// process argument.
    pub async fn run_job(&self, arguments: &str) -> Result<RetentionReport, RetentionError> {
        Job::build(self.config.clone(), arguments)?.run_to_completion().await
    }

    /// Messages the job under test wrote to the orchestrator log, oldest first.
    pub async fn job_messages(&self) -> Vec<String> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT log_message FROM "Logs"
            WHERE process_name = $1
            ORDER BY log_time
            "#,
        )
        .bind(JOB_PROCESS_NAME)
        .fetch_all(&self.db_pool)
        .await
        .expect("Failed to read job messages")
    }

    /// Timestamps of log rows that were not written by the job under test.
    pub async fn seeded_log_times(&self) -> Vec<NaiveDateTime> {
        sqlx::query_scalar::<_, NaiveDateTime>(
            r#"
            SELECT log_time FROM "Logs"
            WHERE process_name <> $1
            ORDER BY log_time
            "#,
        )
        .bind(JOB_PROCESS_NAME)
        .fetch_all(&self.db_pool)
        .await
        .expect("Failed to read seeded logs")
    }
}

async fn configure_database(config: &DatabaseConfigs) -> PgPool {
    let maintenance_settings = DatabaseConfigs {
        database_name: "postgres".to_string(),
        username: "postgres".to_string(),
        password: Secret::new("password".to_string()),
        ..config.clone()
    };

    let mut connection = PgConnection::connect_with(&maintenance_settings.connect_options())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = startup::get_connection_pool(config);

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}
