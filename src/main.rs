use anyhow::Context;
use gdprbot::configuration::get_config;
use gdprbot::startup::Job;
use gdprbot::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let subscriber = get_subscriber("gdprbot".into(), "info".into(), std::io::stdout);
    if let Err(e) = init_subscriber(subscriber) {
        eprintln!("Telemetry startup error: {e:?}");
        return std::process::ExitCode::FAILURE;
    }

    if let Err(e) = try_main().await {
        tracing::error!(error.cause_chain = ?e, error.message = %e, "GDPR run failed");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> Result<(), anyhow::Error> {
    let config = get_config().context("Failed to read configuration")?;

    // the orchestrator passes the policy as the first argument
    let process_arguments = std::env::args()
        .nth(1)
        .context("Missing process arguments: expected a JSON retention policy")?;

    let job = Job::build(config, &process_arguments)?;
    let report = job.run_to_completion().await?;

    tracing::info!(?report, "GDPR run completed");
    Ok(())
}
