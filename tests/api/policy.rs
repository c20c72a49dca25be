use crate::helpers::{self, SeedQueueElement};
use claims::{assert_err, assert_matches};
use gdprbot::retention::RetentionError;

#[tokio::test]
async fn an_empty_policy_skips_everything_in_order() {
    let db = helpers::spawn_database().await;
    db.seed_log(500).await;
    db.seed_queue_element(&SeedQueueElement::aged(500)).await;

    db.run_job("{}").await.unwrap();

    assert_eq!(
        db.job_messages().await,
        [
            "Starting GDPR process.",
            "Skipping: Delete logs",
            "Skipping: Delete queue elements",
            "Skipping: Delete queue element references",
            "Skipping: Delete queue element data",
            "Skipping: Delete queue element messages",
        ]
    );
    assert_eq!(db.seeded_log_times().await.len(), 1);
    let elements = db.queue_elements().await;
    assert_eq!(elements.len(), 1);
    assert!(elements[0].data.is_some());
}

#[tokio::test]
async fn zero_and_negative_thresholds_touch_nothing() {
    let db = helpers::spawn_database().await;
    db.seed_log(500).await;

    db.run_job(r#"{"Delete_Logs": 0, "Delete_Queues": -1}"#)
        .await
        .unwrap();

    assert_eq!(db.seeded_log_times().await.len(), 1);
}

#[tokio::test]
async fn malformed_arguments_abort_before_any_operation() {
    let db = helpers::spawn_database().await;
    db.seed_log(500).await;

    let error = assert_err!(db.run_job(r#"{"Delete_Logs": "thirty"}"#).await);

    assert_matches!(error, RetentionError::InvalidPolicy(_));
    assert!(db.job_messages().await.is_empty());
    assert_eq!(db.seeded_log_times().await.len(), 1);
}
