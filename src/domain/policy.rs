use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Deserialize;

use crate::domain::Operation;

/// Per-operation age thresholds in days. Zero or negative disables the operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RetentionPolicy {
    #[serde(rename = "Delete_Logs", default)]
    delete_logs: i64,
    #[serde(rename = "Delete_Queues", default)]
    delete_queues: i64,
    #[serde(rename = "Anon_Queue_Reference", default)]
    anon_queue_reference: i64,
    #[serde(rename = "Anon_Queue_Data", default)]
    anon_queue_data: i64,
    #[serde(rename = "Anon_Queue_Message", default)]
    anon_queue_message: i64,
}

impl RetentionPolicy {
    /// Parses the JSON object handed to the process as its argument.
    /// Unknown keys are ignored.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|e| format!("Invalid retention policy: {e}"))?;

        // serde would also accept a positional array for a struct
        if !value.is_object() {
            return Err("Invalid retention policy: expected a JSON object.".to_string());
        }

        serde_json::from_value(value).map_err(|e| format!("Invalid retention policy: {e}"))
    }

    pub fn threshold(&self, operation: Operation) -> i64 {
        match operation {
            Operation::DeleteLogs => self.delete_logs,
            Operation::DeleteQueues => self.delete_queues,
            Operation::AnonQueueReference => self.anon_queue_reference,
            Operation::AnonQueueData => self.anon_queue_data,
            Operation::AnonQueueMessage => self.anon_queue_message,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, operation: Operation, days: i64) -> Self {
        let slot = match operation {
            Operation::DeleteLogs => &mut self.delete_logs,
            Operation::DeleteQueues => &mut self.delete_queues,
            Operation::AnonQueueReference => &mut self.anon_queue_reference,
            Operation::AnonQueueData => &mut self.anon_queue_data,
            Operation::AnonQueueMessage => &mut self.anon_queue_message,
        };
        *slot = days;
        self
    }

    pub fn is_enabled(&self, operation: Operation) -> bool {
        self.threshold(operation) > 0
    }
}

/// Earliest year a Postgres `TIMESTAMP` holds (4713 BC, proleptic year -4712).
const EARLIEST_TIMESTAMP_YEAR: i32 = -4712;

/// `now` minus `days`, or `None` when the result cannot be stored in the
/// orchestrator's `TIMESTAMP` columns.
pub fn cutoff_before(now: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
    let earliest = NaiveDate::from_ymd_opt(EARLIEST_TIMESTAMP_YEAR, 1, 1)?
        .and_hms_opt(0, 0, 0)?;

    TimeDelta::try_days(days)
        .and_then(|age| now.checked_sub_signed(age))
        .filter(|cutoff| *cutoff >= earliest)
}
