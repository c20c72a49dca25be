use chrono::NaiveDateTime;

/// The five retention passes, in the order a run performs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DeleteLogs,
    DeleteQueues,
    AnonQueueReference,
    AnonQueueData,
    AnonQueueMessage,
}

/// Nullable queue element columns that can be anonymized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueField {
    Reference,
    Data,
    Message,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::DeleteLogs,
        Operation::DeleteQueues,
        Operation::AnonQueueReference,
        Operation::AnonQueueData,
        Operation::AnonQueueMessage,
    ];

    /// Key of this operation in the process arguments.
    pub fn name(self) -> &'static str {
        match self {
            Operation::DeleteLogs => "Delete_Logs",
            Operation::DeleteQueues => "Delete_Queues",
            Operation::AnonQueueReference => "Anon_Queue_Reference",
            Operation::AnonQueueData => "Anon_Queue_Data",
            Operation::AnonQueueMessage => "Anon_Queue_Message",
        }
    }

    /// The field this operation nulls, or `None` for whole-row deletes.
    pub fn queue_field(self) -> Option<QueueField> {
        match self {
            Operation::DeleteLogs | Operation::DeleteQueues => None,
            Operation::AnonQueueReference => Some(QueueField::Reference),
            Operation::AnonQueueData => Some(QueueField::Data),
            Operation::AnonQueueMessage => Some(QueueField::Message),
        }
    }

    pub fn skip_message(self) -> &'static str {
        match self {
            Operation::DeleteLogs => "Skipping: Delete logs",
            Operation::DeleteQueues => "Skipping: Delete queue elements",
            Operation::AnonQueueReference => "Skipping: Delete queue element references",
            Operation::AnonQueueData => "Skipping: Delete queue element data",
            Operation::AnonQueueMessage => "Skipping: Delete queue element messages",
        }
    }

    pub fn cutoff_message(self, cutoff: NaiveDateTime) -> String {
        let subject = match self {
            Operation::DeleteLogs => "logs",
            Operation::DeleteQueues => "queue elements",
            Operation::AnonQueueReference => "queue references",
            Operation::AnonQueueData => "queue data",
            Operation::AnonQueueMessage => "queue messages",
        };
        format!("Deleting {subject} before: {}", cutoff.date())
    }

    pub fn count_message(self, affected: u64) -> String {
        let subject = match self {
            Operation::DeleteLogs => "Logs",
            Operation::DeleteQueues => "Queue elements",
            Operation::AnonQueueReference => "Queue references",
            Operation::AnonQueueData => "Queue data",
            Operation::AnonQueueMessage => "Queue messages",
        };
        format!("{subject} deleted: {affected}")
    }
}

impl QueueField {
    /// Column name in the orchestrator's `Queues` table.
    pub fn column(self) -> &'static str {
        match self {
            QueueField::Reference => "reference",
            QueueField::Data => "data",
            QueueField::Message => "message",
        }
    }
}
