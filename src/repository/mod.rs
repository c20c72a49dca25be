mod logs;
mod queues;
mod store;

pub use logs::*;
pub use queues::*;
use sqlx::{Postgres, Transaction};
pub use store::*;

pub type PgTransaction = Transaction<'static, Postgres>;
