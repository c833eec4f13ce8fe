use async_trait::async_trait;

use crate::task::PendingTask;

pub mod bus;
pub mod direct;

pub use bus::BusQueue;
pub use direct::DirectQueue;

// one method table, two dispatch paths into the same executor
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, task: PendingTask);
    async fn cancel_all(&self);
}
