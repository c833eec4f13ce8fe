use async_trait::async_trait;

use crate::executor::SerialExecutor;
use crate::task::PendingTask;

use super::TaskQueue;

pub struct DirectQueue {
    executor: SerialExecutor,
}

impl DirectQueue {
    pub fn new() -> Self {
        Self {
            executor: SerialExecutor::new(),
        }
    }
}

impl Default for DirectQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskQueue for DirectQueue {
    async fn enqueue(&self, task: PendingTask) {
        self.executor.submit(task);
    }

    async fn cancel_all(&self) {
        self.executor.cancel_all();
    }
}
