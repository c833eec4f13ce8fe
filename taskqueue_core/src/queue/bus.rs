use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::executor::SerialExecutor;
use crate::task::PendingTask;

use super::TaskQueue;

enum QueueEvent {
    Enqueue(PendingTask),
    CancelAll,
}

// notification-mediated surface: submissions travel through an in-process bus
// and a single subscriber applies them to the executor in publish order
pub struct BusQueue {
    publisher: mpsc::UnboundedSender<QueueEvent>,
}

impl BusQueue {
    pub fn new() -> Self {
        let executor = SerialExecutor::new();
        let (publisher, mut subscriber) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(event) = subscriber.recv().await {
                match event {
                    QueueEvent::Enqueue(task) => executor.submit(task),
                    QueueEvent::CancelAll => executor.cancel_all(),
                }
            }
        });

        Self { publisher }
    }
}

impl Default for BusQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskQueue for BusQueue {
    async fn enqueue(&self, task: PendingTask) {
        // send only fails once the subscriber is gone, i.e. the runtime is shutting down
        let _ = self.publisher.send(QueueEvent::Enqueue(task));
    }

    async fn cancel_all(&self) {
        let _ = self.publisher.send(QueueEvent::CancelAll);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};
    use tokio::sync::Notify;

    use super::*;
    use crate::error::TaskError;

    #[tokio::test]
    async fn bus_preserves_submission_order() {
        let queue = BusQueue::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for value in [1, 2, 3] {
            let log = Arc::clone(&log);
            let (task, handle) = PendingTask::new(move |_progress, _token| async move {
                log.lock().unwrap().push(value);
                Ok(json!(value))
            });
            queue.enqueue(task).await;
            handles.push(handle);
        }

        for (handle, expected) in handles.into_iter().zip([1, 2, 3]) {
            let result = handle.wait().await.expect("task should complete");
            assert_eq!(result, json!(expected), "each task should resolve to its own value");
        }

        assert_eq!(
            *log.lock().unwrap(),
            vec![1, 2, 3],
            "bus dispatch must not reorder submissions"
        );
    }

    #[tokio::test]
    async fn bus_cancel_discards_pending_work() {
        let queue = BusQueue::new();
        let started = Arc::new(Notify::new());

        let (blocker, blocker_handle) = {
            let started = Arc::clone(&started);
            PendingTask::new(move |_progress, mut token| async move {
                started.notify_one();
                token.aborted().await;
                Err(token.cancellation())
            })
        };
        queue.enqueue(blocker).await;
        started.notified().await;

        let pending_ran = Arc::new(AtomicBool::new(false));
        let (pending, pending_handle) = {
            let pending_ran = Arc::clone(&pending_ran);
            PendingTask::new(move |_progress, _token| async move {
                pending_ran.store(true, Ordering::SeqCst);
                Ok(Value::Null)
            })
        };
        queue.enqueue(pending).await;
        queue.cancel_all().await;

        assert!(
            matches!(blocker_handle.wait().await, Err(TaskError::Cancelled(_))),
            "running task should exit through the cancellation path"
        );
        assert!(
            matches!(pending_handle.wait().await, Err(TaskError::Cancelled(_))),
            "pending task should be discarded"
        );
        assert!(
            !pending_ran.load(Ordering::SeqCst),
            "discarded operation should never run"
        );
    }
}
