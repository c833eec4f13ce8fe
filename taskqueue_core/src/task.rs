use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::cancel::CancelToken;
use crate::error::TaskError;

pub type TaskResult = Result<Value, TaskError>;

pub type BoxTaskFuture = Pin<Box<dyn Future<Output = TaskResult> + Send>>;

// relay passed into the operation, forwards to the submitter's on_progress
pub type ProgressReporter = Arc<dyn Fn(Value) + Send + Sync>;

type TaskFn = Box<dyn FnOnce(ProgressReporter, CancelToken) -> BoxTaskFuture + Send>;
type ErrorFn = Box<dyn Fn(&TaskError) + Send + Sync>;
type ProgressFn = Box<dyn Fn(Value) + Send + Sync>;

pub struct PendingTask {
    pub id: Uuid,
    pub(crate) operation: TaskFn,
    pub(crate) on_error: Option<ErrorFn>,
    pub(crate) on_progress: Option<ProgressFn>,
    pub(crate) responder: oneshot::Sender<TaskResult>,
}

impl PendingTask {
    pub fn new<F, Fut>(operation: F) -> (Self, CompletionHandle)
    where
        F: FnOnce(ProgressReporter, CancelToken) -> Fut + Send + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        let task = Self {
            id: Uuid::new_v4(),
            operation: Box::new(move |progress, token| {
                let fut: BoxTaskFuture = Box::pin(operation(progress, token));
                fut
            }),
            on_error: None,
            on_progress: None,
            responder: tx,
        };

        (task, CompletionHandle { rx })
    }

    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TaskError) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(callback));
        self
    }

    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(Value) + Send + Sync + 'static,
    {
        self.on_progress = Some(Box::new(callback));
        self
    }
}

// receiving side of a single task's terminal outcome
pub struct CompletionHandle {
    rx: oneshot::Receiver<TaskResult>,
}

impl CompletionHandle {
    // a task thrown away by cancel_all never runs, its sender is simply dropped
    pub async fn wait(self) -> TaskResult {
        match self.rx.await {
            Ok(result) => result,
            Err(_) => Err(TaskError::Cancelled(
                "task discarded before it started".to_string(),
            )),
        }
    }
}
