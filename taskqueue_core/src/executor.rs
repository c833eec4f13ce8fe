use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::cancel::{CancelSource, CancelToken};
use crate::error::TaskError;
use crate::task::{PendingTask, ProgressReporter};

// the fixed reason handed to the active token on cancel_all
pub const CANCEL_REASON: &str = "all tasks have been canceled";

struct ExecState {
    pending: VecDeque<PendingTask>,
    busy: bool,
    active: Option<CancelSource>,
}

#[derive(Clone)]
pub struct SerialExecutor {
    state: Arc<Mutex<ExecState>>,
}

impl SerialExecutor {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ExecState {
                pending: VecDeque::new(),
                busy: false,
                active: None,
            })),
        }
    }

    pub fn submit(&self, task: PendingTask) {
        {
            let mut state = self.state.lock().unwrap();
            tracing::debug!(task = %task.id, "task admitted");
            state.pending.push_back(task);
        }
        self.advance();
    }

    // signals the running task and drops everything that has not started yet
    pub fn cancel_all(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(source) = &state.active {
            source.abort(CANCEL_REASON);
        }
        state.pending.clear();
    }

    // single idempotent step - picks up the next task only when nothing is in flight
    fn advance(&self) {
        let (task, token) = {
            let mut state = self.state.lock().unwrap();
            if state.busy || state.pending.is_empty() {
                return;
            }
            let task = match state.pending.pop_front() {
                Some(task) => task,
                None => return,
            };
            state.busy = true;
            let source = CancelSource::new();
            let token = source.token();
            state.active = Some(source);
            (task, token)
        };

        let executor = self.clone();
        tokio::spawn(async move {
            drive(task, token).await;
            {
                let mut state = executor.state.lock().unwrap();
                state.active = None;
                state.busy = false;
            }
            executor.advance();
        });
    }
}

async fn drive(task: PendingTask, token: CancelToken) {
    let PendingTask {
        id,
        operation,
        on_error,
        on_progress,
        responder,
    } = task;

    tracing::debug!(task = %id, "task started");

    let relay: ProgressReporter = Arc::new(move |progress| {
        if let Some(callback) = &on_progress {
            callback(progress);
        }
    });

    let result = operation(relay, token).await;

    match &result {
        Ok(_) => tracing::debug!(task = %id, "task completed"),
        Err(TaskError::Cancelled(reason)) => {
            tracing::info!(task = %id, "task canceled: {}", reason);
        }
        Err(error) => {
            if let Some(callback) = &on_error {
                callback(error);
            } else {
                tracing::error!(task = %id, "unhandled error in task: {}", error);
            }
        }
    }

    // the submitter may have dropped its handle, nothing to deliver then
    let _ = responder.send(result);
}
