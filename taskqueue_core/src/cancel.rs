use tokio::sync::watch;

use crate::error::TaskError;

// trigger half, held by the executor for the task currently in flight
pub struct CancelSource {
    tx: watch::Sender<Option<String>>,
}

// observe half, handed to the running task
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<Option<String>>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    // idempotent - only the first call stores a reason
    pub fn abort(&self, reason: &str) {
        self.tx.send_if_modified(|state| {
            if state.is_some() {
                return false;
            }
            *state = Some(reason.to_string());
            true
        });
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn is_aborted(&self) -> bool {
        self.rx.borrow().is_some()
    }

    pub fn reason(&self) -> Option<String> {
        self.rx.borrow().clone()
    }

    pub async fn aborted(&mut self) {
        while self.rx.borrow().is_none() {
            if self.rx.changed().await.is_err() {
                break;
            }
        }
    }

    // the outcome a task should settle with once it has seen the abort
    pub fn cancellation(&self) -> TaskError {
        TaskError::Cancelled(self.reason().unwrap_or_else(|| "canceled".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn abort_records_the_reason() {
        let source = CancelSource::new();
        let token = source.token();

        assert!(!token.is_aborted(), "fresh token should not be aborted");
        assert!(token.reason().is_none(), "fresh token should carry no reason");

        source.abort("stop now");

        assert!(token.is_aborted(), "token should observe the abort");
        assert_eq!(token.reason().as_deref(), Some("stop now"), "reason should match the trigger");
    }

    #[tokio::test]
    async fn abort_is_idempotent() {
        let source = CancelSource::new();
        let token = source.token();

        source.abort("first");
        source.abort("second");

        assert_eq!(token.reason().as_deref(), Some("first"), "only the first abort should stick");
    }

    #[tokio::test]
    async fn aborted_resolves_once_triggered() {
        let source = CancelSource::new();
        let mut token = source.token();

        let waiter = tokio::spawn(async move {
            token.aborted().await;
            token.reason()
        });

        source.abort("done waiting");

        let reason = waiter.await.expect("waiter should join");
        assert_eq!(reason.as_deref(), Some("done waiting"), "await side should see the reason");
    }
}
