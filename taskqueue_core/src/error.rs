use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("task canceled: {0}")]
    Cancelled(String),

    #[error("task failed: {0}")]
    Failed(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TaskError {
    pub fn failed(message: impl Into<String>) -> Self {
        TaskError::Failed(message.into().into())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Cancelled(_))
    }
}
