use std::sync::Arc;
use std::time::Duration;

use dotenv::dotenv;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use taskqueue_core::error::TaskError;
use taskqueue_core::queue::{BusQueue, DirectQueue, TaskQueue};
use taskqueue_core::task::PendingTask;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // pick the submission surface
    let surface = std::env::var("QUEUE_SURFACE");
    let queue = match surface.unwrap_or_else(|_| "direct".to_string()).as_str() {
        "direct" => Arc::new(DirectQueue::new()) as Arc<dyn TaskQueue>,
        "bus" => Arc::new(BusQueue::new()) as Arc<dyn TaskQueue>,
        _ => panic!("Unknown queue surface"),
    };

    tracing::info!("serial task queue running");

    // a few quick tasks - executed one at a time, in submission order
    let mut handles = Vec::new();
    for step in 1..=3_i64 {
        let (task, handle) = PendingTask::new(move |progress, _token| async move {
            progress(json!({ "step": step, "percent": 50 }));
            tokio::time::sleep(Duration::from_millis(100)).await;
            progress(json!({ "step": step, "percent": 100 }));
            Ok(json!(step))
        });
        let task = task.on_progress(|update| {
            tracing::info!("progress update: {}", update);
        });
        queue.enqueue(task).await;
        handles.push(handle);
    }

    for handle in handles {
        match handle.wait().await {
            Ok(value) => tracing::info!("task finished with {}", value),
            Err(error) => tracing::warn!("task did not finish: {}", error),
        }
    }

    // a slow task that cooperates with cancellation
    let (slow, slow_handle) = PendingTask::new(|_progress, token| async move {
        let mut watcher = token.clone();
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(30)) => Ok(json!("done")),
            _ = watcher.aborted() => Err(token.cancellation()),
        }
    });
    queue.enqueue(slow).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    queue.cancel_all().await;

    match slow_handle.wait().await {
        Err(TaskError::Cancelled(reason)) => tracing::info!("slow task stopped: {}", reason),
        Err(error) => tracing::warn!("slow task failed instead: {}", error),
        Ok(value) => tracing::warn!("slow task finished before the cancel: {}", value),
    }
}
