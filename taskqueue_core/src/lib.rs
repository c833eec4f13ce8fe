// core of the serial queue - the task contract, the cancellation token, the executor state machine and the two submission surfaces
pub mod cancel;
pub mod error;
pub mod executor;
pub mod queue;
pub mod task;
