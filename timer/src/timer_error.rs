use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimerError {
  #[error("timer: already armed")]
  AlreadyArmed,
  #[error("timer: no active timer")]
  NotArmed,
  #[error("timer: failed to spawn waiter thread: {0}")]
  Spawn(#[from] io::Error),
  #[error("timer: callback panicked")]
  CallbackPanicked,
  #[error("timer: waiter task was cancelled before it finished")]
  WaiterCancelled,
  #[error("timer: no tokio runtime to spawn the waiter task on")]
  NoRuntime,
}

static_assertions::assert_impl_all!(TimerError: Send, Sync);
