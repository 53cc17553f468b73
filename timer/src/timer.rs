use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::timer_state::WaitState;
use crate::{TimeoutReason, TimerConfig, TimerError, TimerState};


#[derive(Debug, Default)]
struct Inner {
  wait_state: Mutex<WaitState>,
  condvar: Condvar,
}

impl Inner {
  // The callback never runs under this lock, so poisoning cannot leave the
  // state half-updated.
  fn lock(&self) -> MutexGuard<'_, WaitState> {
    self.wait_state.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn run<F>(&self, duration: Duration, callback: F) -> TimeoutReason
  where
    F: FnOnce(TimeoutReason), {
    let reason = self.await_signal(duration);
    tracing::debug!("Timer fired: reason = {}", reason);
    callback(reason);
    reason
  }

  fn await_signal(&self, duration: Duration) -> TimeoutReason {
    let guard = self.lock();
    let (mut guard, result) = self
      .condvar
      .wait_timeout_while(guard, duration, |ws| !ws.cancel_requested)
      .unwrap_or_else(PoisonError::into_inner);
    let reason = if result.timed_out() {
      TimeoutReason::Expired
    } else {
      TimeoutReason::Cancelled
    };
    guard.fire(reason);
    reason
  }
}

/// Single-shot timeout backed by a dedicated waiter thread.
///
/// Each [`arm`](Timer::arm) starts one thread that waits on a condition
/// variable for up to the given duration and then invokes the callback once.
/// The thread is owned by the timer and is joined by [`cancel`](Timer::cancel),
/// [`wait`](Timer::wait), the next `arm` after the cycle fired, or drop.
///
/// ```rust
/// use std::time::Duration;
/// use single_timeout_rs::{TimeoutReason, Timer};
///
/// let mut timer = Timer::new();
/// timer.arm(Duration::from_secs(10), |reason| assert!(reason.is_cancelled())).unwrap();
/// assert_eq!(timer.cancel().unwrap(), TimeoutReason::Cancelled);
/// ```
#[derive(Debug)]
pub struct Timer {
  inner: Arc<Inner>,
  handle: Option<JoinHandle<TimeoutReason>>,
  config: TimerConfig,
}

impl Timer {
  pub fn new() -> Self {
    Self::with_config(TimerConfig::default())
  }

  pub fn with_config(config: TimerConfig) -> Self {
    Timer {
      inner: Arc::new(Inner::default()),
      handle: None,
      config,
    }
  }

  pub fn config(&self) -> &TimerConfig {
    &self.config
  }

  /// Starts a new cycle and returns without waiting for it.
  ///
  /// Fails with [`TimerError::AlreadyArmed`] while the previous cycle is still
  /// pending. A previous cycle that already fired is reclaimed first.
  pub fn arm<F>(&mut self, duration: Duration, callback: F) -> Result<(), TimerError>
  where
    F: FnOnce(TimeoutReason) + Send + 'static, {
    match self.state() {
      TimerState::Pending => {
        tracing::warn!("Timer::arm: previous cycle is still pending");
        return Err(TimerError::AlreadyArmed);
      }
      TimerState::Fired => {
        if let Err(err) = self.reclaim() {
          tracing::debug!("Timer::arm: previous cycle ended with: {}", err);
        }
      }
      TimerState::Idle => {}
    }

    self.inner.lock().begin_cycle();

    let inner = Arc::clone(&self.inner);
    let mut builder = thread::Builder::new().name(self.config.thread_name.clone());
    if let Some(stack_size) = self.config.stack_size {
      builder = builder.stack_size(stack_size);
    }
    match builder.spawn(move || inner.run(duration, callback)) {
      Ok(handle) => {
        tracing::debug!("Timer armed: duration = {:?}", duration);
        self.handle = Some(handle);
        Ok(())
      }
      Err(err) => {
        tracing::error!("Timer::arm: failed to spawn waiter thread: {}", err);
        self.inner.lock().end_cycle();
        Err(TimerError::Spawn(err))
      }
    }
  }

  /// Wakes the pending wait and joins the waiter thread.
  ///
  /// Returns the reason the callback was given. That is `Expired` when the
  /// duration lapsed before the cancel signal was recorded.
  pub fn cancel(&mut self) -> Result<TimeoutReason, TimerError> {
    if self.handle.is_none() {
      tracing::warn!("Timer::cancel: no active timer");
      return Err(TimerError::NotArmed);
    }
    {
      let mut ws = self.inner.lock();
      if ws.request_cancel() {
        self.inner.condvar.notify_one();
      }
    }
    self.reclaim()
  }

  /// Blocks until the pending cycle fires on its own and joins the waiter thread.
  pub fn wait(&mut self) -> Result<TimeoutReason, TimerError> {
    if self.handle.is_none() {
      tracing::warn!("Timer::wait: no active timer");
      return Err(TimerError::NotArmed);
    }
    self.reclaim()
  }

  pub fn state(&self) -> TimerState {
    self.inner.lock().state
  }

  /// `true` while a waiter thread is owned, including a fired but unreclaimed one.
  pub fn is_armed(&self) -> bool {
    self.handle.is_some()
  }

  pub fn last_reason(&self) -> Option<TimeoutReason> {
    self.inner.lock().last_reason
  }

  fn reclaim(&mut self) -> Result<TimeoutReason, TimerError> {
    let handle = self.handle.take().ok_or(TimerError::NotArmed)?;
    let joined = handle.join();
    self.inner.lock().end_cycle();
    match joined {
      Ok(reason) => {
        tracing::debug!("Timer reclaimed: reason = {}", reason);
        Ok(reason)
      }
      Err(_) => {
        tracing::error!("Timer callback panicked");
        Err(TimerError::CallbackPanicked)
      }
    }
  }
}

impl Default for Timer {
  fn default() -> Self {
    Self::new()
  }
}

impl Drop for Timer {
  fn drop(&mut self) {
    if self.handle.is_some() {
      let _ = self.cancel();
    }
  }
}

static_assertions::assert_impl_all!(Timer: Send, Sync);
