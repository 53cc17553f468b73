use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::timer_state::WaitState;
use crate::{TimeoutReason, TimerError, TimerState};


#[derive(Debug)]
struct Cycle {
  signal: Arc<Notify>,
  handle: JoinHandle<TimeoutReason>,
}

/// Single-shot timeout backed by a tokio task.
///
/// Same cycle as [`Timer`](crate::Timer), but the wait is a race between a
/// per-cycle [`Notify`] and `tokio::time::sleep`, so it costs no OS thread.
/// `Notify::notify_one` keeps a permit, which means a cancel issued before the
/// task is first polled still wins.
#[derive(Debug, Default)]
pub struct AsyncTimer {
  wait_state: Arc<Mutex<WaitState>>,
  cycle: Option<Cycle>,
}

impl AsyncTimer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Spawns the waiter task on the current tokio runtime.
  ///
  /// Only awaits when a previous cycle fired but was not reclaimed yet. Fails
  /// with [`TimerError::NoRuntime`] when polled outside a tokio runtime.
  pub async fn arm<F>(&mut self, duration: Duration, callback: F) -> Result<(), TimerError>
  where
    F: FnOnce(TimeoutReason) + Send + 'static, {
    match self.state() {
      TimerState::Pending => {
        tracing::warn!("AsyncTimer::arm: previous cycle is still pending");
        return Err(TimerError::AlreadyArmed);
      }
      TimerState::Fired => {
        if let Err(err) = self.reclaim().await {
          tracing::debug!("AsyncTimer::arm: previous cycle ended with: {}", err);
        }
      }
      TimerState::Idle => {}
    }

    let runtime = tokio::runtime::Handle::try_current().map_err(|err| {
      tracing::warn!("AsyncTimer::arm: {}", err);
      TimerError::NoRuntime
    })?;
    lock(&self.wait_state).begin_cycle();

    let signal = Arc::new(Notify::new());
    let cloned_signal = signal.clone();
    let wait_state = self.wait_state.clone();
    let handle = runtime.spawn(async move {
      let reason = tokio::select! {
        biased;
        _ = cloned_signal.notified() => TimeoutReason::Cancelled,
        _ = tokio::time::sleep(duration) => TimeoutReason::Expired,
      };
      lock(&wait_state).fire(reason);
      tracing::debug!("AsyncTimer fired: reason = {}", reason);
      callback(reason);
      reason
    });
    tracing::debug!("AsyncTimer armed: duration = {:?}", duration);
    self.cycle = Some(Cycle { signal, handle });
    Ok(())
  }

  pub async fn cancel(&mut self) -> Result<TimeoutReason, TimerError> {
    let Some(cycle) = self.cycle.as_ref() else {
      tracing::warn!("AsyncTimer::cancel: no active timer");
      return Err(TimerError::NotArmed);
    };
    if lock(&self.wait_state).request_cancel() {
      cycle.signal.notify_one();
    }
    self.reclaim().await
  }

  pub async fn wait(&mut self) -> Result<TimeoutReason, TimerError> {
    if self.cycle.is_none() {
      tracing::warn!("AsyncTimer::wait: no active timer");
      return Err(TimerError::NotArmed);
    }
    self.reclaim().await
  }

  pub fn state(&self) -> TimerState {
    lock(&self.wait_state).state
  }

  pub fn is_armed(&self) -> bool {
    self.cycle.is_some()
  }

  pub fn last_reason(&self) -> Option<TimeoutReason> {
    lock(&self.wait_state).last_reason
  }

  // The cycle stays owned until the join completes, so a caller that drops
  // this future early can still cancel or wait afterwards.
  async fn reclaim(&mut self) -> Result<TimeoutReason, TimerError> {
    let cycle = self.cycle.as_mut().ok_or(TimerError::NotArmed)?;
    let joined = (&mut cycle.handle).await;
    self.cycle = None;
    lock(&self.wait_state).end_cycle();
    match joined {
      Ok(reason) => {
        tracing::debug!("AsyncTimer reclaimed: reason = {}", reason);
        Ok(reason)
      }
      Err(err) if err.is_panic() => {
        tracing::error!("AsyncTimer callback panicked: {}", err);
        Err(TimerError::CallbackPanicked)
      }
      Err(err) => {
        tracing::warn!("AsyncTimer waiter task was cancelled: {}", err);
        Err(TimerError::WaiterCancelled)
      }
    }
  }
}

impl Drop for AsyncTimer {
  // A task cannot be joined from a synchronous drop; it is signalled and left
  // to finish on the runtime. The callback runs at most once, and not at all
  // if the runtime shuts down before the task is polled again.
  fn drop(&mut self) {
    if let Some(cycle) = self.cycle.take() {
      if lock(&self.wait_state).request_cancel() {
        cycle.signal.notify_one();
      }
      tracing::debug!("AsyncTimer dropped with an active cycle");
    }
  }
}

fn lock(wait_state: &Mutex<WaitState>) -> MutexGuard<'_, WaitState> {
  wait_state.lock().unwrap_or_else(PoisonError::into_inner)
}

static_assertions::assert_impl_all!(AsyncTimer: Send, Sync);
