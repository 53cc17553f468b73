use crate::TimeoutReason;

/// Lifecycle of one arm/fire cycle.
///
/// `Idle -> Pending -> Fired -> Idle`. A timer leaves `Fired` only when its
/// background unit has been reclaimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimerState {
  #[default]
  Idle,
  Pending,
  Fired,
}

#[derive(Debug, Default)]
pub(crate) struct WaitState {
  pub(crate) state: TimerState,
  pub(crate) cancel_requested: bool,
  pub(crate) last_reason: Option<TimeoutReason>,
}

impl WaitState {
  pub(crate) fn begin_cycle(&mut self) {
    self.state = TimerState::Pending;
    self.cancel_requested = false;
  }

  /// Records a cancel request. Returns `false` when the wait already finished,
  /// in which case there is nobody left to wake.
  pub(crate) fn request_cancel(&mut self) -> bool {
    if self.state == TimerState::Pending {
      self.cancel_requested = true;
      true
    } else {
      false
    }
  }

  pub(crate) fn fire(&mut self, reason: TimeoutReason) {
    self.state = TimerState::Fired;
    self.last_reason = Some(reason);
  }

  pub(crate) fn end_cycle(&mut self) {
    self.state = TimerState::Idle;
    self.cancel_requested = false;
  }
}
