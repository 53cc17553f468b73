//! Single-shot timeout with an exactly-once callback.
//!
//! A timer is armed with a duration and a callback. The callback runs once on a
//! background execution unit, either when the duration elapses
//! ([`TimeoutReason::Expired`]) or when the timer is cancelled first
//! ([`TimeoutReason::Cancelled`]). [`Timer`] waits on a dedicated thread,
//! [`AsyncTimer`] on a tokio task.

mod async_timer;
mod timeout_reason;
mod timer;
mod timer_config;
mod timer_error;
mod timer_state;

pub use self::{async_timer::*, timeout_reason::*, timer::*, timer_config::*, timer_error::*, timer_state::*};
