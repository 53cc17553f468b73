use std::fmt::{Display, Formatter};

/// Why a timer's callback was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutReason {
  /// The wait duration elapsed with no cancel signal observed.
  Expired,
  /// A cancel signal was observed before the duration elapsed.
  Cancelled,
}

impl TimeoutReason {
  /// `true` if the duration elapsed before any cancel signal.
  pub fn is_expired(self) -> bool {
    matches!(self, TimeoutReason::Expired)
  }

  /// `true` if a cancel signal won against the duration.
  pub fn is_cancelled(self) -> bool {
    matches!(self, TimeoutReason::Cancelled)
  }
}

impl Display for TimeoutReason {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      TimeoutReason::Expired => write!(f, "expired"),
      TimeoutReason::Cancelled => write!(f, "cancelled"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_predicates_and_display() {
    assert!(TimeoutReason::Expired.is_expired());
    assert!(!TimeoutReason::Expired.is_cancelled());
    assert!(TimeoutReason::Cancelled.is_cancelled());
    assert!(!TimeoutReason::Cancelled.is_expired());
    assert_eq!(TimeoutReason::Expired.to_string(), "expired");
    assert_eq!(TimeoutReason::Cancelled.to_string(), "cancelled");
  }
}
