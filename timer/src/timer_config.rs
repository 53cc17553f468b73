#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
  pub thread_name: String,
  pub stack_size: Option<usize>,
}

impl Default for TimerConfig {
  fn default() -> Self {
    TimerConfig {
      thread_name: "single-timeout".to_string(),
      stack_size: None,
    }
  }
}

impl TimerConfig {
  pub fn from(options: impl IntoIterator<Item = TimerConfigOption>) -> TimerConfig {
    let mut config = TimerConfig::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }
}

#[derive(Debug, Clone)]
pub enum TimerConfigOption {
  SetThreadName(String),
  SetStackSize(usize),
}

impl TimerConfigOption {
  pub fn apply(&self, config: &mut TimerConfig) {
    match self {
      TimerConfigOption::SetThreadName(name) => {
        config.thread_name = name.clone();
      }
      TimerConfigOption::SetStackSize(size) => {
        config.stack_size = Some(*size);
      }
    }
  }

  pub fn with_thread_name(name: impl Into<String>) -> TimerConfigOption {
    TimerConfigOption::SetThreadName(name.into())
  }

  pub fn with_stack_size(size: usize) -> TimerConfigOption {
    TimerConfigOption::SetStackSize(size)
  }
}
