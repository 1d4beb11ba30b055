/*!

A thin verbosity-gated façade over [`tracing`]. Call sites use the macros
`critical!`, `error!`, `warning!`, `info!`, `debug!`, and `trace!`, each of which takes a
verbosity level as its first argument. The message is forwarded to `tracing` only when the level
is at or below the global threshold, so chatty diagnostics can be compiled in unconditionally and
tuned at runtime.

Levels are conventional, not enforced: 0 for messages that should always appear, 1 for standard
diagnostics, and higher values for increasingly verbose output.

*/

use std::sync::atomic::{AtomicI32, Ordering};

static GLOBAL_LOGGING_THRESHOLD: AtomicI32 = AtomicI32::new(1);

/// Sets the verbosity level above which log messages are suppressed.
pub fn set_global_logging_threshold(threshold: i32) {
  GLOBAL_LOGGING_THRESHOLD.store(threshold, Ordering::Relaxed);
}

pub fn get_global_logging_threshold() -> i32 {
  GLOBAL_LOGGING_THRESHOLD.load(Ordering::Relaxed)
}

/// Installs a `tracing-subscriber` formatter as the global default. Safe to call more than once;
/// later calls are no-ops.
pub fn initialize_logging() {
  let _ = tracing_subscriber::fmt()
      .with_target(false)
      .with_max_level(tracing::level_filters::LevelFilter::TRACE)
      .try_init();
}

#[macro_export]
macro_rules! critical {
  ($level:expr, $($arg:tt)*) => {
    if $level <= $crate::log::get_global_logging_threshold() {
      $crate::tracing::error!(critical = true, $($arg)*);
    }
  };
}

#[macro_export]
macro_rules! error {
  ($level:expr, $($arg:tt)*) => {
    if $level <= $crate::log::get_global_logging_threshold() {
      $crate::tracing::error!($($arg)*);
    }
  };
}

#[macro_export]
macro_rules! warning {
  ($level:expr, $($arg:tt)*) => {
    if $level <= $crate::log::get_global_logging_threshold() {
      $crate::tracing::warn!($($arg)*);
    }
  };
}

#[macro_export]
macro_rules! info {
  ($level:expr, $($arg:tt)*) => {
    if $level <= $crate::log::get_global_logging_threshold() {
      $crate::tracing::info!($($arg)*);
    }
  };
}

#[macro_export]
macro_rules! debug {
  ($level:expr, $($arg:tt)*) => {
    if $level <= $crate::log::get_global_logging_threshold() {
      $crate::tracing::debug!($($arg)*);
    }
  };
}

#[macro_export]
macro_rules! trace {
  ($level:expr, $($arg:tt)*) => {
    if $level <= $crate::log::get_global_logging_threshold() {
      $crate::tracing::trace!($($arg)*);
    }
  };
}
