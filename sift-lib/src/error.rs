/*!

Failures fall into two categories.

An [`Internal`](CompileError::Internal) error signals a programming defect: an algebra request
outside its defined domain, serialising a rule known to match nothing, a block kind where the
grammar forbids one. It carries the file and line of the *detection site*, captured by the
[`internal_error!`](crate::internal_error) macro, and aborts the current compilation without
taking down the hosting process.

A [`Domain`](CompileError::Domain) error is a limit violation in user-supplied data: a malformed
hex colour, an unknown socket colour, a numeric action argument outside the attribute's range.
These are detected at atom construction and propagate up through `Result`.

Rules that match nothing and intersections that come out empty are *not* errors. They are
ordinary, frequent values of the algebra and are silently elided from the output.

*/

use std::fmt::{Display, Formatter};

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompileError {
  /// A programming defect detected at `file`:`line`.
  Internal {
    what: String,
    file: &'static str,
    line: u32,
  },

  /// An invalid literal or out-of-range argument in user-supplied data.
  Domain {
    what: String,
  },
}

impl Display for CompileError {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      CompileError::Internal { what, file, line } => {
        write!(f, "internal error: {} ({}:{})", what, file, line)
      }
      CompileError::Domain { what } => {
        write!(f, "domain error: {}", what)
      }
    }
  }
}

impl std::error::Error for CompileError {}

/// Constructs a [`CompileError::Internal`], capturing the detection site.
#[macro_export]
macro_rules! internal_error {
  ($($arg:tt)*) => {
    $crate::error::CompileError::Internal {
      what: format!($($arg)*),
      file: file!(),
      line: line!(),
    }
  };
}

/// Constructs a [`CompileError::Domain`].
#[macro_export]
macro_rules! domain_error {
  ($($arg:tt)*) => {
    $crate::error::CompileError::Domain {
      what: format!($($arg)*),
    }
  };
}
