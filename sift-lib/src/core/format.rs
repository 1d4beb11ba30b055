/*!

There are different text representations possible for conditions, actions, and rules depending on
the context: the native syntax the game engine reads back, a Sift-flavoured form for diagnostics,
and a verbose debugging form. This module provides a unified API for formatting objects across
the project.

The trait that formattable types implement is `Formattable`. It works similar to the standard
library's `Display` trait, but takes the desired [`FormatStyle`] as an argument. Both `Display`
and `Debug` can be derived from a `Formattable` implementation with the convenience macro:

```rust
# use std::fmt::Write as _;
# use sift_lib::core::format::{Formattable, FormatStyle};
# use sift_lib::impl_display_debug_for_formattable;
struct MyStruct;
impl Formattable for MyStruct {
  fn repr(&self, f: &mut dyn std::fmt::Write, style: FormatStyle)
      -> std::fmt::Result
  {
    write!(f, "MyStruct<{:?}>", style)
  }
}
impl_display_debug_for_formattable!(MyStruct);
```

*/

/// One level of indentation in native filter syntax.
pub const INDENT: &str = "    ";

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum FormatStyle {
  /// A Sift-flavoured representation for diagnostics.
  #[default]
  Source,
  /// The flat filter syntax the game engine consumes.
  Native,
  /// Format with extra debugging information.
  Debug,
}

pub trait Formattable {
  /// Writes a text representation of `self` according to the given `FormatStyle`.
  /// Use `format!` and friends to create a string.
  fn repr(&self, out: &mut dyn std::fmt::Write, style: FormatStyle) -> std::fmt::Result;
}

#[macro_export]
macro_rules! impl_display_debug_for_formattable {
    ($t:ty) => {
        impl std::fmt::Display for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                <$t as $crate::core::format::Formattable>::repr(self, f, $crate::core::format::FormatStyle::Source)
            }
        }

        impl std::fmt::Debug for $t {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                <$t as $crate::core::format::Formattable>::repr(self, f, $crate::core::format::FormatStyle::Debug)
            }
        }
    };
}
pub use impl_display_debug_for_formattable;
