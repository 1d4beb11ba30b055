/*!

Serialisation of a compiled filter into the text the game engine reads. One `Show`/`Hide` header
per rule, one indented line per condition and per action, a blank line between rules. The
interesting decisions (comparison forms for intervals, rarity names, the reserved `Hidden`
action) live with the atoms' `Formattable` implementations; this module only sequences them and
refuses to serialise what must not be serialised.

*/

use crate::{
  core::{
    format::{FormatStyle, Formattable},
    native_rule::{FilterNative, NativeRule},
  },
  error::CompileResult,
  internal_error,
};

/// Renders one rule in native syntax. Asking for a rule that matches nothing is a programming
/// defect upstream; such rules must be elided, not serialised.
pub fn render_rule(rule: &NativeRule) -> CompileResult<String> {
  if rule.is_useless() {
    return Err(internal_error!("writing a useless rule to a native filter"));
  }
  let mut out = String::new();
  rule.repr(&mut out, FormatStyle::Native)
      .map_err(|_| internal_error!("formatting a native rule failed"))?;
  Ok(out)
}

/// Renders a whole filter, blank-line separated, in output order.
pub fn render_filter(filter: &FilterNative) -> CompileResult<String> {
  let mut out = String::new();
  for (index, rule) in filter.iter().enumerate() {
    if index > 0 {
      out.push('\n');
    }
    out.push_str(&render_rule(rule)?);
  }
  Ok(out)
}
