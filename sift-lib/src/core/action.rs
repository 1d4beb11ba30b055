/*!

An action is a named styling directive with one to three typed arguments: font size, text and
border colours, alert sounds, minimap icons. A native rule carries at most one action per name;
two actions with the same name are duplicates regardless of their arguments.

The boolean action named `Hidden` is reserved: it selects the `Hide` header when a rule is
rendered and is never emitted as an action line itself.

*/

use std::fmt::Write;

use sift_abs::IString;

use crate::{
  core::{
    format::{FormatStyle, Formattable, INDENT},
    limits,
    tags::RuleTags,
    value::Color,
  },
  domain_error,
  error::CompileResult,
  impl_display_debug_for_formattable,
};

/// The reserved action controlling the `Show`/`Hide` header.
pub const HIDDEN: &str = "Hidden";

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ActionValue {
  Number(i32),
  Color(Color),
  Boolean(bool),
  File(IString),
  Sound { id: IString, volume: i32 },
  MapIcon { size: i32, color: IString, shape: IString },
  Effect { color: IString, beam: IString },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Action {
  pub name : IString,
  pub value: ActionValue,
  tags     : RuleTags,
}

impl Action {
  pub fn new(name: IString, value: ActionValue, tags: RuleTags) -> Action {
    Action { name, value, tags }
  }

  /// A numeric action. The argument is range-checked against the limit table when the action
  /// name has an entry there.
  pub fn number<N: Into<IString>>(name: N, value: i32) -> CompileResult<Action> {
    let name = name.into();
    check_range(&name, value)?;
    Ok(Action::new(name, ActionValue::Number(value), RuleTags::empty()))
  }

  pub fn color<N: Into<IString>>(name: N, color: Color) -> Action {
    Action::new(name.into(), ActionValue::Color(color), RuleTags::empty())
  }

  pub fn boolean<N: Into<IString>>(name: N, value: bool) -> Action {
    Action::new(name.into(), ActionValue::Boolean(value), RuleTags::empty())
  }

  pub fn file<N: Into<IString>, F: Into<IString>>(name: N, path: F) -> Action {
    Action::new(name.into(), ActionValue::File(path.into()), RuleTags::empty())
  }

  pub fn sound<N: Into<IString>, S: Into<IString>>(name: N, id: S, volume: i32) -> CompileResult<Action> {
    if let Some((low, high)) = limits::range("Volume") {
      if volume < low || volume > high {
        return Err(domain_error!("volume {} out of range {}..{}", volume, low, high));
      }
    }
    Ok(Action::new(name.into(), ActionValue::Sound { id: id.into(), volume }, RuleTags::empty()))
  }

  pub fn map_icon<N, C, S>(name: N, size: i32, color: C, shape: S) -> CompileResult<Action>
    where N: Into<IString>, C: Into<IString>, S: Into<IString>
  {
    if let Some((low, high)) = limits::range("MinimapIcon") {
      if size < low || size > high {
        return Err(domain_error!("minimap icon size {} out of range {}..{}", size, low, high));
      }
    }
    Ok(Action::new(
      name.into(),
      ActionValue::MapIcon { size, color: color.into(), shape: shape.into() },
      RuleTags::empty(),
    ))
  }

  pub fn effect<N, C, B>(name: N, color: C, beam: B) -> Action
    where N: Into<IString>, C: Into<IString>, B: Into<IString>
  {
    Action::new(name.into(), ActionValue::Effect { color: color.into(), beam: beam.into() }, RuleTags::empty())
  }

  /// Tags are fixed at construction; this consumes the freshly built atom.
  pub fn with_tags(mut self, tags: RuleTags) -> Action {
    self.tags = tags;
    self
  }

  pub fn tags(&self) -> RuleTags {
    self.tags
  }
}

fn check_range(name: &IString, value: i32) -> CompileResult<()> {
  if let Some((low, high)) = limits::range(name) {
    if value < low || value > high {
      return Err(domain_error!("{} argument {} out of range {}..{}", name, value, low, high));
    }
  }
  Ok(())
}

impl Formattable for Action {
  fn repr(&self, out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
    if style == FormatStyle::Native {
      // Boolean actions print their name when true and nothing when false; `Hidden` is consumed
      // by the rule header and never printed.
      if let ActionValue::Boolean(value) = &self.value {
        if &*self.name == HIDDEN || !*value {
          return Ok(());
        }
        return writeln!(out, "{}{}", INDENT, self.name);
      }
      write!(out, "{}{}", INDENT, self.name)?;
    } else {
      write!(out, "{}", self.name)?;
    }

    match &self.value {
      ActionValue::Number(value) => writeln!(out, " {}", value),
      ActionValue::Color(color) => {
        out.write_char(' ')?;
        color.repr(out, style)?;
        out.write_char('\n')
      }
      ActionValue::Boolean(value) => writeln!(out, " {}", value),
      ActionValue::File(path) => writeln!(out, " {}", path),
      ActionValue::Sound { id, volume } => writeln!(out, " {} {}", id, volume),
      ActionValue::MapIcon { size, color, shape } => writeln!(out, " {} {} {}", size, color, shape),
      ActionValue::Effect { color, beam } => writeln!(out, " {} {}", color, beam),
    }
  }
}

impl_display_debug_for_formattable!(Action);
