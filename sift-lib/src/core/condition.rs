/*!

A condition is an atomic predicate on one item attribute: an inclusive integer interval, a
boolean, a disjunctive list of name fragments, or a socket multiset. A native rule matches an
item when *all* of its conditions do.

The old class hierarchy of condition types becomes a tagged variant here; operations dispatch on
the discriminant and the downcasts disappear.

*/

use std::fmt::Write;

use sift_abs::IString;

use crate::{
  core::{
    format::{FormatStyle, Formattable, INDENT},
    limits,
    tags::RuleTags,
    value::{Rarity, SocketGroup},
  },
  impl_display_debug_for_formattable,
};

/// The shape of a condition, used for dispatch and diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ConditionKind {
  Interval,
  Boolean,
  NameList,
  SocketGroup,
}

impl ConditionKind {
  pub fn name_str(self) -> &'static str {
    match self {
      ConditionKind::Interval    => "Interval",
      ConditionKind::Boolean     => "Boolean",
      ConditionKind::NameList    => "NameList",
      ConditionKind::SocketGroup => "SocketGroup",
    }
  }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ConditionValue {
  /// Inclusive `[from, to]`; an inverted interval matches nothing.
  Interval { from: i32, to: i32 },
  Boolean(bool),
  /// Matches an item whose attribute string contains *some* listed fragment as a substring.
  NameList(Vec<IString>),
  /// Matches an item with at least this many linked sockets of each colour.
  SocketGroup(SocketGroup),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Condition {
  pub name : IString,
  pub value: ConditionValue,
  tags     : RuleTags,
}

impl Condition {
  pub fn new(name: IString, value: ConditionValue, tags: RuleTags) -> Condition {
    Condition { name, value, tags }
  }

  pub fn interval<N: Into<IString>>(name: N, from: i32, to: i32) -> Condition {
    Condition::new(name.into(), ConditionValue::Interval { from, to }, RuleTags::empty())
  }

  /// A one-sided interval `[from, ∞)`.
  pub fn at_least<N: Into<IString>>(name: N, from: i32) -> Condition {
    Condition::interval(name, from, i32::MAX)
  }

  /// A one-sided interval `(-∞, to]`.
  pub fn at_most<N: Into<IString>>(name: N, to: i32) -> Condition {
    Condition::interval(name, i32::MIN, to)
  }

  pub fn boolean<N: Into<IString>>(name: N, value: bool) -> Condition {
    Condition::new(name.into(), ConditionValue::Boolean(value), RuleTags::empty())
  }

  pub fn name_list<N: Into<IString>, S: Into<IString>>(name: N, names: Vec<S>) -> Condition {
    let names = names.into_iter().map(|n| n.into()).collect();
    Condition::new(name.into(), ConditionValue::NameList(names), RuleTags::empty())
  }

  pub fn socket_group<N: Into<IString>>(name: N, group: SocketGroup) -> Condition {
    Condition::new(name.into(), ConditionValue::SocketGroup(group), RuleTags::empty())
  }

  /// Tags are fixed at construction; this consumes the freshly built atom.
  pub fn with_tags(mut self, tags: RuleTags) -> Condition {
    self.tags = tags;
    self
  }

  pub fn tags(&self) -> RuleTags {
    self.tags
  }

  pub fn kind(&self) -> ConditionKind {
    match self.value {
      ConditionValue::Interval { .. }   => ConditionKind::Interval,
      ConditionValue::Boolean(_)        => ConditionKind::Boolean,
      ConditionValue::NameList(_)       => ConditionKind::NameList,
      ConditionValue::SocketGroup(_)    => ConditionKind::SocketGroup,
    }
  }

  /// The shape-specific viability check: true when no item can satisfy this condition alone.
  /// (A name list we cannot decide is treated as satisfiable.)
  pub fn matches_nothing(&self) -> bool {
    match &self.value {
      ConditionValue::Interval { from, to } => from > to,
      ConditionValue::Boolean(_)            => false,
      ConditionValue::NameList(names)       => names.is_empty(),
      ConditionValue::SocketGroup(group)    => group.total() > limits::socket_cap(),
    }
  }
}

/// Writes the native comparison lines for an interval condition. `Rarity` values render their
/// enumerated names; printed values are clamped onto the rarity scale so the enum lookup stays
/// in range.
fn repr_native_interval(out: &mut dyn Write, name: &str, from: i32, to: i32) -> std::fmt::Result {
  let rarity = name == "Rarity";
  let bound = |out: &mut dyn Write, value: i32| -> std::fmt::Result {
    if rarity {
      match Rarity::try_from(value.clamp(Rarity::Normal as i32, Rarity::Unique as i32)) {
        Ok(r) => write!(out, "{}", r),
        Err(_) => Err(std::fmt::Error),
      }
    } else {
      write!(out, "{}", value)
    }
  };

  if from == i32::MIN && to == i32::MAX {
    // Matches every value; the condition carries no information in native syntax.
    return Ok(());
  }
  if from == i32::MIN {
    write!(out, "{}{} <= ", INDENT, name)?;
    bound(out, to)?;
    return out.write_char('\n');
  }
  if to == i32::MAX {
    write!(out, "{}{} >= ", INDENT, name)?;
    bound(out, from)?;
    return out.write_char('\n');
  }
  if from == to {
    write!(out, "{}{} = ", INDENT, name)?;
    bound(out, from)?;
    return out.write_char('\n');
  }
  write!(out, "{}{} >= ", INDENT, name)?;
  bound(out, from)?;
  out.write_char('\n')?;
  write!(out, "{}{} <= ", INDENT, name)?;
  bound(out, to)?;
  out.write_char('\n')
}

impl Formattable for Condition {
  fn repr(&self, out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
    match style {
      FormatStyle::Native => {
        match &self.value {
          ConditionValue::Interval { from, to } => {
            repr_native_interval(out, &self.name, *from, *to)
          }
          ConditionValue::Boolean(value) => {
            writeln!(out, "{}{} {}", INDENT, self.name, if *value { "true" } else { "false" })
          }
          ConditionValue::NameList(names) => {
            write!(out, "{}{}", INDENT, self.name)?;
            for name in names {
              write!(out, " \"{}\"", name)?;
            }
            out.write_char('\n')
          }
          ConditionValue::SocketGroup(group) => {
            write!(out, "{}{} ", INDENT, self.name)?;
            group.repr(out, style)?;
            out.write_char('\n')
          }
        }
      }
      FormatStyle::Source | FormatStyle::Debug => {
        write!(out, "{}", self.name)?;
        if style == FormatStyle::Debug {
          write!(out, "<{}>", self.kind().name_str())?;
        }
        match &self.value {
          ConditionValue::Interval { from, to } => write!(out, " {}..{}", from, to),
          ConditionValue::Boolean(value)        => write!(out, " {}", value),
          ConditionValue::SocketGroup(group)    => {
            out.write_char(' ')?;
            group.repr(out, style)
          }
          ConditionValue::NameList(names) => {
            for name in names {
              write!(out, " \"{}\"", name)?;
            }
            Ok(())
          }
        }
      }
    }
  }
}

impl_display_debug_for_formattable!(Condition);
