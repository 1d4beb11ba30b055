/*!

A native rule is flat: a conjunction of conditions keyed by attribute name, at most one action
per action name, a tag set, and a `useless` flag. The flag is raised whenever a simplification
discovers the rule can match no item, and is never lowered again.

Most attributes hold at most one condition, because adding a second one of the same shape
tightens the stored condition in place. Name lists and socket groups are the exception: two
incomparable conditions on the same attribute are a genuine conjunction and are stored side by
side, with any subset-related pair collapsed to the stricter member.

Once `useless` is set, the condition map is not kept sensible; consumers must not serialise or
semantically inspect a useless rule.

*/

use std::collections::hash_map::Entry;
use std::fmt::Write;

use sift_abs::{smallvec, HashMap, IString, SmallVec};

use crate::{
  core::{
    action::{Action, ActionValue, HIDDEN},
    algebra::condition::condition_subset,
    condition::{Condition, ConditionValue},
    format::{FormatStyle, Formattable},
    limits,
    tags::{RuleTag, RuleTags},
  },
  error::CompileResult,
  impl_display_debug_for_formattable,
  internal_error,
};

pub type ConditionMap = HashMap<IString, SmallVec<[Condition; 1]>>;
pub type ActionMap    = HashMap<IString, Action>;

/// An ordered list of native rules; the unit the compiler produces and the serializer consumes.
pub type FilterNative = Vec<NativeRule>;

#[derive(Clone, PartialEq, Eq)]
pub struct NativeRule {
  pub tags  : RuleTags,
  conditions: ConditionMap,
  actions   : ActionMap,
  useless   : bool,
}

impl NativeRule {
  pub fn new(tags: RuleTags) -> NativeRule {
    NativeRule {
      tags,
      conditions: ConditionMap::default(),
      actions   : ActionMap::default(),
      useless   : false,
    }
  }

  /// True when the rule's predicate has been found empty. Monotone: once raised it stays.
  pub fn is_useless(&self) -> bool {
    self.useless
  }

  pub fn mark_useless(&mut self) {
    self.useless = true;
  }

  pub fn conditions(&self) -> &ConditionMap {
    &self.conditions
  }

  pub fn condition_list(&self, name: &IString) -> Option<&SmallVec<[Condition; 1]>> {
    self.conditions.get(name)
  }

  pub fn actions(&self) -> &ActionMap {
    &self.actions
  }

  pub fn action(&self, name: &IString) -> Option<&Action> {
    self.actions.get(name)
  }

  pub fn has_actions(&self) -> bool {
    !self.actions.is_empty()
  }

  /// True when the reserved `Hidden` action is present and set.
  pub fn is_hidden(&self) -> bool {
    matches!(
      self.actions.get(&IString::from(HIDDEN)).map(|action| &action.value),
      Some(ActionValue::Boolean(true))
    )
  }

  /// Merges a clone of `condition` into the rule, preserving the map invariants. Intervals and
  /// booleans tighten the stored condition in place; name lists and socket groups are collapsed
  /// against the stored list so that no two conditions on one attribute remain in a subset
  /// relation. Raises `useless` whenever the conjunction becomes unsatisfiable.
  pub fn add_condition(&mut self, condition: &Condition) -> CompileResult<()> {
    if condition.matches_nothing() {
      self.useless = true;
    }

    let list = match self.conditions.entry(condition.name.clone()) {
      Entry::Vacant(entry) => {
        entry.insert(smallvec![condition.clone()]);
        return Ok(());
      }
      Entry::Occupied(entry) => entry.into_mut(),
    };

    // A stored Final condition wins over anything added later.
    if list.iter().any(|existing| existing.tags().contains(RuleTag::Final)) {
      return Ok(());
    }

    // Override replaces the stored condition instead of intersecting with it. Other conditions
    // on the attribute, if any, are left alone; this path is used for singleton shapes.
    if condition.tags().contains(RuleTag::Override) {
      list[0] = condition.clone();
      return Ok(());
    }

    match &condition.value {
      ConditionValue::Interval { from, to } => {
        let ConditionValue::Interval { from: stored_from, to: stored_to } = &mut list[0].value
        else {
          return Err(internal_error!("conditions on {} have mismatched shapes", condition.name));
        };
        if *stored_from < *from {
          *stored_from = *from;
        }
        if *stored_to > *to {
          *stored_to = *to;
        }
        if *stored_from > *stored_to {
          self.useless = true;
        }
      }

      ConditionValue::Boolean(value) => {
        let ConditionValue::Boolean(stored) = &list[0].value else {
          return Err(internal_error!("conditions on {} have mismatched shapes", condition.name));
        };
        // Contradictory boolean demands leave nothing to match.
        if stored != value {
          self.useless = true;
        }
      }

      ConditionValue::SocketGroup(group) => {
        // The combined demand of all conditions on this attribute must fit on one item.
        let mut demand = *group;
        for existing in list.iter() {
          let ConditionValue::SocketGroup(stored) = &existing.value else {
            return Err(internal_error!("conditions on {} have mismatched shapes", condition.name));
          };
          demand = demand.component_max(stored);
        }
        if demand.total() > limits::socket_cap() {
          self.useless = true;
        }
        Self::collapse_into(list, condition)?;
      }

      ConditionValue::NameList(_) => {
        Self::collapse_into(list, condition)?;
      }
    }

    Ok(())
  }

  /// Inserts `condition` into `list` unless some stored condition is already stricter, removing
  /// any stored condition the new one is stricter than.
  fn collapse_into(list: &mut SmallVec<[Condition; 1]>, condition: &Condition) -> CompileResult<()> {
    let mut index = 0;
    while index < list.len() {
      // If some existing condition is a subset of the new one, the new one is redundant.
      if condition_subset(&list[index], condition)? {
        return Ok(());
      }
      // If the new condition is a subset of an existing one, the existing one is redundant.
      if condition_subset(condition, &list[index])? {
        list.remove(index);
      } else {
        index += 1;
      }
    }
    list.push(condition.clone());
    Ok(())
  }

  /// Replaces whatever the rule stores for the condition's attribute. Used by the rule algebra
  /// when a difference computes a sharper condition wholesale; `add_condition` would intersect
  /// instead of replacing.
  pub(crate) fn set_condition(&mut self, condition: Condition) {
    if condition.matches_nothing() {
      self.useless = true;
    }
    self.conditions.insert(condition.name.clone(), smallvec![condition]);
  }

  /// Adds a clone of `action` under the action-merge rules: a stored `Final` action is kept, an
  /// incoming `Override` replaces, and otherwise the earlier action wins so that outer scopes
  /// set the style unless inner scopes explicitly override.
  pub fn add_action(&mut self, action: &Action) {
    match self.actions.entry(action.name.clone()) {
      Entry::Occupied(mut entry) => {
        if entry.get().tags().contains(RuleTag::Final) {
          return;
        }
        if action.tags().contains(RuleTag::Override) {
          entry.insert(action.clone());
        }
      }
      Entry::Vacant(entry) => {
        entry.insert(action.clone());
      }
    }
  }

  /// The rule's conditions in rendering order: attribute names sorted, list order preserved
  /// within an attribute.
  pub fn sorted_conditions(&self) -> Vec<&Condition> {
    let mut entries: Vec<(&str, &SmallVec<[Condition; 1]>)> =
        self.conditions.iter().map(|(name, list)| (&**name, list)).collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().flat_map(|(_, list)| list.iter()).collect()
  }

  /// The rule's actions in rendering order.
  pub fn sorted_actions(&self) -> Vec<&Action> {
    let mut entries: Vec<(&str, &Action)> =
        self.actions.iter().map(|(name, action)| (&**name, action)).collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries.into_iter().map(|(_, action)| action).collect()
  }
}

impl Formattable for NativeRule {
  fn repr(&self, out: &mut dyn Write, style: FormatStyle) -> std::fmt::Result {
    match style {
      FormatStyle::Native => {
        // Callers check `is_useless` before asking for native output; see `render`.
        writeln!(out, "{}", if self.is_hidden() { "Hide" } else { "Show" })?;
        for condition in self.sorted_conditions() {
          condition.repr(out, style)?;
        }
        for action in self.sorted_actions() {
          action.repr(out, style)?;
        }
        Ok(())
      }
      FormatStyle::Source | FormatStyle::Debug => {
        out.write_str("Rule ")?;
        if self.useless {
          out.write_str("USELESS ")?;
        }
        if !self.tags.is_empty() {
          write!(out, "{:?} ", self.tags)?;
        }
        out.write_str("{")?;
        for condition in self.sorted_conditions() {
          out.write_char(' ')?;
          condition.repr(out, style)?;
          out.write_char(';')?;
        }
        for action in self.sorted_actions() {
          out.write_char(' ')?;
          action.repr(out, style)?;
          out.write_char(';')?;
        }
        out.write_str(" }")
      }
    }
  }
}

impl_display_debug_for_formattable!(NativeRule);
