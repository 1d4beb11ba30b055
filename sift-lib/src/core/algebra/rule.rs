/*!

Set operations lifted from conditions to whole rules. A rule denotes the intersection of its
conditions' item sets; the operations here decide containment between rules, build the rule
matching exactly the overlap of two rules, and overapproximate the rule matching one rule minus
another.

`Class` and `BaseType` are handled out of band during intersection. Their name lists cannot be
intersected by accumulation inside one rule (`add_condition` would keep both lists as a
conjunction and the result would rarely simplify), so matching lists are intersected pairwise
with `condition_intersection` and only the refined lists are stored.

*/

use sift_abs::IString;

use crate::{
  core::{
    algebra::condition::{
      condition_difference,
      condition_intersection,
      condition_subset,
      ConditionDifference,
    },
    condition::Condition,
    native_rule::NativeRule,
    tags::RuleTag,
  },
  error::CompileResult,
};

/// Attributes whose name lists are intersected pairwise instead of accumulated.
const SPECIAL_NAME_LISTS: [&str; 2] = ["Class", "BaseType"];

fn is_special(name: &str) -> bool {
  SPECIAL_NAME_LISTS.contains(&name)
}

/// Is every item matched by `first` also matched by `second`? For every attribute constrained by
/// `second`, `first` must constrain it too, and each of `second`'s conditions must have some
/// condition of `first` inside it. (The "some" keeps the relation reflexive when an attribute
/// holds several incomparable conditions.)
pub fn rule_subset(first: &NativeRule, second: &NativeRule) -> CompileResult<bool> {
  for (name, second_list) in second.conditions() {
    let Some(first_list) = first.condition_list(name) else {
      return Ok(false);
    };
    for second_condition in second_list {
      let mut contained = false;
      for first_condition in first_list {
        if condition_subset(first_condition, second_condition)? {
          contained = true;
          break;
        }
      }
      if !contained {
        return Ok(false);
      }
    }
  }
  Ok(true)
}

pub enum RuleIntersection {
  /// The rules' predicates do not overlap; there is nothing to emit for the pair.
  Disjoint,
  /// The overlap needs no separate rule: the first rule is `Final`, or the second rule's
  /// actions would not change the first's.
  Unchanged,
  /// A new rule matching exactly the overlap, with actions merged per the tag rules.
  New(NativeRule),
}

/// The merge engine behind [`rule_intersection`] and the block compiler's rule modification.
/// Returns `None` when the rules cannot match a common item; otherwise the rule matching the
/// overlap, paired with whether its actions or rule tags differ from the first rule's.
pub(crate) fn merge_rules(
  first: &NativeRule,
  second: &NativeRule,
) -> CompileResult<Option<(NativeRule, bool)>> {
  let mut result = NativeRule::new((first.tags | second.tags) & RuleTag::Sticky);

  for rule in [first, second] {
    for (name, list) in rule.conditions() {
      if is_special(name) {
        continue;
      }
      for condition in list {
        result.add_condition(condition)?;
        if result.is_useless() {
          return Ok(None);
        }
      }
    }
  }

  for name in SPECIAL_NAME_LISTS {
    let name = IString::from(name);
    match (first.condition_list(&name), second.condition_list(&name)) {
      (None, None) => {}
      (Some(list), None) | (None, Some(list)) => {
        for condition in list {
          result.add_condition(condition)?;
        }
      }
      (Some(first_list), Some(second_list)) => {
        // Intersect every condition of the first rule with every condition of the second and
        // store the refinements. With one condition per rule, the usual case, this stays one
        // condition.
        for first_condition in first_list {
          for second_condition in second_list {
            match condition_intersection(first_condition, second_condition)? {
              Some(condition) => result.add_condition(&condition)?,
              None => return Ok(None),
            }
          }
        }
      }
    }
  }

  // The overlap matches something. Merge the actions, tracking whether the result actually
  // differs from the first rule; if not, the pair needs no rule of its own.
  let mut changed = second.tags.contains(RuleTag::Final);

  let mut names: Vec<&IString> = first.actions().keys().collect();
  for name in second.actions().keys() {
    if !first.actions().contains_key(name) {
      names.push(name);
    }
  }

  for name in names {
    let first_action = first.action(name);
    let second_action = second.action(name);

    if second.tags.contains(RuleTag::Override) {
      match (first_action, second_action) {
        (Some(a1), _) if a1.tags().contains(RuleTag::Final) => {
          result.add_action(a1);
        }
        (_, Some(a2)) => {
          result.add_action(a2);
          changed = true;
        }
        (Some(a1), None) => {
          result.add_action(a1);
        }
        (None, None) => {}
      }
    } else {
      // The second rule appends: its actions fill gaps, and win otherwise only by their own
      // Override tag against a non-Final action.
      match (first_action, second_action) {
        (None, Some(a2)) => {
          result.add_action(a2);
          changed = true;
        }
        (Some(a1), _) if a1.tags().contains(RuleTag::Final) => {
          result.add_action(a1);
        }
        (Some(_), Some(a2)) if a2.tags().contains(RuleTag::Override) => {
          result.add_action(a2);
          changed = true;
        }
        (Some(a1), _) => {
          result.add_action(a1);
        }
        (None, None) => {}
      }
    }
  }

  Ok(Some((result, changed)))
}

/// Builds the rule matching the overlap of `first` and `second`.
///
/// Conditions are intersected by folding both rules through `add_condition`, except for the
/// special name-list attributes, which are intersected pairwise. Actions are merged name by
/// name: a `Final` action of the first rule always survives; an `Override` on the second rule
/// (or on one of its actions) replaces; otherwise the first rule's action wins. The result
/// inherits `Final` from either input.
pub fn rule_intersection(first: &NativeRule, second: &NativeRule) -> CompileResult<RuleIntersection> {
  if first.tags.contains(RuleTag::Final) {
    return Ok(RuleIntersection::Unchanged);
  }
  match merge_rules(first, second)? {
    None => Ok(RuleIntersection::Disjoint),
    Some((result, true)) => Ok(RuleIntersection::New(result)),
    Some((_, false)) => Ok(RuleIntersection::Unchanged),
  }
}

pub enum RuleDifference {
  /// Every item of the first rule is matched by the second; the difference is empty.
  Empty,
  /// The difference could not be sharpened; it is overapproximated by the first rule itself.
  First,
  /// The first rule with one condition replaced by a sharper one.
  New(NativeRule),
}

/// Overapproximates `first − second`.
///
/// Writing the first rule as `a₁ ∧ a₂ ∧ …` and the second as `b₁ ∧ b₂ ∧ …`,
///
/// ```text
/// first − second = (a₁ ∧ a₂ ∧ …) ∧ ¬(b₁ ∧ b₂ ∧ …)
///                = (first ∧ ¬b₁) ∨ (first ∧ ¬b₂) ∨ …
/// ```
///
/// Unions of rules are not representable, so the disjunction is only usable when at most one
/// member is non-trivial: each member is `first` with one condition cut down by a condition
/// difference. If some member equals `first` outright the rules are disjoint and `first` is
/// returned; if all members are empty so is the difference; one sharpenable member yields a new
/// rule; anything else falls back to `first`, which is always a sound overestimate.
pub fn rule_difference(first: &NativeRule, second: &NativeRule) -> CompileResult<RuleDifference> {
  let mut nontrivial = 0usize;
  let mut replacement: Option<Condition> = None;

  for (name, second_list) in second.conditions() {
    if second_list.len() > 1 {
      // Several conditions on one attribute (name lists, socket groups); the cut is not worth
      // chasing, overestimate with the whole first rule.
      return Ok(RuleDifference::First);
    }
    let second_condition = &second_list[0];

    let first_condition = match first.condition_list(name) {
      None => None,
      Some(list) if list.len() == 1 => Some(&list[0]),
      Some(_) => return Ok(RuleDifference::First),
    };

    match condition_difference(first_condition, second_condition)? {
      ConditionDifference::Empty => {
        // This member of the disjunction is empty.
      }
      ConditionDifference::First => {
        // This member is all of `first`: the two conditions, hence the two rules, are disjoint.
        return Ok(RuleDifference::First);
      }
      ConditionDifference::New(condition) => {
        nontrivial += 1;
        replacement = Some(condition);
      }
      ConditionDifference::Invalid => {
        nontrivial += 1;
        replacement = None;
      }
    }
  }

  match nontrivial {
    0 => Ok(RuleDifference::Empty),
    1 => match replacement {
      Some(condition) => {
        let mut result = first.clone();
        result.set_condition(condition);
        Ok(RuleDifference::New(result))
      }
      // The one non-empty member is not representable as a condition.
      None => Ok(RuleDifference::First),
    },
    _ => Ok(RuleDifference::First),
  }
}
