/*!

Set operations over conditions of the same attribute: containment, intersection, and difference.
Conditions denote item sets, so these are the primitive moves every rule-level operation is built
from. All three are only defined between conditions of the *same* attribute name; mixing
attributes is a programming error upstream.

Name lists get special treatment throughout. A name list matches on the *input* strings, so two
fragments that are incomparable as substrings are assumed to match no common item. The
intersection of `BaseType "Scroll"` and `BaseType "Wisdom"` is therefore empty. This can exclude
some real matches, but for reasonable filters it avoids a blowup of rules that survive
compilation only to match nothing. (We do not assume this for difference, which errs in the
opposite, safe, direction.)

*/

use sift_abs::IString;

use crate::{
  core::condition::{Condition, ConditionValue},
  error::CompileResult,
  internal_error,
};

/// True when `haystack` would be matched by the list fragment `fragment`, i.e. the fragment
/// occurs in it as a substring.
pub(crate) fn matched_by(haystack: &str, fragment: &str) -> bool {
  haystack.contains(fragment)
}

fn check_comparable(first: &Condition, second: &Condition) -> CompileResult<()> {
  if first.name != second.name {
    return Err(internal_error!(
      "comparing conditions of different attributes: {} vs {}",
      first.name, second.name
    ));
  }
  if first.kind() != second.kind() {
    return Err(internal_error!(
      "conditions on {} have mismatched shapes: {} vs {}",
      first.name,
      first.kind().name_str(),
      second.kind().name_str()
    ));
  }
  Ok(())
}

/// Is every item matched by `first` also matched by `second`?
pub fn condition_subset(first: &Condition, second: &Condition) -> CompileResult<bool> {
  check_comparable(first, second)?;
  match (&first.value, &second.value) {
    (ConditionValue::Interval { from: a_from, to: a_to },
     ConditionValue::Interval { from: b_from, to: b_to }) => {
      Ok(b_from <= a_from && a_to <= b_to)
    }

    (ConditionValue::Boolean(a), ConditionValue::Boolean(b)) => Ok(a == b),

    (ConditionValue::NameList(a), ConditionValue::NameList(b)) => {
      // True when every fragment in the first list is matched by some fragment in the second:
      // anything the first fragment matches, the second, broader one matches too.
      for fragment_a in a {
        if !b.iter().any(|fragment_b| matched_by(fragment_a, fragment_b)) {
          return Ok(false);
        }
      }
      Ok(true)
    }

    (ConditionValue::SocketGroup(a), ConditionValue::SocketGroup(b)) => Ok(a.component_le(b)),

    _ => Err(internal_error!("unreachable shape pairing for {}", first.name)),
  }
}

/// A condition matching exactly the items matched by both inputs, or `None` when the
/// intersection is empty.
///
/// Only name lists need this. For intervals, booleans, and socket groups, adding both conditions
/// to a rule tightens the stored condition in place, so computing an explicit intersection is
/// treated as an internal error there. Name lists cannot be refined by accumulation: the lists
/// act disjunctively, so the intersection is rebuilt fragment pair by fragment pair, keeping the
/// more restrictive (longer) fragment of each comparable pair and pruning fragments already
/// covered by a shorter one in the result.
pub fn condition_intersection(first: &Condition, second: &Condition) -> CompileResult<Option<Condition>> {
  check_comparable(first, second)?;
  match (&first.value, &second.value) {
    (ConditionValue::NameList(a), ConditionValue::NameList(b)) => {
      let mut result: Vec<IString> = Vec::new();

      for fragment_a in a {
        for fragment_b in b {
          let candidate = if matched_by(fragment_a, fragment_b) {
            Some(fragment_a)
          } else if matched_by(fragment_b, fragment_a) {
            Some(fragment_b)
          } else {
            None
          };

          if let Some(candidate) = candidate {
            // Candidates accumulate disjunctively: a candidate covered by a fragment already in
            // the result is dropped, and result fragments the candidate covers are evicted.
            let mut covered = false;
            result.retain(|present| {
              if covered {
                return true;
              }
              if matched_by(candidate, present) {
                covered = true;
                return true;
              }
              !matched_by(present, candidate)
            });
            if !covered {
              result.push(candidate.clone());
            }
          }
        }
      }

      if result.is_empty() {
        Ok(None)
      } else {
        Ok(Some(Condition::name_list(first.name.clone(), result)))
      }
    }

    (ConditionValue::Interval { .. }, _)
    | (ConditionValue::Boolean(_), _)
    | (ConditionValue::SocketGroup(_), _) => {
      Err(internal_error!(
        "computing an intersection of {} conditions where addition suffices",
        first.kind().name_str()
      ))
    }

    _ => Err(internal_error!("unreachable shape pairing for {}", first.name)),
  }
}

/// The outcome of `condition_difference(a, b)`: a single condition `c` with
/// `a ∧ ¬b ⊆ c ⊆ a`.
pub enum ConditionDifference {
  /// The difference is empty; every `a`-match is a `b`-match.
  Empty,
  /// The difference is exactly `a`; the two conditions are disjoint.
  First,
  /// A sharper condition covering the difference.
  New(Condition),
  /// The difference is non-empty but not representable as a single condition.
  Invalid,
}

/// Computes an overapproximation of `first − second`. Passing `None` for `first` computes the
/// complement of `second`, which is representable only for booleans and the semi-infinite
/// interval cuts.
pub fn condition_difference(
  first: Option<&Condition>,
  second: &Condition,
) -> CompileResult<ConditionDifference> {
  if let Some(first) = first {
    check_comparable(first, second)?;
  }

  match &second.value {
    ConditionValue::Interval { from: b_from, to: b_to } => {
      let (b_from, b_to) = (*b_from, *b_to);
      let Some(first) = first else {
        return Ok(if b_from == i32::MIN && b_to == i32::MAX {
          ConditionDifference::Empty
        } else if b_from == i32::MIN {
          ConditionDifference::New(Condition::interval(second.name.clone(), b_to + 1, i32::MAX))
        } else if b_to == i32::MAX {
          ConditionDifference::New(Condition::interval(second.name.clone(), i32::MIN, b_from - 1))
        } else {
          // The complement would be two disjoint rays.
          ConditionDifference::Invalid
        });
      };
      let ConditionValue::Interval { from: a_from, to: a_to } = &first.value else {
        return Err(internal_error!("unreachable shape pairing for {}", second.name));
      };
      let (a_from, a_to) = (*a_from, *a_to);

      if b_to < a_from || a_to < b_from {
        // Disjoint intervals; the difference is all of the first.
        Ok(ConditionDifference::First)
      } else if b_from <= a_from && a_to <= b_to {
        // The second covers the first entirely.
        Ok(ConditionDifference::Empty)
      } else if a_from < b_from && b_to < a_to {
        // The second splits the first in two; not a single interval.
        Ok(ConditionDifference::Invalid)
      } else if b_from <= a_from {
        Ok(ConditionDifference::New(Condition::interval(first.name.clone(), b_to + 1, a_to)))
      } else {
        Ok(ConditionDifference::New(Condition::interval(first.name.clone(), a_from, b_from - 1)))
      }
    }

    ConditionValue::Boolean(b) => {
      let Some(first) = first else {
        return Ok(ConditionDifference::New(Condition::boolean(second.name.clone(), !b)));
      };
      let ConditionValue::Boolean(a) = &first.value else {
        return Err(internal_error!("unreachable shape pairing for {}", second.name));
      };
      if a != b {
        Ok(ConditionDifference::First)
      } else {
        Ok(ConditionDifference::Empty)
      }
    }

    ConditionValue::NameList(b) => {
      let Some(first) = first else {
        return Ok(ConditionDifference::Invalid);
      };
      let ConditionValue::NameList(a) = &first.value else {
        return Err(internal_error!("unreachable shape pairing for {}", second.name));
      };

      // Keep the fragments of the first list not matched by the second. An overestimation, in
      // the safe direction.
      let survivors: Vec<IString> = a.iter()
          .filter(|fragment_a| !b.iter().any(|fragment_b| matched_by(fragment_a, fragment_b)))
          .cloned()
          .collect();

      if survivors.is_empty() {
        Ok(ConditionDifference::Empty)
      } else if survivors.len() == a.len() {
        Ok(ConditionDifference::First)
      } else {
        Ok(ConditionDifference::New(Condition::name_list(first.name.clone(), survivors)))
      }
    }

    ConditionValue::SocketGroup(_) => {
      let Some(first) = first else {
        return Ok(ConditionDifference::Invalid);
      };
      if condition_subset(first, second)? {
        Ok(ConditionDifference::Empty)
      } else {
        // Nothing sharper can be said about socket multisets.
        Ok(ConditionDifference::First)
      }
    }
  }
}
