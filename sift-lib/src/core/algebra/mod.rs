/*!

The set algebra the compiler is built on: subset, intersection, and difference over conditions
and over whole rules. Where an exact result is not representable the operations overestimate, and
every overestimation is in the direction that keeps emitted rules sound (they may match more than
the ideal rule, never less of what the filter author asked to style).

*/

pub mod condition;
pub mod rule;

pub use condition::{
  condition_difference,
  condition_intersection,
  condition_subset,
  ConditionDifference,
};
pub use rule::{
  rule_difference,
  rule_intersection,
  rule_subset,
  RuleDifference,
  RuleIntersection,
};
