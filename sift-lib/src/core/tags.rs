/*!

Tags can appear on blocks, conditions, and actions in Sift source, and are carried through onto
the native rules the compiler builds. They control how same-named entries combine when scopes are
merged. (See the `native_rule` and `algebra` modules for the merge rules themselves.)

*/

use enumflags2::{bitflags, make_bitflags, BitFlags};

#[bitflags]
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RuleTag {
  /// On addition, replace same-name predecessors instead of merging or being shadowed.
  Override,
  /// Subsequent additions of the same name are ignored; sticky under rule intersection.
  Final,
  /// Suppress the auto-generated default rule for the enclosing block.
  NoDefault,
  /// Modifier variants are mandatory; the un-modified base rule is not preserved.
  Required,
}

pub type RuleTags = BitFlags<RuleTag, u8>;

impl RuleTag {
  //	Conjunctions
  #![allow(non_upper_case_globals)]

  /// The tags that survive onto a rule produced by intersection. `Override` is per-operation
  /// and `NoDefault`/`Required` only have meaning on blocks.
  pub const Sticky: RuleTags = make_bitflags!(RuleTag::{Final});
}
