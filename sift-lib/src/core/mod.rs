/*!

The compiler's value world: condition and action atoms, the tag bit-set, the flat native rule,
and the set algebra over them. Everything here is owned by value; cloning a rule deep-copies its
atoms, and nothing outlives the compilation that allocated it.

*/

pub mod action;
pub mod algebra;
pub mod condition;
pub mod format;
pub mod limits;
pub mod native_rule;
pub mod tags;
pub mod value;
