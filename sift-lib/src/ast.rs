/*!

The abstract syntax the parser hands to the compiler. By the time a filter reaches this form,
variables have been substituted, literals have been turned into typed atoms, and tags have been
attached; the compiler never sees source text.

A filter is a sequence of statements. Definitions are kept only so diagnostics can mention them;
instructions carry no compile-time semantics either. All the work is in blocks: an ordered
command list, a block type selecting how the block composes with its surroundings, and a tag set.

*/

use sift_abs::IString;

use crate::core::{action::Action, condition::Condition, tags::RuleTags};

pub type FilterAST = Vec<Statement>;
pub type BxBlock   = Box<Block>;

pub enum Statement {
  /// A variable definition. Substitution happens during parsing; the compiler ignores these.
  Definition(Definition),
  /// A directive to the toolchain rather than a rule.
  Instruction(Instruction),
  Block(Block),
}

pub struct Definition {
  pub name: IString,
}

pub enum Instruction {
  /// The language version the filter was written against; enforced by the parser.
  Version { major: i32, minor: i32, patch: i32 },
  /// A section break. Earlier toolchains flushed partially compiled output here.
  Flush,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BlockType {
  /// An ordinary rule; compiles to native rules appended to the output.
  Rule,
  /// A grouping of rules sharing ambient conditions and actions.
  Group,
  /// A bounded disjunction: multiplies the enclosing block's output by its alternatives.
  ConditionGroup,
  /// Transforms the rules already produced by the enclosing block.
  Modifier,
  /// A fallback; suppresses the enclosing block's auto-generated default rule.
  Default,
}

impl BlockType {
  pub fn name_str(self) -> &'static str {
    match self {
      BlockType::Rule           => "Rule",
      BlockType::Group          => "Group",
      BlockType::ConditionGroup => "ConditionGroup",
      BlockType::Modifier       => "Modifier",
      BlockType::Default        => "Default",
    }
  }
}

pub struct Block {
  pub block_type: BlockType,
  pub tags      : RuleTags,
  pub commands  : Vec<Command>,
}

impl Block {
  pub fn new(block_type: BlockType, tags: RuleTags, commands: Vec<Command>) -> Block {
    Block { block_type, tags, commands }
  }
}

pub enum Command {
  Condition(Condition),
  Action(Action),
  Block(BxBlock),
}
