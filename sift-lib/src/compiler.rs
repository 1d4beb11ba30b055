/*!

Flattening: a parsed filter goes in, an ordered list of native rules comes out.

Compilation is one recursive walk. Each block is compiled against a *base* rule that accumulates
the conditions and actions of the enclosing scopes; entering a sub-block clones the base, so
sibling blocks never see each other's refinements. How a sub-block's output joins the enclosing
block's output depends on its type:

- `Rule` and `Group` blocks compile against the current base and append their rules.
- `ConditionGroup` blocks are stashed and resolved after the block body: each one multiplies the
  output filter by its alternatives.
- `Modifier` blocks transform the rules produced so far, emitting one variant per (rule,
  modifier-rule) pair; a `Required` modifier drops the unmodified originals.
- `Default` blocks append like rules but suppress the block's auto-generated default.

A block that contributed any condition or action of its own ends by emitting the accumulated
base rule as a default, unless a `Default` or `Modifier` block took over that role or the block
is tagged `NoDefault`. Blocks containing only sub-blocks emit no default.

*/

use sift_abs::{debug, warning};

use crate::{
  ast::{Block, BlockType, Command, FilterAST, Statement},
  core::{
    algebra::{rule::merge_rules, rule_subset},
    native_rule::{FilterNative, NativeRule},
    tags::RuleTag,
  },
  error::CompileResult,
  internal_error,
};

/// Compiles a full filter. Definitions and instructions are already spent by the parser; every
/// rule-bearing block must be a `Rule` or `Group` at the top level. Rules that match nothing or
/// style nothing are elided from the output.
pub fn compile_filter(filter: &FilterAST) -> CompileResult<FilterNative> {
  let mut out = FilterNative::new();

  for statement in filter {
    match statement {
      Statement::Definition(definition) => {
        // Variable substitution happened during parsing.
        debug!(3, "definition {} already substituted", definition.name);
      }

      Statement::Instruction(_) => {
        // Version is enforced by the parser; section breaks carry no semantics here.
      }

      Statement::Block(block) => match block.block_type {
        BlockType::Rule | BlockType::Group => {
          let mut rules = compile_block(block, None)?;
          if rules.is_empty() {
            warning!(1, "a top-level {} compiles to no rules", block.block_type.name_str());
          } else {
            debug!(2, "top-level {} compiled to {} rule(s)", block.block_type.name_str(), rules.len());
          }
          out.append(&mut rules);
        }
        other => {
          return Err(internal_error!(
            "{} block is not allowed at the top level",
            other.name_str()
          ));
        }
      },
    }
  }

  let produced = out.len();
  out.retain(|rule| !rule.is_useless() && rule.has_actions());
  if out.len() < produced {
    debug!(1, "elided {} rule(s) matching or styling nothing", produced - out.len());
  }

  Ok(out)
}

/// Compiles one block against an optional base rule carrying the enclosing scopes' conditions
/// and actions.
pub fn compile_block(block: &Block, base: Option<&NativeRule>) -> CompileResult<FilterNative> {
  let mut base_rule = match base {
    Some(rule) => {
      let mut base_rule = rule.clone();
      base_rule.tags |= block.tags;
      base_rule
    }
    None => NativeRule::new(block.tags),
  };

  let mut out = FilterNative::new();
  let mut alternatives: Vec<FilterNative> = Vec::new();
  let mut emit_default = false;

  for command in &block.commands {
    match command {
      Command::Condition(condition) => {
        base_rule.add_condition(condition)?;
        emit_default = true;
      }

      Command::Action(action) => {
        base_rule.add_action(action);
        emit_default = true;
      }

      Command::Block(sub) => match sub.block_type {
        BlockType::Rule | BlockType::Group => {
          let mut rules = compile_block(sub, Some(&base_rule))?;
          out.append(&mut rules);
        }

        BlockType::ConditionGroup => {
          // Resolved after the block body; the alternatives multiply whatever the block
          // produced, so they are not specialisations of the base.
          alternatives.push(compile_block(sub, None)?);
        }

        BlockType::Modifier => {
          // A modifier with nothing to modify applies to the base rule itself.
          if out.is_empty() {
            out.push(base_rule.clone());
            emit_default = false;
          }
          let modifier = compile_block(sub, None)?;
          let required = sub.tags.contains(RuleTag::Required);
          out = modify_filter(out, &modifier, required)?;
        }

        BlockType::Default => {
          let mut rules = compile_block(sub, Some(&base_rule))?;
          out.append(&mut rules);
          // An explicit fallback replaces the auto-generated one.
          emit_default = false;
        }
      },
    }
  }

  if emit_default && !block.tags.contains(RuleTag::NoDefault) {
    out.push(base_rule);
  }

  for group in alternatives {
    let mut multiplied = FilterNative::new();
    for rule in &out {
      if rule.tags.contains(RuleTag::Final) {
        // A Final rule is multiplied by nothing; it passes through once, untouched.
        multiplied.push(rule.clone());
        continue;
      }
      for alternative in &group {
        if let Some(variant) = modify_rule(rule, alternative)? {
          if !variant.is_useless() {
            multiplied.push(variant);
          }
        }
      }
    }
    out = multiplied;
  }

  Ok(out)
}

/// One variant of `rule` under `modifier`: a clone of the old rule with the modifier's
/// conditions intersected in and its actions merged. `None` when the two cannot match a common
/// item.
fn modify_rule(rule: &NativeRule, modifier: &NativeRule) -> CompileResult<Option<NativeRule>> {
  Ok(merge_rules(rule, modifier)?.map(|(variant, _)| variant))
}

/// Applies a compiled modifier to every rule of `old`, emitting each viable variant. A variant
/// that covers everything its source rule matches makes the source redundant; otherwise the
/// source survives, unless the modifier is `required`, in which case only variants survive.
/// `Final` rules are exempt: they are neither modified nor discarded.
fn modify_filter(
  old: FilterNative,
  modifier: &FilterNative,
  required: bool,
) -> CompileResult<FilterNative> {
  let mut result = FilterNative::new();

  for mut rule in old {
    if rule.tags.contains(RuleTag::Final) {
      result.push(rule);
      continue;
    }

    for modifier_rule in modifier {
      let Some(variant) = modify_rule(&rule, modifier_rule)? else {
        continue;
      };
      if variant.is_useless() {
        continue;
      }
      if rule_subset(&rule, &variant)? {
        rule.mark_useless();
      }
      result.push(variant);
    }

    if !required && !rule.is_useless() {
      result.push(rule);
    }
  }

  Ok(result)
}
