/*!

End-to-end tests: a hand-built AST goes through the compiler and the rendered native text is
checked. The parser is not part of this crate, so the helpers below stand in for it. That
includes its visibility desugaring, which turns a rule's `Show`/`Hide` into the reserved boolean
`Hidden` action at the head of the command list.

The round-trip tests re-read rendered output with a small native-syntax reader and render it
again; the second rendering must be a fixed point of the first.

*/

use sift_abs::IString;

use crate::{
  ast::{Block, BlockType, Command, FilterAST, Statement},
  compiler::compile_filter,
  core::{
    action::{Action, ActionValue, HIDDEN},
    algebra::condition_subset,
    condition::{Condition, ConditionValue},
    native_rule::{FilterNative, NativeRule},
    tags::{RuleTag, RuleTags},
    value::{Color, SocketGroup},
  },
  error::CompileError,
  render::render_filter,
};

// region AST helpers

fn condition(c: Condition) -> Command {
  Command::Condition(c)
}

fn action(a: Action) -> Command {
  Command::Action(a)
}

fn sub_block(block_type: BlockType, tags: RuleTags, commands: Vec<Command>) -> Command {
  Command::Block(Box::new(Block::new(block_type, tags, commands)))
}

/// A `Rule` block as the parser would deliver it: visible unless an explicit `Hide` replaced
/// the desugared `Hidden false`.
fn show_rule(tags: RuleTags, mut commands: Vec<Command>) -> Block {
  commands.insert(0, action(Action::boolean(HIDDEN, false)));
  Block::new(BlockType::Rule, tags, commands)
}

fn compile(filter: FilterAST) -> FilterNative {
  compile_filter(&filter).unwrap()
}

fn compile_text(filter: FilterAST) -> String {
  render_filter(&compile(filter)).unwrap()
}

// endregion

// region Native re-reader

fn parse_value(attribute: &str, token: &str) -> i32 {
  match (attribute, token) {
    ("Rarity", "Normal") => 1,
    ("Rarity", "Magic")  => 2,
    ("Rarity", "Rare")   => 3,
    ("Rarity", "Unique") => 4,
    _ => token.parse().unwrap(),
  }
}

fn reread_line(rule: &mut NativeRule, line: &str) {
  let line = line.trim();
  let (name, rest) = match line.split_once(' ') {
    Some((name, rest)) => (name, rest.trim()),
    None => {
      // A bare name is a boolean action that rendered because it is set.
      rule.add_action(&Action::boolean(line, true));
      return;
    }
  };

  if let Some(bound) = rest.strip_prefix(">= ") {
    rule.add_condition(&Condition::at_least(name, parse_value(name, bound))).unwrap();
  } else if let Some(bound) = rest.strip_prefix("<= ") {
    rule.add_condition(&Condition::at_most(name, parse_value(name, bound))).unwrap();
  } else if let Some(value) = rest.strip_prefix("= ") {
    let value = parse_value(name, value);
    rule.add_condition(&Condition::interval(name, value, value)).unwrap();
  } else if rest.starts_with('"') {
    let names: Vec<&str> = rest.split('"').filter(|s| !s.is_empty() && !s.trim().is_empty()).collect();
    rule.add_condition(&Condition::name_list(name, names)).unwrap();
  } else if rest == "true" || rest == "false" {
    rule.add_condition(&Condition::boolean(name, rest == "true")).unwrap();
  } else if name == "SocketGroup" || name == "Sockets" {
    rule.add_condition(&Condition::socket_group(name, SocketGroup::from_letters(rest).unwrap()))
        .unwrap();
  } else {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let numbers: Vec<Option<i32>> = tokens.iter().map(|t| t.parse().ok()).collect();
    let act = match (tokens.as_slice(), numbers.as_slice()) {
      ([_], [Some(n)]) => Action::number(name, *n).unwrap(),
      ([path], [None]) => Action::file(name, *path),
      ([_, _, _, _], [Some(r), Some(g), Some(b), Some(a)]) => {
        Action::color(name, Color::new(*r as u8, *g as u8, *b as u8, *a as u8))
      }
      ([id, _], [_, Some(volume)]) => Action::sound(name, *id, *volume).unwrap(),
      ([first, second], _) => Action::effect(name, *first, *second),
      ([_, color, shape], [Some(size), _, _]) => {
        Action::map_icon(name, *size, *color, *shape).unwrap()
      }
      _ => panic!("unrecognised action line: {}", line),
    };
    rule.add_action(&act);
  }
}

/// Reads a rendered native filter back into rules. Only understands what the renderer can
/// produce; used to check the boundary round-trip.
fn reread_filter(text: &str) -> FilterNative {
  let mut filter = FilterNative::new();
  for chunk in text.split("\n\n") {
    let mut lines = chunk.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else { continue };
    let mut rule = NativeRule::new(RuleTags::empty());
    rule.add_action(&Action::boolean(HIDDEN, header.trim() == "Hide"));
    for line in lines {
      reread_line(&mut rule, line);
    }
    filter.push(rule);
  }
  filter
}

// endregion

/// The quantified output invariants: emitted rules are viable, styled, and hold no redundant
/// condition pairs.
fn assert_output_invariants(filter: &FilterNative) {
  for rule in filter {
    assert!(!rule.is_useless());
    assert!(rule.has_actions());
    for (_, list) in rule.conditions() {
      for c in list.iter() {
        if let ConditionValue::Interval { from, to } = c.value {
          assert!(from <= to);
        }
      }
      if list.len() > 1 {
        for (i, a) in list.iter().enumerate() {
          for (j, b) in list.iter().enumerate() {
            if i != j {
              assert!(!condition_subset(a, b).unwrap());
            }
          }
        }
      }
    }
  }
}

fn assert_round_trips(text: &str) {
  let reread = reread_filter(text);
  assert_eq!(render_filter(&reread).unwrap(), text);
}

#[test]
fn simple_rule() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::interval("ItemLevel", 10, 20)),
    action(Action::number("SetFontSize", 30).unwrap()),
  ]))];

  let compiled = compile(filter);
  assert_output_invariants(&compiled);
  let text = render_filter(&compiled).unwrap();
  assert_eq!(text, "Show\n    ItemLevel >= 10\n    ItemLevel <= 20\n    SetFontSize 30\n");
  assert_round_trips(&text);
}

#[test]
fn modifier_intersection_keeps_the_unmodified_base() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::name_list("Class", vec!["Currency"])),
    sub_block(BlockType::Modifier, RuleTags::empty(), vec![
      condition(Condition::at_least("Quality", 10)),
      action(Action::number("SetFontSize", 40).unwrap()),
    ]),
  ]))];

  let compiled = compile(filter);
  assert_output_invariants(&compiled);
  let text = render_filter(&compiled).unwrap();
  assert_eq!(
    text,
    "Show\n    Class \"Currency\"\n    Quality >= 10\n    SetFontSize 40\n\
     \nShow\n    Class \"Currency\"\n"
  );
  assert_round_trips(&text);
}

#[test]
fn required_modifier_with_empty_intersection_compiles_to_nothing() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::interval("ItemLevel", 50, 60)),
    sub_block(BlockType::Modifier, RuleTag::Required.into(), vec![
      condition(Condition::interval("ItemLevel", 70, 80)),
      action(Action::boolean(HIDDEN, false)),
    ]),
  ]))];

  let compiled = compile(filter);
  assert!(compiled.is_empty());
}

#[test]
fn name_list_intersection_over_class() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::name_list("Class", vec!["Currency", "Gem"])),
    sub_block(BlockType::Modifier, RuleTags::empty(), vec![
      condition(Condition::name_list("Class", vec!["Currency Stackable"])),
      action(Action::number("SetFontSize", 40).unwrap()),
    ]),
  ]))];

  let compiled = compile(filter);
  assert_output_invariants(&compiled);
  let text = render_filter(&compiled).unwrap();
  assert_eq!(
    text,
    "Show\n    Class \"Currency Stackable\"\n    SetFontSize 40\n\
     \nShow\n    Class \"Currency\" \"Gem\"\n"
  );
  assert_round_trips(&text);
}

#[test]
fn final_actions_survive_inner_overrides() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    action(Action::number("SetFontSize", 30).unwrap().with_tags(RuleTag::Final.into())),
    sub_block(BlockType::Rule, RuleTags::empty(), vec![
      condition(Condition::interval("ItemLevel", 10, 20)),
      action(Action::number("SetFontSize", 40).unwrap().with_tags(RuleTag::Override.into())),
    ]),
  ]))];

  let compiled = compile(filter);
  assert_output_invariants(&compiled);
  assert_eq!(compiled.len(), 2);
  for rule in &compiled {
    assert_eq!(
      rule.action(&IString::from("SetFontSize")).map(|a| &a.value),
      Some(&ActionValue::Number(30))
    );
  }
}

#[test]
fn groups_emit_no_default_around_their_rules() {
  let filter = vec![Statement::Block(Block::new(
    BlockType::Group,
    RuleTag::NoDefault.into(),
    vec![
      sub_block(BlockType::Rule, RuleTags::empty(), vec![
        action(Action::boolean(HIDDEN, false)),
        condition(Condition::interval("ItemLevel", 10, 20)),
      ]),
      sub_block(BlockType::Rule, RuleTags::empty(), vec![
        action(Action::boolean(HIDDEN, false)),
        condition(Condition::interval("ItemLevel", 30, 40)),
      ]),
    ],
  ))];

  let compiled = compile(filter);
  assert_output_invariants(&compiled);
  let text = render_filter(&compiled).unwrap();
  assert_eq!(
    text,
    "Show\n    ItemLevel >= 10\n    ItemLevel <= 20\n\
     \nShow\n    ItemLevel >= 30\n    ItemLevel <= 40\n"
  );
  assert_round_trips(&text);
}

#[test]
fn group_conditions_cascade_onto_every_rule() {
  let filter = vec![Statement::Block(Block::new(
    BlockType::Group,
    RuleTags::empty(),
    vec![
      condition(Condition::name_list("Class", vec!["Map"])),
      action(Action::number("SetFontSize", 36).unwrap()),
      sub_block(BlockType::Rule, RuleTags::empty(), vec![
        action(Action::boolean(HIDDEN, false)),
        condition(Condition::at_least("MapTier", 11)),
        action(Action::number("SetFontSize", 45).unwrap().with_tags(RuleTag::Override.into())),
      ]),
    ],
  ))];

  let compiled = compile(filter);
  assert_output_invariants(&compiled);
  let text = render_filter(&compiled).unwrap();
  // The nested rule specialises the group's style; the group's own default follows it.
  assert_eq!(
    text,
    "Show\n    Class \"Map\"\n    MapTier >= 11\n    SetFontSize 45\n\
     \nShow\n    Class \"Map\"\n    SetFontSize 36\n"
  );
  assert_round_trips(&text);
}

#[test]
fn condition_groups_multiply_the_output() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::name_list("Class", vec!["Currency"])),
    action(Action::number("SetFontSize", 36).unwrap()),
    sub_block(BlockType::ConditionGroup, RuleTags::empty(), vec![
      sub_block(BlockType::Rule, RuleTags::empty(), vec![
        condition(Condition::at_least("StackSize", 10)),
        action(Action::number("SetFontSize", 45).unwrap().with_tags(RuleTag::Override.into())),
      ]),
      sub_block(BlockType::Rule, RuleTags::empty(), vec![
        condition(Condition::at_most("StackSize", 9)),
      ]),
    ]),
  ]))];

  let compiled = compile(filter);
  assert_output_invariants(&compiled);
  let text = render_filter(&compiled).unwrap();
  assert_eq!(
    text,
    "Show\n    Class \"Currency\"\n    StackSize >= 10\n    SetFontSize 45\n\
     \nShow\n    Class \"Currency\"\n    StackSize <= 9\n    SetFontSize 36\n"
  );
  assert_round_trips(&text);
}

#[test]
fn default_blocks_replace_the_generated_default() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::name_list("Class", vec!["Gem"])),
    action(Action::number("SetFontSize", 36).unwrap()),
    sub_block(BlockType::Rule, RuleTags::empty(), vec![
      condition(Condition::at_least("GemLevel", 18)),
      action(Action::number("SetFontSize", 45).unwrap().with_tags(RuleTag::Override.into())),
    ]),
    sub_block(BlockType::Default, RuleTags::empty(), vec![
      action(Action::number("SetFontSize", 20).unwrap().with_tags(RuleTag::Override.into())),
    ]),
  ]))];

  let compiled = compile(filter);
  assert_output_invariants(&compiled);
  let text = render_filter(&compiled).unwrap();
  // The explicit fallback (size 20) is emitted; the implicit default (size 36) is not.
  assert_eq!(
    text,
    "Show\n    Class \"Gem\"\n    GemLevel >= 18\n    SetFontSize 45\n\
     \nShow\n    Class \"Gem\"\n    SetFontSize 20\n"
  );
  assert_round_trips(&text);
}

#[test]
fn hide_rules_render_a_hide_header_without_an_action_line() {
  let mut commands = vec![
    condition(Condition::interval("DropLevel", 1, 10)),
    action(Action::number("SetFontSize", 18).unwrap()),
  ];
  commands.insert(0, action(Action::boolean(HIDDEN, true)));
  let filter = vec![Statement::Block(Block::new(BlockType::Rule, RuleTags::empty(), commands))];

  let text = compile_text(filter);
  assert_eq!(text, "Hide\n    DropLevel >= 1\n    DropLevel <= 10\n    SetFontSize 18\n");
  assert_round_trips(&text);
}

#[test]
fn unbounded_intervals_serialise_as_no_condition() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::interval("ItemLevel", i32::MIN, i32::MAX)),
    action(Action::number("SetFontSize", 30).unwrap()),
  ]))];

  let text = compile_text(filter);
  assert_eq!(text, "Show\n    SetFontSize 30\n");
}

#[test]
fn socket_groups_at_the_cap_survive_and_beyond_it_vanish() {
  let at_cap = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::socket_group("SocketGroup", SocketGroup::new(3, 3, 0, 0))),
  ]))];
  assert_eq!(compile_text(at_cap), "Show\n    SocketGroup RRRGGG\n");

  let beyond = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::socket_group("SocketGroup", SocketGroup::new(4, 3, 0, 0))),
  ]))];
  assert!(compile(beyond).is_empty());
}

#[test]
fn empty_name_lists_compile_to_nothing() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::name_list("Class", Vec::<&str>::new())),
    action(Action::number("SetFontSize", 30).unwrap()),
  ]))];
  assert!(compile(filter).is_empty());
}

#[test]
fn rules_without_actions_are_not_emitted() {
  // No visibility desugaring and no styling at all.
  let filter = vec![Statement::Block(Block::new(BlockType::Rule, RuleTags::empty(), vec![
    condition(Condition::interval("ItemLevel", 10, 20)),
  ]))];
  assert!(compile(filter).is_empty());
}

#[test]
fn modifier_blocks_are_rejected_at_the_top_level() {
  let filter = vec![Statement::Block(Block::new(
    BlockType::Modifier,
    RuleTags::empty(),
    vec![condition(Condition::interval("ItemLevel", 10, 20))],
  ))];
  assert!(matches!(compile_filter(&filter), Err(CompileError::Internal { .. })));
}

#[test]
fn rarity_round_trips_through_its_names() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::interval("Rarity", 2, 3)),
    action(Action::number("SetFontSize", 30).unwrap()),
  ]))];

  let text = compile_text(filter);
  assert_eq!(text, "Show\n    Rarity >= Magic\n    Rarity <= Rare\n    SetFontSize 30\n");
  assert_round_trips(&text);
}

#[test]
fn a_filter_of_many_action_shapes_round_trips() {
  let filter = vec![Statement::Block(show_rule(RuleTags::empty(), vec![
    condition(Condition::name_list("BaseType", vec!["Exalted Orb"])),
    action(Action::color("SetTextColor", Color::new(255, 128, 0, 255))),
    action(Action::sound("PlayAlertSound", "6", 300).unwrap()),
    action(Action::map_icon("MinimapIcon", 0, "Red", "Star").unwrap()),
    action(Action::effect("PlayEffect", "Red", "Temp")),
    action(Action::file("CustomAlertSound", "drop.wav")),
    action(Action::boolean("DisableDropSound", true)),
  ]))];

  let compiled = compile(filter);
  assert_output_invariants(&compiled);
  let text = render_filter(&compiled).unwrap();
  assert_round_trips(&text);
}
