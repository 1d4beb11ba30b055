/*!

Compiler core for the Sift item-filter language.

Sift extends the flat filter language a game engine consumes with nested blocks, cascading style
defaults, and modifier blocks that transform surrounding rules. This crate is the backend: it
takes the parsed form of a filter (see [`ast`]) and flattens it into an ordered list of
[`NativeRule`](crate::core::native_rule::NativeRule)s, pruning rules that can match no item
along the way. The [`render`] module prints the result in the engine's syntax.

The lexer and parser, variable substitution, and the command-line driver live elsewhere; this
crate starts at the AST and stops at the rendered rule list. Compilation is synchronous,
single-pass, and keeps no state between invocations.

*/

pub mod ast;
pub mod compiler;
pub mod core;
pub mod error;
pub mod render;

#[cfg(test)]
mod tests;
