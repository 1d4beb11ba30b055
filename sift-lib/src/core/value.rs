/*!

Leaf value types shared by conditions and actions: display colours, socket multisets, and the
rarity scale. Parsing of user-written literals lives here; a bad literal is a domain error
(see the `error` module).

*/

use std::fmt::Write;

use crate::{
  core::format::{FormatStyle, Formattable},
  domain_error,
  error::{CompileError, CompileResult},
  impl_display_debug_for_formattable,
};

/// An RGBA display colour. Rendered in native syntax as four decimal components.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct Color {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Color {
  pub fn new(r: u8, g: u8, b: u8, a: u8) -> Color {
    Color { r, g, b, a }
  }

  /// Parses a hex colour literal of 3 (`rgb`), 4 (`rgba`), 6 (`rrggbb`), or 8 (`rrggbbaa`)
  /// digits. Single-digit channels are widened by repeating the nibble, so `f80` is `ff8800ff`.
  pub fn from_hex(hex: &str) -> CompileResult<Color> {
    let value = u32::from_str_radix(hex, 16)
        .map_err(|_| domain_error!("invalid hex color value: {:?}", hex))?;

    let widen = |nibble: u32| -> u8 { (nibble | (nibble << 4)) as u8 };

    match hex.len() {
      3 => Ok(Color::new(
        widen((value & 0xF00) >> 8),
        widen((value & 0x0F0) >> 4),
        widen(value & 0x00F),
        255,
      )),
      4 => Ok(Color::new(
        widen((value & 0xF000) >> 12),
        widen((value & 0x0F00) >> 8),
        widen((value & 0x00F0) >> 4),
        widen(value & 0x000F),
      )),
      6 => Ok(Color::new(
        ((value & 0xFF0000) >> 16) as u8,
        ((value & 0x00FF00) >> 8) as u8,
        (value & 0x0000FF) as u8,
        255,
      )),
      8 => Ok(Color::new(
        ((value & 0xFF000000) >> 24) as u8,
        ((value & 0x00FF0000) >> 16) as u8,
        ((value & 0x0000FF00) >> 8) as u8,
        (value & 0x000000FF) as u8,
      )),
      _ => Err(domain_error!("invalid hex color value: {:?}", hex)),
    }
  }
}

impl Formattable for Color {
  fn repr(&self, out: &mut dyn Write, _style: FormatStyle) -> std::fmt::Result {
    write!(out, "{} {} {} {}", self.r, self.g, self.b, self.a)
  }
}

impl_display_debug_for_formattable!(Color);

/// A multiset of coloured sockets. An item satisfies a socket-group condition when it has at
/// least this many linked sockets of each colour.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub struct SocketGroup {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub w: u8,
}

impl SocketGroup {
  pub fn new(r: u8, g: u8, b: u8, w: u8) -> SocketGroup {
    SocketGroup { r, g, b, w }
  }

  /// Parses a socket-letter string such as `RRGB`. Letters are case-insensitive; anything
  /// outside `rgbw` is a domain error.
  pub fn from_letters(sockets: &str) -> CompileResult<SocketGroup> {
    let mut group = SocketGroup::default();
    for letter in sockets.chars() {
      match letter {
        'r' | 'R' => group.r += 1,
        'g' | 'G' => group.g += 1,
        'b' | 'B' => group.b += 1,
        'w' | 'W' => group.w += 1,
        _ => {
          return Err(domain_error!("invalid socket color {:?} in {:?}", letter, sockets));
        }
      }
    }
    Ok(group)
  }

  pub fn total(&self) -> u32 {
    self.r as u32 + self.g as u32 + self.b as u32 + self.w as u32
  }

  /// Component-wise `<=`: `self` needs fewer or equal sockets of every colour.
  pub fn component_le(&self, other: &SocketGroup) -> bool {
    self.r <= other.r && self.g <= other.g && self.b <= other.b && self.w <= other.w
  }

  /// The component-wise maximum, i.e. the combined demand of two conditions on one item.
  pub fn component_max(&self, other: &SocketGroup) -> SocketGroup {
    SocketGroup {
      r: self.r.max(other.r),
      g: self.g.max(other.g),
      b: self.b.max(other.b),
      w: self.w.max(other.w),
    }
  }
}

impl Formattable for SocketGroup {
  fn repr(&self, out: &mut dyn Write, _style: FormatStyle) -> std::fmt::Result {
    for _ in 0..self.r { out.write_char('R')?; }
    for _ in 0..self.g { out.write_char('G')?; }
    for _ in 0..self.b { out.write_char('B')?; }
    for _ in 0..self.w { out.write_char('W')?; }
    Ok(())
  }
}

impl_display_debug_for_formattable!(SocketGroup);

/// The item rarity scale. Numeric `Rarity` conditions render these names in native syntax.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum Rarity {
  Normal = 1,
  Magic  = 2,
  Rare   = 3,
  Unique = 4,
}

impl Rarity {
  pub fn name_str(self) -> &'static str {
    match self {
      Rarity::Normal => "Normal",
      Rarity::Magic  => "Magic",
      Rarity::Rare   => "Rare",
      Rarity::Unique => "Unique",
    }
  }
}

impl TryFrom<i32> for Rarity {
  type Error = CompileError;

  fn try_from(value: i32) -> CompileResult<Rarity> {
    match value {
      1 => Ok(Rarity::Normal),
      2 => Ok(Rarity::Magic),
      3 => Ok(Rarity::Rare),
      4 => Ok(Rarity::Unique),
      _ => Err(domain_error!("rarity value {} out of range", value)),
    }
  }
}

impl Formattable for Rarity {
  fn repr(&self, out: &mut dyn Write, _style: FormatStyle) -> std::fmt::Result {
    out.write_str(self.name_str())
  }
}

impl_display_debug_for_formattable!(Rarity);
