/*!

The inclusive value ranges the game engine accepts, per attribute, plus the defaults used when an
argument is omitted upstream. Requesting a limit for a name that has none is an internal error;
the table is the single source of truth for what is range-checked.

*/

use once_cell::sync::Lazy;
use sift_abs::HashMap;

use crate::{error::CompileResult, internal_error};

static LIMITS: Lazy<HashMap<&'static str, (i32, i32)>> = Lazy::new(|| {
  let mut limits = HashMap::new();
  // Item attributes
  limits.insert("ItemLevel", (1, 100));
  limits.insert("DropLevel", (1, 100));
  limits.insert("Quality", (0, 30));
  limits.insert("Sockets", (0, 6)); // 0 is legal: some uniques have no sockets at all
  limits.insert("LinkedSockets", (0, 6));
  limits.insert("Height", (1, 4));
  limits.insert("Width", (1, 2));
  limits.insert("StackSize", (1, 1000));
  limits.insert("GemLevel", (1, 21));
  limits.insert("Rarity", (1, 4)); // Normal, Magic, Rare, Unique
  limits.insert("MapTier", (1, 16));
  // Action arguments
  limits.insert("SetFontSize", (17, 45));
  limits.insert("Color", (0, 255));
  limits.insert("Volume", (0, 300));
  limits.insert("MinimapIcon", (0, 2));
  limits
});

static DEFAULTS: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
  let mut defaults = HashMap::new();
  defaults.insert("Color", 255);
  defaults.insert("Volume", 300);
  defaults.insert("FontSize", 33);
  defaults
});

/// The inclusive range for `name`, or `None` when the attribute is not range-checked.
pub fn range(name: &str) -> Option<(i32, i32)> {
  LIMITS.get(name).copied()
}

pub fn minimum(name: &str) -> CompileResult<i32> {
  range(name)
      .map(|(minimum, _)| minimum)
      .ok_or_else(|| internal_error!("requesting unknown limit value of {}", name))
}

pub fn maximum(name: &str) -> CompileResult<i32> {
  range(name)
      .map(|(_, maximum)| maximum)
      .ok_or_else(|| internal_error!("requesting unknown limit value of {}", name))
}

pub fn default_value(name: &str) -> CompileResult<i32> {
  DEFAULTS.get(name)
          .copied()
          .ok_or_else(|| internal_error!("requesting unknown default value of {}", name))
}

/// The most linked sockets an item can have; socket-group conditions demanding more match
/// nothing.
pub fn socket_cap() -> u32 {
  6
}
