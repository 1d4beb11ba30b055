/*!

Types/type aliases that abstract over the implementing backing type.

A motivating example is the `IString` type, an interned string type. A number of external crates
could provide this functionality. This module redirects to whatever chosen implementation we want.
To use the [`string_cache` crate](https://crates.io/crates/string_cache), we just define `IString`
as an alias for `string_cache::DefaultAtom`:

```ignore
pub use string_cache::DefaultAtom as IString;
```

For infrastructure with very different backing implementations, we define an abstraction layer
over the implementation. The `log` module could use any of a number of logging frameworks for its
implementation, but its public interface consists only of `set_global_logging_threshold()` /
`get_global_logging_threshold()` and the macros `critical!`, `error!`, `warning!`, `info!`,
`debug!`, and `trace!`.

*/

pub mod log;

// region Hashing data structures
pub use std::collections::{HashMap, HashSet};

// For vectors that are expected to have few or zero elements.
pub use smallvec::{smallvec, SmallVec};
// endregion

// Logging
pub use tracing;

// Interned string. `DefaultAtom` is a global cache that can be used across threads.
pub use string_cache::DefaultAtom as IString;
