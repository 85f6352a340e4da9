//! Interned file-system paths for cheap copying and O(1) identity comparison.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// An interned path string.
///
/// Node identity in the build tree is the interned absolute path, so two
/// lookups of the same file always yield the same `PathSym`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct PathSym(u32);

impl PathSym {
    /// Creates a `PathSym` from a raw `u32` index.
    ///
    /// Intended for tests. Normal code obtains symbols from [`Interner::intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this symbol.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `PathSym` wraps a `u32`, which always fits in `usize` on supported
// platforms. `try_from_usize` rejects values that do not fit in `u32`.
unsafe impl lasso::Key for PathSym {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(PathSym)
    }
}

/// Thread-safe string interner backed by [`lasso::ThreadedRodeo`].
pub struct Interner {
    rodeo: ThreadedRodeo<PathSym>,
}

impl Interner {
    /// Creates a new empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a string, returning the existing symbol if already present.
    pub fn intern(&self, s: &str) -> PathSym {
        self.rodeo.get_or_intern(s)
    }

    /// Looks up a string without interning it.
    pub fn get(&self, s: &str) -> Option<PathSym> {
        self.rodeo.get(s)
    }

    /// Resolves a symbol back to its string.
    ///
    /// # Panics
    ///
    /// Panics if the symbol was not created by this interner.
    pub fn resolve(&self, sym: PathSym) -> &str {
        self.rodeo.resolve(&sym)
    }

    /// Returns the number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
