//! Interned identifiers and case-insensitive names.
//!
//! QHDL follows the VHDL convention: identifiers keep the spelling the author
//! wrote, but two identifiers are the same name when they differ only in
//! letter case. A [`Name`] carries both the folded lookup key and the original
//! spelling, so symbol tables hash on the key while diagnostics and the
//! flattened graph report what the user typed.

use std::hash::{Hash, Hasher};

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

/// An interned string, represented as a `u32` index into the [`Interner`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Creates an `Ident` from a raw `u32` index.
    ///
    /// Intended for deserialization and tests. Regular code obtains
    /// identifiers from [`Interner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this identifier.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `Ident` wraps a `u32`, which always fits in a `usize` on supported
// targets. `try_from_usize` rejects indices that do not fit in `u32`.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// A declared name: the case-folded comparison key plus the spelling as written.
///
/// Equality and hashing only consider [`key`](Name::key), so `Beamsplitter`
/// and `BEAMSPLITTER` are the same name.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Name {
    /// The lowercase form used for lookups.
    pub key: Ident,
    /// The identifier exactly as it appeared in the source.
    pub spelling: Ident,
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// Thread-safe string interner backed by [`lasso::ThreadedRodeo`].
///
/// Shared by every parser thread and by the elaborator, so it must be `Sync`.
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates a new empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a string verbatim, returning its [`Ident`].
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Interns an identifier as a [`Name`], folding ASCII case for the key.
    pub fn intern_name(&self, s: &str) -> Name {
        let spelling = self.get_or_intern(s);
        Name {
            key: self.fold(s),
            spelling,
        }
    }

    /// Returns the case-folded lookup key for `s`.
    pub fn fold(&self, s: &str) -> Ident {
        if s.bytes().any(|b| b.is_ascii_uppercase()) {
            self.rodeo.get_or_intern(s.to_ascii_lowercase())
        } else {
            self.rodeo.get_or_intern(s)
        }
    }

    /// Resolves an [`Ident`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `Ident` was not created by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }

    /// Resolves the original spelling of a [`Name`].
    pub fn spelling(&self, name: Name) -> &str {
        self.resolve(name.spelling)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
