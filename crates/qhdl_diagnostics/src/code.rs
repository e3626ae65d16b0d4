//! Stable diagnostic codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix family of a [`DiagnosticCode`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// `E` codes.
    Error,
    /// `W` codes.
    Warning,
}

impl Category {
    /// The prefix letter.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
        }
    }
}

/// A code such as `E402` identifying one kind of problem.
///
/// The hundreds digit groups codes by stage: 1 syntax, 2 names and structure,
/// 3 generics, 4 connectivity, 5 hierarchy and net validation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// Prefix family.
    pub category: Category,
    /// Numeric part.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }

    /// The same number under the `W` prefix.
    ///
    /// Used for checks whose severity is configurable, so `E401` becomes
    /// `W401` when reported as a warning.
    pub const fn as_warning(self) -> Self {
        Self {
            category: Category::Warning,
            number: self.number,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
