//! Diagnostic codes with stage prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The pipeline stage a diagnostic originates from, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Input validation of boards, netlists, and initial placements, prefixed with `I`.
    Input,
    /// Simulated annealing over cluster boxes, prefixed with `A`.
    Anneal,
    /// Realization of boxes into exact cell assignments, prefixed with `L`.
    Legalize,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Input => 'I',
            Category::Anneal => 'A',
            Category::Legalize => 'L',
        }
    }
}

/// A stage prefix plus a numeric identifier, displayed as e.g. `L002`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The stage this diagnostic belongs to.
    pub category: Category,
    /// The numeric identifier within the stage.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
