//! Error types for the engine boundary.

use derive_more::{Display, Error};

/// A cell index outside 0-8 reached the engine.
///
/// Front ends map pointer or key input onto cells and should never produce
/// this; it marks a broken caller rather than a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Cell index {} is out of range (must be 0-8)", index)]
pub struct ValidationError {
    /// The rejected index.
    pub index: usize,
}

impl ValidationError {
    /// Creates a validation error for the given index.
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}
