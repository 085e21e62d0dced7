//! Eye identifiers.

use serde::{Deserialize, Serialize};

/// One of the two eyes of a head-mounted display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Eye {
    /// Left eye, always rendered first.
    Left,
    /// Right eye.
    Right,
}

impl Eye {
    /// Both eyes in render order.
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    /// Returns the index of this eye (0 = left, 1 = right).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Eye::Left => 0,
            Eye::Right => 1,
        }
    }

    /// Returns display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Eye::Left => "left",
            Eye::Right => "right",
        }
    }

    /// Returns -1 for the left eye and +1 for the right eye.
    #[must_use]
    pub fn side(self) -> f32 {
        match self {
            Eye::Left => -1.0,
            Eye::Right => 1.0,
        }
    }
}

impl std::fmt::Display for Eye {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
