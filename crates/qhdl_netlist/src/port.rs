//! Port directions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a port as seen from outside its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Receives a signal.
    In,
    /// Drives a signal.
    Out,
}

impl Direction {
    /// The opposite direction.
    ///
    /// Inside an architecture, the entity's own `in` ports act as sources
    /// and its `out` ports as sinks, the reverse of how an instance sees them.
    pub fn flip(self) -> Direction {
        match self {
            Direction::In => Direction::Out,
            Direction::Out => Direction::In,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::In => "in",
            Direction::Out => "out",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_and_display() {
        assert_eq!(Direction::In.flip(), Direction::Out);
        assert_eq!(Direction::Out.flip().flip(), Direction::Out);
        assert_eq!(Direction::In.to_string(), "in");
        assert_eq!(serde_json::to_string(&Direction::Out).unwrap(), "\"out\"");
    }
}
