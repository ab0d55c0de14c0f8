#![forbid(unsafe_code)]

//! Arrow-key directions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in a stable order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// True for Up/Down.
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// True for Up/Left: candidates are scanned by descending id.
    ///
    /// Hosts hand out ids in draw order, so controls above or to the left of
    /// the focused one normally carry smaller ids.
    #[inline]
    pub const fn scans_descending(self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }

    /// Stable lowercase name used in logs and fixtures.
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
