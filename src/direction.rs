//! Absolute facings, relative turns, and the rotation table between them.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An absolute compass facing on the grid.
///
/// Screen convention: `North` decreases `y`, `South` increases it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

/// A rotation relative to the current facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    /// -90 degrees.
    Left,
    /// +90 degrees.
    Right,
    /// Keep the current facing.
    Straight,
    /// 180 degrees.
    Backward,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::North, Facing::East, Facing::South, Facing::West];

    /// Applies `turn` to this facing.
    pub fn rotate(self, turn: Turn) -> Facing {
        match (turn, self) {
            (Turn::Straight, f) => f,

            (Turn::Left, Facing::North) => Facing::West,
            (Turn::Left, Facing::East) => Facing::North,
            (Turn::Left, Facing::South) => Facing::East,
            (Turn::Left, Facing::West) => Facing::South,

            (Turn::Right, Facing::North) => Facing::East,
            (Turn::Right, Facing::East) => Facing::South,
            (Turn::Right, Facing::South) => Facing::West,
            (Turn::Right, Facing::West) => Facing::North,

            (Turn::Backward, Facing::North) => Facing::South,
            (Turn::Backward, Facing::East) => Facing::West,
            (Turn::Backward, Facing::South) => Facing::North,
            (Turn::Backward, Facing::West) => Facing::East,
        }
    }

    /// Unit movement vector for one step in this facing.
    pub fn offset(self) -> IVec2 {
        match self {
            Facing::North => IVec2::new(0, -1),
            Facing::South => IVec2::new(0, 1),
            Facing::East => IVec2::new(1, 0),
            Facing::West => IVec2::new(-1, 0),
        }
    }
}

impl Turn {
    pub const ALL: [Turn; 4] = [Turn::Left, Turn::Right, Turn::Straight, Turn::Backward];

    /// Parses a single-letter direction code (`L`, `R`, `S`, `B`, any case).
    pub fn from_code(code: char) -> Option<Turn> {
        match code.to_ascii_uppercase() {
            'L' => Some(Turn::Left),
            'R' => Some(Turn::Right),
            'S' => Some(Turn::Straight),
            'B' => Some(Turn::Backward),
            _ => None,
        }
    }

    /// The canonical upper-case letter used in rule text.
    pub fn code(self) -> char {
        match self {
            Turn::Left => 'L',
            Turn::Right => 'R',
            Turn::Straight => 'S',
            Turn::Backward => 'B',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_twice_is_identity() {
        for f in Facing::ALL {
            assert_eq!(f.rotate(Turn::Backward).rotate(Turn::Backward), f);
        }
    }

    #[test]
    fn left_and_right_cancel() {
        for f in Facing::ALL {
            assert_eq!(f.rotate(Turn::Left).rotate(Turn::Right), f);
            assert_eq!(f.rotate(Turn::Right).rotate(Turn::Left), f);
        }
    }

    #[test]
    fn four_rights_make_a_full_circle() {
        for f in Facing::ALL {
            let mut g = f;
            for _ in 0..4 {
                g = g.rotate(Turn::Right);
            }
            assert_eq!(g, f);
        }
    }

    #[test]
    fn rotation_matches_offsets() {
        // Right is a clockwise quarter turn in screen space: (x, y) -> (-y, x).
        for f in Facing::ALL {
            let v = f.offset();
            assert_eq!(f.rotate(Turn::Right).offset(), IVec2::new(-v.y, v.x));
            assert_eq!(f.rotate(Turn::Backward).offset(), -v);
        }
    }

    #[test]
    fn direction_codes_are_case_insensitive() {
        for t in Turn::ALL {
            assert_eq!(Turn::from_code(t.code()), Some(t));
            assert_eq!(Turn::from_code(t.code().to_ascii_lowercase()), Some(t));
        }
        assert_eq!(Turn::from_code('x'), None);
    }
}
