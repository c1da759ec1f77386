//! Turtle state and the single-tick stepping rule.

use crate::direction::{Facing, Turn};
use crate::grid::{Grid, Tag};
use crate::table::TransitionTable;
use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// State name every turtle starts in.
pub const INITIAL_STATE: &str = "0";

/// The moving cursor of the automaton.
///
/// Tracks where the turtle stands, which way it faces, and which automaton
/// state it is in. The tag is stamped onto every cell it writes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Current grid coordinate.
    pub position: IVec2,

    /// Absolute facing; the next move goes one cell this way.
    pub facing: Facing,

    /// Name of the current automaton state.
    pub state: String,

    /// Visual tag written alongside every symbol.
    pub tag: Tag,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(INITIAL_STATE, 1)
    }
}

impl Agent {
    /// A turtle at the origin facing South.
    pub fn new(initial_state: impl Into<String>, tag: Tag) -> Self {
        Self {
            position: IVec2::ZERO,
            facing: Facing::South,
            state: initial_state.into(),
            tag,
        }
    }

    /// Returns to the origin, facing South, in `initial_state`. The tag is kept.
    pub fn reset(&mut self, initial_state: &str) {
        *self = Self::new(initial_state, self.tag);
    }

    /// A copy of this turtle that has turned left, so the two diverge from here.
    pub fn forked(&self) -> Self {
        Self {
            facing: self.facing.rotate(Turn::Left),
            ..self.clone()
        }
    }

    /// Brief status line, e.g. `3,-1: q0`.
    pub fn describe(&self) -> String {
        format!("{},{}: {}", self.position.x, self.position.y, self.state)
    }
}

/// Advances `agent` by one tick over `grid` according to `table`.
///
/// If a rule matches the current `(state, symbol)` the turtle turns, changes
/// state, and writes the rule's symbol under itself with its own tag. With no
/// matching rule nothing changes. Either way it then moves one cell along its
/// (possibly new) facing.
pub fn step<R: Rng + ?Sized>(
    agent: &mut Agent,
    table: &TransitionTable,
    grid: &mut Grid,
    rng: &mut R,
) {
    let symbol = grid.read(agent.position).symbol;

    if let Ok(rule) = table.resolve(&agent.state, symbol, rng) {
        trace!(tag = agent.tag, at = ?agent.position, %rule, "rule fired");
        agent.facing = agent.facing.rotate(rule.turn);
        agent.state.clone_from(&rule.target_state);
        grid.write(agent.position, rule.write_symbol, agent.tag);
    } else {
        trace!(tag = agent.tag, at = ?agent.position, state = %agent.state, ?symbol, "no rule");
    }

    agent.position = agent.position.wrapping_add(agent.facing.offset());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::rule::Rule;
    use rand::{SeedableRng, rngs::SmallRng};

    #[test]
    fn default_turtle_starts_at_origin_facing_south() {
        let t = Agent::default();
        assert_eq!(t.position, IVec2::ZERO);
        assert_eq!(t.facing, Facing::South);
        assert_eq!(t.state, "0");
        assert_eq!(t.tag, 1);
    }

    #[test]
    fn reset_keeps_tag() {
        let mut t = Agent::new("q", 5);
        t.position = IVec2::new(4, 4);
        t.facing = Facing::West;
        t.reset(INITIAL_STATE);
        assert_eq!(t, Agent::new("0", 5));
        t.reset("start");
        assert_eq!(t, Agent::new("start", 5));
    }

    #[test]
    fn fork_turns_left() {
        let t = Agent::new("a", 2);
        let f = t.forked();
        assert_eq!(f.facing, Facing::East);
        assert_eq!(f.state, "a");
        assert_eq!(f.position, t.position);
    }

    #[test]
    fn unmatched_step_only_moves() {
        let table = TransitionTable::from_rules(vec![Rule::new("1", "1", ' ', '*', Turn::Left)]);
        let mut grid = Grid::new();
        grid.write(IVec2::ZERO, '#', 9);
        let mut t = Agent::default();
        let mut rng = SmallRng::seed_from_u64(0);

        step(&mut t, &table, &mut grid, &mut rng);

        assert_eq!(grid.read(IVec2::ZERO), Cell { symbol: '#', tag: 9 });
        assert_eq!(t.position, IVec2::new(0, 1));
        assert_eq!(t.facing, Facing::South);
        assert_eq!(t.state, "0");
    }

    #[test]
    fn position_wraps_at_the_coordinate_edge() {
        let table = TransitionTable::new();
        let mut grid = Grid::new();
        let mut t = Agent::default();
        t.position = IVec2::new(0, i32::MAX);
        let mut rng = SmallRng::seed_from_u64(0);

        step(&mut t, &table, &mut grid, &mut rng);

        assert_eq!(t.position, IVec2::new(0, i32::MIN));
    }

    #[test]
    fn describe_formats_position_and_state() {
        let mut t = Agent::new("q0", 1);
        t.position = IVec2::new(3, -1);
        assert_eq!(t.describe(), "3,-1: q0");
    }
}
