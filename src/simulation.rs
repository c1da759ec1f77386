//! The simulation driver: one shared grid, many turtles, one seeded RNG.
//!
//! The entry point is [`Simulation`]. Configure it with a [`SimulationConfig`],
//! bind turtles to programs with [`Simulation::spawn`] (or build a populated one
//! with [`Simulation::classic`] / [`Simulation::with_programs`]), then call
//! [`Simulation::tick`] as often as wanted.

use crate::direction::Turn;
use crate::grid::{Grid, Tag};
use crate::rule::Rule;
use crate::table::TransitionTable;
use crate::turtle::{Agent, INITIAL_STATE, step};
use rand::{SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Configuration for a simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for rule selection. `None` draws a seed from entropy.
    pub rng_seed: Option<u64>,
    /// State that newly spawned and reset turtles start in.
    pub initial_state: String,
    /// Tag of the turtle created by [`Simulation::classic`].
    pub default_tag: Tag,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            initial_state: INITIAL_STATE.to_owned(),
            default_tag: 1,
        }
    }
}

impl SimulationConfig {
    fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::seed_from_u64(rand::random()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no turtle with index {0}")]
    NoSuchAgent(usize),
}

/// A turtle together with the program it runs.
///
/// Programs are shared read-only; forking a turtle shares its table rather than copying it.
#[derive(Clone, Debug)]
pub struct Binding {
    pub agent: Agent,
    pub table: Arc<TransitionTable>,
}

/// The two-rule ant used when no program is supplied.
pub fn classic_table() -> TransitionTable {
    TransitionTable::from_rules(vec![
        Rule::new("0", "0", ' ', '*', Turn::Left),
        Rule::new("0", "0", '*', ' ', Turn::Right),
    ])
}

/// Owns the grid and every turtle, and steps them in a fixed order.
pub struct Simulation {
    config: SimulationConfig,
    grid: Grid,
    bindings: Vec<Binding>,
    rng: SmallRng,
    tick: u64,
}

impl Simulation {
    /// An empty world with no turtles.
    pub fn new(config: SimulationConfig) -> Self {
        let rng = config.seeded_rng();
        Self {
            config,
            grid: Grid::new(),
            bindings: Vec::new(),
            rng,
            tick: 0,
        }
    }

    /// A world with a single turtle running [`classic_table`].
    pub fn classic(config: SimulationConfig) -> Self {
        let tag = config.default_tag;
        let mut sim = Self::new(config);
        sim.spawn(Arc::new(classic_table()), tag);
        sim
    }

    /// One turtle per program; the turtle running program `i` gets tag `i + 2`.
    pub fn with_programs(
        config: SimulationConfig,
        programs: impl IntoIterator<Item = TransitionTable>,
    ) -> Self {
        let mut sim = Self::new(config);
        for (i, table) in programs.into_iter().enumerate() {
            let tag = Tag::try_from(i + 2).unwrap_or(Tag::MAX);
            sim.spawn(Arc::new(table), tag);
        }
        sim
    }

    /// Adds a turtle at the origin bound to `table`; returns its index.
    pub fn spawn(&mut self, table: Arc<TransitionTable>, tag: Tag) -> usize {
        let agent = Agent::new(self.config.initial_state.clone(), tag);
        debug!(tag, rules = table.len(), "spawned turtle");
        self.bindings.push(Binding { agent, table });
        self.bindings.len() - 1
    }

    /// Duplicates turtle `index`, turned left, running the same program.
    pub fn fork(&mut self, index: usize) -> Result<usize, SimulationError> {
        let source = self
            .bindings
            .get(index)
            .ok_or(SimulationError::NoSuchAgent(index))?;
        let copy = Binding {
            agent: source.agent.forked(),
            table: Arc::clone(&source.table),
        };
        debug!(from = index, facing = ?copy.agent.facing, "forked turtle");
        self.bindings.push(copy);
        Ok(self.bindings.len() - 1)
    }

    /// Steps every turtle once, in index order.
    ///
    /// The grid is not snapshotted: a turtle sees what earlier turtles wrote in the same tick.
    pub fn tick(&mut self) {
        for Binding { agent, table } in &mut self.bindings {
            step(agent, table, &mut self.grid, &mut self.rng);
        }
        self.tick += 1;
    }

    /// Runs `ticks` ticks.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
        debug!(tick = self.tick, cells = self.grid.len(), "run finished");
    }

    /// Clears the grid and returns every turtle to the origin. Programs and tags are kept.
    pub fn reset(&mut self) {
        self.grid.clear();
        for binding in &mut self.bindings {
            binding.agent.reset(&self.config.initial_state);
        }
        self.tick = 0;
        debug!(turtles = self.bindings.len(), "reset simulation");
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn agent(&self, index: usize) -> Option<&Agent> {
        self.bindings.get(index).map(|b| &b.agent)
    }

    pub fn agent_mut(&mut self, index: usize) -> Option<&mut Agent> {
        self.bindings.get_mut(index).map(|b| &mut b.agent)
    }

    pub fn table(&self, index: usize) -> Option<&Arc<TransitionTable>> {
        self.bindings.get(index).map(|b| &b.table)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Ticks elapsed since creation or the last reset.
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Facing;
    use glam::IVec2;

    fn seeded() -> SimulationConfig {
        SimulationConfig {
            rng_seed: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn programs_get_sequential_tags() {
        let sim = Simulation::with_programs(seeded(), [classic_table(), classic_table()]);
        let tags: Vec<Tag> = sim.bindings().iter().map(|b| b.agent.tag).collect();
        assert_eq!(tags, vec![2, 3]);
    }

    #[test]
    fn fork_shares_the_program() {
        let mut sim = Simulation::classic(seeded());
        let i = sim.fork(0).unwrap();
        assert_eq!(i, 1);
        assert!(Arc::ptr_eq(sim.table(0).unwrap(), sim.table(1).unwrap()));
        assert_eq!(sim.agent(1).unwrap().facing, Facing::East);
        assert!(matches!(sim.fork(7), Err(SimulationError::NoSuchAgent(7))));
    }

    #[test]
    fn reset_clears_grid_and_turtles() {
        let mut sim = Simulation::classic(seeded());
        sim.run(50);
        assert!(!sim.grid().is_empty());
        sim.reset();
        assert!(sim.grid().is_empty());
        assert_eq!(sim.ticks(), 0);
        let a = sim.agent(0).unwrap();
        assert_eq!(a.position, IVec2::ZERO);
        assert_eq!(a.facing, Facing::South);
        assert_eq!(a.tag, 1);
    }

    #[test]
    fn reset_uses_configured_initial_state() {
        let config = SimulationConfig {
            initial_state: "start".into(),
            ..seeded()
        };
        let mut sim = Simulation::with_programs(config, [classic_table()]);
        sim.agent_mut(0).unwrap().state = "elsewhere".into();
        sim.reset();
        assert_eq!(sim.agent(0).unwrap().state, "start");
        assert_eq!(sim.agent(0).unwrap().tag, 2);
    }
}
