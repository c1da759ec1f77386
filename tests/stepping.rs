// tests/stepping.rs
use glam::IVec2;
use rand::{SeedableRng, rngs::SmallRng};
use turmite::{Agent, Cell, Facing, Grid, Simulation, SimulationConfig, classic_table, parse, step};

fn seeded() -> SimulationConfig {
    SimulationConfig {
        rng_seed: Some(0xFACA_DE),
        ..Default::default()
    }
}

#[test]
fn classic_ant_first_two_ticks() {
    let table = parse("{0,0}[' ','*',L]\n{0,0}['*',' ',R]\n").unwrap();
    let mut grid = Grid::new();
    let mut agent = Agent::default();
    let mut rng = SmallRng::seed_from_u64(1);

    // Tick 1: blank under the turtle, turn South -> East, write '*', move to (1, 0).
    step(&mut agent, &table, &mut grid, &mut rng);
    assert_eq!(grid.read(IVec2::new(0, 0)), Cell { symbol: '*', tag: 1 });
    assert_eq!(agent.facing, Facing::East);
    assert_eq!(agent.position, IVec2::new(1, 0));

    // Tick 2: blank again, turn East -> North, write '*', move to (1, -1).
    step(&mut agent, &table, &mut grid, &mut rng);
    assert_eq!(grid.read(IVec2::new(1, 0)).symbol, '*');
    assert_eq!(agent.facing, Facing::North);
    assert_eq!(agent.position, IVec2::new(1, -1));
    assert_eq!(agent.state, "0");
}

#[test]
fn unmatched_pair_coasts_forward() {
    let table = parse("{other,0}[' ','*',L]").unwrap();
    let mut grid = Grid::new();
    let mut agent = Agent::default();
    let mut rng = SmallRng::seed_from_u64(1);

    for y in 1..=5 {
        step(&mut agent, &table, &mut grid, &mut rng);
        assert_eq!(agent.position, IVec2::new(0, y));
    }
    assert!(grid.is_empty());
    assert_eq!(agent.facing, Facing::South);
}

#[test]
fn state_transitions_follow_rules() {
    let table = parse("{a,b}[' ','x',S] {b,a}[' ','y',S]").unwrap();
    let mut grid = Grid::new();
    let mut agent = Agent::new("a", 4);
    let mut rng = SmallRng::seed_from_u64(1);

    for _ in 0..4 {
        step(&mut agent, &table, &mut grid, &mut rng);
    }
    let written: Vec<char> = (0..4).map(|y| grid.read(IVec2::new(0, y)).symbol).collect();
    assert_eq!(written, vec!['x', 'y', 'x', 'y']);
    assert_eq!(agent.state, "a");
    assert_eq!(grid.read(IVec2::new(0, 2)).tag, 4);
}

#[test]
fn later_turtles_see_earlier_writes_in_the_same_tick() {
    let mut sim = Simulation::with_programs(seeded(), [classic_table(), classic_table()]);
    sim.tick();

    // The first turtle wrote '*' at the origin; the second read it, turned right and erased it.
    let second = sim.agent(1).unwrap();
    assert_eq!(second.facing, Facing::West);
    assert_eq!(second.position, IVec2::new(-1, 0));
    assert_eq!(sim.grid().read(IVec2::ZERO), Cell { symbol: ' ', tag: 3 });
    assert_eq!(sim.agent(0).unwrap().position, IVec2::new(1, 0));
}

#[test]
fn seeded_runs_are_reproducible() {
    let table = parse(
        "{0,1}[' ','*',L]%2 {0,0}[' ','#',R] {1,0}['*',' ',S] {1,1}[' ','*',B]%3 \
         {0,0}['*','#',L] {0,1}['#',' ',R] {1,0}['#','*',L]",
    )
    .unwrap();
    let run = || {
        let mut sim = Simulation::with_programs(seeded(), [table.clone()]);
        sim.run(500);
        let agent = sim.agent(0).unwrap().clone();
        (agent, sim.grid().len())
    };
    assert_eq!(run(), run());
}

#[test]
fn classic_ant_builds_a_highway() {
    let mut sim = Simulation::classic(seeded());
    sim.run(12_000);
    // Langton's ant leaves its chaotic phase and walks off diagonally after roughly 10k steps.
    let pos = sim.agent(0).unwrap().position;
    assert!(pos.x.abs() + pos.y.abs() > 60, "ant still near origin at {pos}");
}
