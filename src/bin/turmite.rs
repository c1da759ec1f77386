use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{SeedableRng, rngs::SmallRng};
use tracing::{info, warn};
use turmite::generator::{self, GeneratorConfig};
use turmite::{Simulation, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "turmite", version, about = "Run and generate turtle automata")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run rule files headlessly and report where every turtle ended up.
    Run {
        /// Rule files, one turtle each. With none, runs the classic two-rule ant.
        files: Vec<PathBuf>,
        /// Number of ticks to simulate.
        #[arg(short, long, default_value_t = 1000)]
        ticks: u64,
        /// RNG seed for reproducible runs.
        #[arg(long, env = "TURMITE_SEED")]
        seed: Option<u64>,
        /// Print each program's rules before running.
        #[arg(long)]
        show_rules: bool,
    },
    /// Print a random rule set to stdout.
    Generate {
        #[arg(value_enum, default_value_t = Mode::Complete)]
        mode: Mode,
        /// Number of states.
        #[arg(short = 'n', long, default_value_t = 2)]
        states: u32,
        /// Number of symbols drawn from the alphabet.
        #[arg(short, long, default_value_t = 5)]
        symbols: usize,
        /// Sparse mode: rules per (state, symbol) pair.
        #[arg(short, long, default_value_t = 3.0)]
        fill_rate: f32,
        /// RNG seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Exactly one rule per (state, symbol) pair.
    Complete,
    /// Random rules that may overlap or leave gaps.
    Sparse,
}

fn main() -> Result<()> {
    init_tracing();
    match Cli::parse().command {
        Command::Run {
            files,
            ticks,
            seed,
            show_rules,
        } => run(files, ticks, seed, show_rules),
        Command::Generate {
            mode,
            states,
            symbols,
            fill_rate,
            seed,
        } => {
            let config = GeneratorConfig {
                states,
                symbols,
                fill_rate,
            };
            generate(mode, &config, seed)
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn run(files: Vec<PathBuf>, ticks: u64, seed: Option<u64>, show_rules: bool) -> Result<()> {
    let config = SimulationConfig {
        rng_seed: seed,
        ..SimulationConfig::default()
    };

    let mut sim = if files.is_empty() {
        warn!("no rule files given; running the classic ant");
        Simulation::classic(config)
    } else {
        let programs = files
            .iter()
            .map(|path| turmite::load(path).with_context(|| format!("loading {}", path.display())))
            .collect::<Result<Vec<_>>>()?;
        Simulation::with_programs(config, programs)
    };

    if show_rules {
        for (i, binding) in sim.bindings().iter().enumerate() {
            println!("turtle {i} (tag {}):", binding.agent.tag);
            for rule in binding.table.rules() {
                println!("  {rule}");
            }
        }
    }

    info!(turtles = sim.len(), ticks, "starting run");
    sim.run(ticks);

    for (i, binding) in sim.bindings().iter().enumerate() {
        println!(
            "turtle {i}: {} facing {:?}",
            binding.agent.describe(),
            binding.agent.facing
        );
    }
    match sim.grid().bounds() {
        Some((lo, hi)) => println!(
            "{} cells written, spanning ({}, {}) to ({}, {})",
            sim.grid().len(),
            lo.x,
            lo.y,
            hi.x,
            hi.y
        ),
        None => println!("no cells written"),
    }
    Ok(())
}

fn generate(mode: Mode, config: &GeneratorConfig, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::seed_from_u64(rand::random()),
    };
    let rules = match mode {
        Mode::Complete => generator::complete(config, &mut rng),
        Mode::Sparse => generator::sparse(config, &mut rng),
    }
    .context("invalid generator parameters")?;
    print!("{}", generator::to_source(&rules));
    Ok(())
}
