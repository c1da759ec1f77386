//! Random rule-set generators.
//!
//! Both generators name states `0..states` and draw symbols from a fixed
//! alphabet whose first character is the blank `' '`, so every generated
//! program can act on an empty grid. Their output renders through
//! [`Rule::to_source`] into text the parser accepts unmodified.

use crate::direction::Turn;
use crate::rule::Rule;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Alphabet for complete (deterministic) tables.
pub const COMPLETE_ALPHABET: &str = concat!(
    " abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "~!@#$%^&*()_+`1234567890-=[]\\{}|/.,?><';\":",
);

/// Alphabet for sparse tables.
pub const SPARSE_ALPHABET: &str = concat!(
    " ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz",
    "~-_%$#@!*&^=+:;/?<>.{}[]()0123456789`'\"",
);

/// Upper bound on the number of rules a single generator call may emit.
pub const MAX_RULES: usize = 1 << 20;

/// Parameters shared by both generators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of states, named `"0"` to `"states - 1"`.
    pub states: u32,
    /// How many leading characters of the alphabet are in play.
    pub symbols: usize,
    /// Sparse generator only: rules emitted per `(state, symbol)` pair, on average.
    pub fill_rate: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            states: 2,
            symbols: 5,
            fill_rate: 3.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum GeneratorError {
    #[error("at least one state is required")]
    NoStates,
    #[error("symbol count must be between 1 and {available}, got {requested}")]
    SymbolCount { requested: usize, available: usize },
    #[error("fill rate must be finite and non-negative, got {0}")]
    FillRate(f32),
    #[error("{requested} rules requested, at most {limit} allowed")]
    TooManyRules { requested: f64, limit: usize },
}

fn bounded_count(requested: f64) -> Result<usize, GeneratorError> {
    if requested > MAX_RULES as f64 {
        return Err(GeneratorError::TooManyRules {
            requested,
            limit: MAX_RULES,
        });
    }
    Ok(requested as usize)
}

impl GeneratorConfig {
    /// Checks the parameters against `alphabet`.
    pub fn validate(&self, alphabet: &str) -> Result<(), GeneratorError> {
        if self.states == 0 {
            return Err(GeneratorError::NoStates);
        }
        let available = alphabet.chars().count();
        if self.symbols == 0 || self.symbols > available {
            return Err(GeneratorError::SymbolCount {
                requested: self.symbols,
                available,
            });
        }
        if !self.fill_rate.is_finite() || self.fill_rate < 0.0 {
            return Err(GeneratorError::FillRate(self.fill_rate));
        }
        bounded_count(self.pairs())?;
        Ok(())
    }

    fn pairs(&self) -> f64 {
        f64::from(self.states) * self.symbols as f64
    }

    /// Number of rules [`sparse`] emits: `floor(states * symbols * fill_rate)`.
    pub fn sparse_rule_count(&self) -> Result<usize, GeneratorError> {
        bounded_count((self.pairs() * f64::from(self.fill_rate)).floor())
    }
}

fn random_turn<R: Rng + ?Sized>(rng: &mut R) -> Turn {
    Turn::ALL[rng.random_range(0..Turn::ALL.len())]
}

fn random_state<R: Rng + ?Sized>(rng: &mut R, states: u32) -> String {
    rng.random_range(0..states).to_string()
}

fn pick<R: Rng + ?Sized>(rng: &mut R, alphabet: &[char]) -> char {
    alphabet[rng.random_range(0..alphabet.len())]
}

/// One rule for every `(state, symbol)` pair, so exactly one rule ever applies.
///
/// Target state, written symbol, and turn are drawn uniformly.
pub fn complete<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<Rule>, GeneratorError> {
    config.validate(COMPLETE_ALPHABET)?;
    let alphabet: Vec<char> = COMPLETE_ALPHABET.chars().take(config.symbols).collect();

    let mut rules = Vec::with_capacity(config.states as usize * alphabet.len());
    for state in 0..config.states {
        for &read in &alphabet {
            let target = random_state(rng, config.states);
            let write = pick(rng, &alphabet);
            rules.push(Rule::new(state.to_string(), target, read, write, random_turn(rng)));
        }
    }
    Ok(rules)
}

/// `floor(states * symbols * fill_rate)` independent random rules.
///
/// Keys may repeat (nondeterminism) or be missing (the turtle coasts). The
/// first rule always reads the blank symbol.
pub fn sparse<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Vec<Rule>, GeneratorError> {
    config.validate(SPARSE_ALPHABET)?;
    let alphabet: Vec<char> = SPARSE_ALPHABET.chars().take(config.symbols).collect();
    let count = config.sparse_rule_count()?;

    let mut rules = Vec::with_capacity(count);
    for i in 0..count {
        let source = random_state(rng, config.states);
        let target = random_state(rng, config.states);
        let read = if i == 0 { ' ' } else { pick(rng, &alphabet) };
        let write = pick(rng, &alphabet);
        rules.push(Rule::new(source, target, read, write, random_turn(rng)));
    }
    Ok(rules)
}

/// Renders rules one per line.
pub fn to_source(rules: &[Rule]) -> String {
    rules.iter().map(|r| r.to_source() + "\n").collect()
}
