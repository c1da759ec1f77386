//! A single transition clause and its textual forms.

use crate::direction::Turn;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Relative likelihood of a rule among rules sharing the same `(state, symbol)` key.
pub type Weight = u32;

/// Errors raised while constructing a [`Rule`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Weighted selection needs every candidate to be acceptable with non-zero probability.
    #[error("rule weight must be at least 1, got {0}")]
    InvalidWeight(Weight),
}

/// One clause of the transition function:
/// `f(source_state, read_symbol) = (target_state, write_symbol, turn) % weight`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleRecord", into = "RuleRecord")]
pub struct Rule {
    pub source_state: String,
    pub target_state: String,
    pub read_symbol: char,
    pub write_symbol: char,
    pub turn: Turn,
    weight: Weight,
}

impl Rule {
    /// Creates a rule with the default weight of 1.
    pub fn new(
        source_state: impl Into<String>,
        target_state: impl Into<String>,
        read_symbol: char,
        write_symbol: char,
        turn: Turn,
    ) -> Self {
        Self {
            source_state: source_state.into(),
            target_state: target_state.into(),
            read_symbol,
            write_symbol,
            turn,
            weight: 1,
        }
    }

    /// Replaces the weight, rejecting zero (builder pattern).
    pub fn with_weight(mut self, weight: Weight) -> Result<Self, RuleError> {
        if weight == 0 {
            return Err(RuleError::InvalidWeight(weight));
        }
        self.weight = weight;
        Ok(self)
    }

    /// Always `>= 1`.
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Renders the rule in the rule-description grammar accepted by [`crate::parse`].
    ///
    /// The weight suffix is omitted when it is the default.
    pub fn to_source(&self) -> String {
        let mut out = format!(
            "{{{},{}}}['{}','{}',{}]",
            self.source_state,
            self.target_state,
            self.read_symbol,
            self.write_symbol,
            self.turn.code()
        );
        if self.weight != 1 {
            out.push_str(&format!("%{}", self.weight));
        }
        out
    }
}

/// Unchecked wire form; deserialization goes through [`Rule::with_weight`].
#[derive(Serialize, Deserialize)]
struct RuleRecord {
    source_state: String,
    target_state: String,
    read_symbol: char,
    write_symbol: char,
    turn: Turn,
    #[serde(default = "default_weight")]
    weight: Weight,
}

fn default_weight() -> Weight {
    1
}

impl TryFrom<RuleRecord> for Rule {
    type Error = RuleError;

    fn try_from(r: RuleRecord) -> Result<Self, Self::Error> {
        Rule::new(
            r.source_state,
            r.target_state,
            r.read_symbol,
            r.write_symbol,
            r.turn,
        )
        .with_weight(r.weight)
    }
}

impl From<Rule> for RuleRecord {
    fn from(r: Rule) -> Self {
        Self {
            source_state: r.source_state,
            target_state: r.target_state,
            read_symbol: r.read_symbol,
            write_symbol: r.write_symbol,
            turn: r.turn,
            weight: r.weight,
        }
    }
}

/// Short readable form, e.g. `' '->'*' L 0->0`.
impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}'->'{}' {} {}->{}",
            self.read_symbol,
            self.write_symbol,
            self.turn.code(),
            self.source_state,
            self.target_state
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_weight_is_rejected() {
        let r = Rule::new("0", "1", ' ', '*', Turn::Left);
        assert_eq!(r.with_weight(0), Err(RuleError::InvalidWeight(0)));
    }

    #[test]
    fn default_weight_is_one() {
        let r = Rule::new("0", "1", ' ', '*', Turn::Left);
        assert_eq!(r.weight(), 1);
        assert_eq!(r.to_source(), "{0,1}[' ','*',L]");
    }

    #[test]
    fn weight_suffix_is_rendered() {
        let r = Rule::new("a", "b", 'x', 'y', Turn::Backward)
            .with_weight(7)
            .unwrap();
        assert_eq!(r.to_source(), "{a,b}['x','y',B]%7");
        assert_eq!(r.to_string(), "'x'->'y' B a->b");
    }
}
