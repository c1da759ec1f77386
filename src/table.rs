//! The transition table: an ordered rule list plus its `(state, symbol)` index.
//!
//! State names are interned into small integer ids when the index is built, so
//! lookups hash an integer pair instead of a string. The text form is kept on
//! each [`Rule`] for display.

use crate::rule::Rule;
use rand::Rng;
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

/// Interned identifier of a state name within one table.
pub type StateId = u32;

/// No rule is registered for the requested `(state, symbol)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("no rule for state {state:?} reading {symbol:?}")]
pub struct LookupError {
    pub state: String,
    pub symbol: char,
}

/// An ordered set of [`Rule`]s with a derived lookup index.
///
/// Rule order is file order and only matters for display. The index is rebuilt
/// by every method that changes the rule list, so it can never go stale.
#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    rules: Vec<Rule>,
    state_ids: HashMap<String, StateId>,
    index: HashMap<(StateId, char), Vec<usize>>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from rules in the given order.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        let mut table = Self {
            rules,
            ..Default::default()
        };
        table.build_index();
        table
    }

    /// Appends one rule.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
        self.build_index();
    }

    /// Appends many rules, rebuilding the index once.
    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) {
        self.rules.extend(rules);
        self.build_index();
    }

    fn build_index(&mut self) {
        self.state_ids.clear();
        self.index.clear();
        for (i, rule) in self.rules.iter().enumerate() {
            let next = self.state_ids.len() as StateId;
            let id = *self
                .state_ids
                .entry(rule.source_state.clone())
                .or_insert(next);
            self.index.entry((id, rule.read_symbol)).or_default().push(i);
        }
        debug!(
            rules = self.rules.len(),
            states = self.state_ids.len(),
            keys = self.index.len(),
            "built transition index"
        );
    }

    fn candidates(&self, state: &str, symbol: char) -> Option<&[usize]> {
        let id = self.state_ids.get(state)?;
        self.index
            .get(&(*id, symbol))
            .map(Vec::as_slice)
            .filter(|c| !c.is_empty())
    }

    /// Whether any rule applies to `(state, symbol)`.
    pub fn has(&self, state: &str, symbol: char) -> bool {
        self.candidates(state, symbol).is_some()
    }

    /// Picks one of the rules matching `(state, symbol)`.
    ///
    /// Among several matches the choice is made by rejection sampling: draw a
    /// candidate uniformly, then accept it if a uniform draw from
    /// `[0, total_weight)` falls below its weight; otherwise start over. A single
    /// match is always accepted on the first round.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        state: &str,
        symbol: char,
        rng: &mut R,
    ) -> Result<&Rule, LookupError> {
        let candidates = self.candidates(state, symbol).ok_or_else(|| LookupError {
            state: state.to_owned(),
            symbol,
        })?;

        let total_weight: u64 = candidates
            .iter()
            .map(|&i| u64::from(self.rules[i].weight()))
            .sum();

        loop {
            let pick = candidates[rng.random_range(0..candidates.len())];
            let rule = &self.rules[pick];
            if rng.random_range(0..total_weight) < u64::from(rule.weight()) {
                return Ok(rule);
            }
        }
    }

    /// Rules in load order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct source states, in order of first appearance.
    pub fn state_count(&self) -> usize {
        self.state_ids.len()
    }

    /// Renders the whole table in the rule-description grammar, one rule per line.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            out.push_str(&rule.to_source());
            out.push('\n');
        }
        out
    }
}

impl FromIterator<Rule> for TransitionTable {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::from_rules(iter.into_iter().collect())
    }
}
