//! # turmite
//!
//! Turtles walking an unbounded grid under a weighted, possibly nondeterministic
//! transition function.
//!
//! A program is written in a compact rule language
//! (`{state,next}['read','write',L]%weight`) and [`parse`]d into a
//! [`TransitionTable`]. Each tick, [`step`] reads the symbol under a turtle,
//! picks a matching rule (weighted at random when several match), writes,
//! turns, and moves one cell. [`Simulation`] drives any number of turtles over
//! one shared [`Grid`].

pub mod direction;
pub mod generator;
pub mod grid;
pub mod parser;
pub mod rule;
pub mod simulation;
pub mod table;
pub mod turtle;

pub use direction::*;
pub use grid::*;
pub use parser::*;
pub use rule::*;
pub use simulation::*;
pub use table::*;
pub use turtle::*;
