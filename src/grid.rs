//! Sparse, unbounded 2D storage of symbols and their visual tags.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A small integer stamped onto written cells, used for visualization only.
pub type Tag = u16;

/// Contents of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub symbol: char,
    pub tag: Tag,
}

impl Cell {
    /// What every never-written coordinate reads as.
    pub const BLANK: Cell = Cell {
        symbol: ' ',
        tag: 0,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// The plane the agents walk on.
///
/// Only written coordinates occupy memory; every other coordinate reads as
/// [`Cell::BLANK`]. Reads never change observable state.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    cells: HashMap<IVec2, Cell>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell at `pos`, or [`Cell::BLANK`] if it was never written.
    pub fn read(&self, pos: IVec2) -> Cell {
        self.cells.get(&pos).copied().unwrap_or_default()
    }

    /// Overwrites (or inserts) the cell at `pos`.
    pub fn write(&mut self, pos: IVec2, symbol: char, tag: Tag) {
        self.cells.insert(pos, Cell { symbol, tag });
    }

    /// Returns the stored cell, distinguishing written blanks from untouched space.
    pub fn get(&self, pos: IVec2) -> Option<&Cell> {
        self.cells.get(&pos)
    }

    /// Number of coordinates ever written.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Iterates over every written cell in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Cell)> + '_ {
        self.cells.iter().map(|(&pos, &cell)| (pos, cell))
    }

    /// Inclusive `(min, max)` corners of the written region, or `None` for an empty grid.
    pub fn bounds(&self) -> Option<(IVec2, IVec2)> {
        let mut it = self.cells.keys();
        let first = *it.next()?;
        Some(it.fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))))
    }
}
