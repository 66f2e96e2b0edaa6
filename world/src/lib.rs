#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid world state for gridwalk.
//!
//! The world stores explicit classifications for the cells that have been
//! explored. Every other coordinate is unexplored and reported as
//! [`CellState::Blocked`]. Mutations flow exclusively through [`apply`];
//! systems read the world through [`GridQuery`] or the [`query`] helpers.

pub mod layout;

use std::collections::HashMap;

use gridwalk_core::{CellCoord, CellState, Command, Event, GridQuery};

/// Sparse grid of explicitly classified cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct World {
    cells: HashMap<CellCoord, CellState>,
}

impl World {
    /// Creates an empty world in which every cell is unexplored.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a world in which each of the provided cells is open.
    #[must_use]
    pub fn with_open_cells(cells: impl IntoIterator<Item = CellCoord>) -> Self {
        Self {
            cells: cells
                .into_iter()
                .map(|cell| (cell, CellState::Open))
                .collect(),
        }
    }

    fn state_of(&self, cell: CellCoord) -> CellState {
        self.cells.get(&cell).copied().unwrap_or(CellState::Blocked)
    }
}

impl GridQuery for World {
    fn classify(&self, cell: CellCoord) -> CellState {
        self.state_of(cell)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// A [`Event::CellChanged`] is emitted only when the effective classification
/// of the cell differs before and after the command.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetCell { cell, state } => {
            let from = world.state_of(cell);
            let _ = world.cells.insert(cell, state);
            push_change(cell, from, state, out_events);
        }
        Command::ClearCell { cell } => {
            let from = world.state_of(cell);
            let _ = world.cells.remove(&cell);
            push_change(cell, from, CellState::Blocked, out_events);
        }
    }
}

fn push_change(cell: CellCoord, from: CellState, to: CellState, out_events: &mut Vec<Event>) {
    if from != to {
        out_events.push(Event::CellChanged { cell, from, to });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use gridwalk_core::{CellCoord, CellState};

    /// Classifies a cell, reporting unexplored cells as blocked.
    #[must_use]
    pub fn classify(world: &World, cell: CellCoord) -> CellState {
        world.state_of(cell)
    }

    /// Lists every open cell in ascending coordinate order.
    #[must_use]
    pub fn open_cells(world: &World) -> Vec<CellCoord> {
        let mut open: Vec<CellCoord> = world
            .cells
            .iter()
            .filter(|(_, state)| state.is_open())
            .map(|(cell, _)| *cell)
            .collect();
        open.sort_unstable();
        open
    }

    /// Number of cells carrying an explicit classification.
    #[must_use]
    pub fn cell_count(world: &World) -> usize {
        world.cells.len()
    }
}
