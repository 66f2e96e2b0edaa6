//! ASCII layout parsing used by fixtures and the command-line adapter.
//!
//! Each line of the layout is one row of cells. The first line maps to
//! `origin.y()`, and every following line increases `y` by one. Within a
//! line the first character maps to `origin.x()`. `.` marks an open cell,
//! `#` an explicitly blocked one, and a space leaves the cell unexplored.

use gridwalk_core::{CellCoord, CellState, Command};
use thiserror::Error;

use crate::{apply, World};

const OPEN_SYMBOL: char = '.';
const BLOCKED_SYMBOL: char = '#';
const UNEXPLORED_SYMBOL: char = ' ';

/// Errors that can occur while parsing a layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A character other than `.`, `#` or space appeared in the layout.
    #[error("unknown layout symbol {symbol:?} at line {line}, column {column}")]
    UnknownSymbol {
        /// Offending character.
        symbol: char,
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
    },
    /// The layout extends beyond the representable coordinate range.
    #[error("layout line {line} does not fit in the coordinate range")]
    OutOfRange {
        /// One-based line number.
        line: usize,
    },
}

/// Builds a world from an ASCII layout anchored at `origin`.
pub fn parse(text: &str, origin: CellCoord) -> Result<World, LayoutError> {
    let mut world = World::new();
    let mut events = Vec::new();

    for (row, line) in text.lines().enumerate() {
        let line_number = row + 1;
        let dy = i64::try_from(row).map_err(|_| LayoutError::OutOfRange { line: line_number })?;

        for (column, symbol) in line.trim_end_matches('\r').chars().enumerate() {
            let state = match symbol {
                OPEN_SYMBOL => CellState::Open,
                BLOCKED_SYMBOL => CellState::Blocked,
                UNEXPLORED_SYMBOL => continue,
                _ => {
                    return Err(LayoutError::UnknownSymbol {
                        symbol,
                        line: line_number,
                        column: column + 1,
                    })
                }
            };
            let dx = i64::try_from(column)
                .map_err(|_| LayoutError::OutOfRange { line: line_number })?;
            let cell = checked_offset(origin, dx, dy)
                .ok_or(LayoutError::OutOfRange { line: line_number })?;
            apply(&mut world, Command::SetCell { cell, state }, &mut events);
        }
    }

    Ok(world)
}

fn checked_offset(origin: CellCoord, dx: i64, dy: i64) -> Option<CellCoord> {
    Some(CellCoord::new(
        origin.x().checked_add(dx)?,
        origin.y().checked_add(dy)?,
    ))
}
