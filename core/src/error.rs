use thiserror::Error;

use crate::{CellCount, Point};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Point {0} is outside of the field")]
    OutOfBounds(Point),
    #[error("Too many mines: requested {requested} but only {available} cells are outside the safe zone")]
    TooManyMines {
        requested: CellCount,
        available: CellCount,
    },
    #[error("Mine density must be a percentage, got {0}")]
    InvalidDensity(u8),
    #[error("Field has no cells")]
    EmptyBoard,
    #[error("Mines were already placed on this field")]
    MinesAlreadyPlaced,
    #[error("Cells were revealed before mines were placed")]
    RevealedBeforePlacement,
    #[error("Mine sampler returned {got} indices for {expected} mines, with duplicates or out of range")]
    InvalidSample { expected: CellCount, got: usize },
    #[error("Game has not started, reveal a cell first")]
    NotStarted,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

pub type Result<T> = core::result::Result<T, GameError>;
