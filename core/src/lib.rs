//! Minefield engine: mine placement with a safe first move, adjacency counts,
//! flood-fill reveals and a flag budget.
//!
//! The engine does no I/O. Rendering, input and score keeping belong to the
//! embedding application, which drives a [`Session`] (or a bare [`Field`]) and
//! reads [`CellView`]s back.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use field::*;
pub use generator::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod field;
mod generator;
mod types;

/// Board shape and mine settings for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Size,
    pub mines: CellCount,
    /// Radius of the mine-free square around the first move.
    #[serde(default = "default_safe_extent")]
    pub safe_extent: Coord,
    /// Fixed seed for reproducible layouts, random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

const fn default_safe_extent() -> Coord {
    1
}

impl GameConfig {
    pub const fn new(size: Size, mines: CellCount) -> Self {
        Self {
            size,
            mines,
            safe_extent: default_safe_extent(),
            seed: None,
        }
    }

    pub const fn beginner() -> Self {
        Self::new(Size::new(9, 9), 10)
    }

    pub const fn intermediate() -> Self {
        Self::new(Size::new(16, 16), 40)
    }

    pub const fn expert() -> Self {
        Self::new(Size::new(16, 30), 99)
    }

    /// Derives the mine count from a percentage of the cells.
    ///
    /// Any board with more than one cell gets at least one mine and always
    /// keeps at least one safe cell.
    pub fn from_density(size: Size, density: u8) -> Result<Self> {
        if density > 100 {
            return Err(GameError::InvalidDensity(density));
        }
        if size.is_empty() {
            return Err(GameError::EmptyBoard);
        }

        let cells = size.cell_count();
        let mines = (cells * CellCount::from(density) / 100)
            .max(1)
            .min(cells - 1);
        Ok(Self::new(size, mines))
    }

    pub const fn with_safe_extent(self, safe_extent: Coord) -> Self {
        Self {
            safe_extent,
            ..self
        }
    }

    pub const fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }

    /// Safe-zone radius that grows with large boards, one ring per 512 cells.
    pub const fn scaled_safe_extent(size: Size) -> Coord {
        let extent = (size.cell_count() >> 9) as Coord;
        if extent < 1 { 1 } else { extent }
    }

    pub const fn total_cells(&self) -> CellCount {
        self.size.cell_count()
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Checks that mines fit outside the safe zone wherever the first move lands.
    pub fn validate(&self) -> Result<()> {
        if self.size.is_empty() {
            return Err(GameError::EmptyBoard);
        }

        // the zone never spans more than the board, which also keeps this from overflowing
        let longest_side = Coord::from(self.size.rows.max(self.size.cols));
        let span = (2 * self.safe_extent.clamp(0, longest_side) + 1) as CellCount;
        let widest_zone = span.min(self.size.cols.into()) * span.min(self.size.rows.into());
        let available = self.total_cells() - widest_zone;
        if self.mines > available {
            return Err(GameError::TooManyMines {
                requested: self.mines,
                available,
            });
        }
        Ok(())
    }

    pub const fn placer(&self) -> MinePlacer {
        MinePlacer::new(self.mines).with_safe_extent(self.safe_extent)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

/// Result of revealing a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Nothing changed, the cell was open already.
    AlreadyRevealed,
    /// The cell holds a mine, the game is lost.
    MineHit,
    /// Every point opened by this call, in flood order.
    Revealed(Vec<Point>),
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(&self) -> bool {
        match self {
            Self::AlreadyRevealed => false,
            Self::MineHit => true,
            Self::Revealed(_) => true,
        }
    }

    /// Points to redraw after this outcome.
    pub fn changed(&self) -> &[Point] {
        match self {
            Self::Revealed(changed) => changed.as_slice(),
            _ => &[],
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagRejection {
    AlreadyRevealed,
    BudgetExhausted,
}

/// Result of toggling a flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
    Rejected(FlagRejection),
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::Flagged => true,
            Self::Unflagged => true,
            Self::Rejected(_) => false,
        }
    }
}

/// A game is won once exactly the safe cells are revealed.
pub const fn is_victory(revealed: CellCount, total_cells: CellCount, mine_count: CellCount) -> bool {
    match total_cells.checked_sub(mine_count) {
        Some(safe_cells) => revealed == safe_cells,
        None => false,
    }
}
