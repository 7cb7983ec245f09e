use serde::{Deserialize, Serialize};

/// State of a single cell of the field.
///
/// Mine and adjacency data are written during placement only. After that the
/// cell can be revealed once and flagged while it stays hidden.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    is_mine: bool,
    is_revealed: bool,
    is_flagged: bool,
    adjacent_mines: u8,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(self) -> bool {
        self.is_revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    /// Number of mines among the Moore neighbours.
    ///
    /// Not meaningful for mine cells.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub(crate) fn arm(&mut self) {
        self.is_mine = true;
    }

    pub(crate) fn bump_adjacent(&mut self) {
        self.adjacent_mines += 1;
    }

    /// Opens the cell, dropping any flag. Returns `false` if it was already open.
    pub(crate) fn reveal(&mut self) -> bool {
        if self.is_revealed {
            return false;
        }
        self.is_revealed = true;
        self.is_flagged = false;
        true
    }

    /// Toggles the flag, `None` when the cell is open and cannot hold one.
    pub(crate) fn toggle_flag(&mut self) -> Option<bool> {
        if self.is_revealed {
            return None;
        }
        self.is_flagged = !self.is_flagged;
        Some(self.is_flagged)
    }
}

/// Player-visible state of a cell, the only view a renderer should consume.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Open(u8),
    /// Unflagged mine, only visible once the mines are exposed.
    Mine,
    /// Flag on a safe cell, only visible once the mines are exposed.
    WrongFlag,
}

impl CellView {
    pub(crate) fn of(cell: Cell, mines_exposed: bool) -> Self {
        match (cell.is_revealed, cell.is_flagged, cell.is_mine) {
            (true, _, _) => Self::Open(cell.adjacent_mines),
            (false, true, false) if mines_exposed => Self::WrongFlag,
            (false, true, _) => Self::Flagged,
            (false, false, true) if mines_exposed => Self::Mine,
            (false, false, _) => Self::Hidden,
        }
    }

    /// Whether the cell still looks closed.
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged | Self::WrongFlag)
    }
}
