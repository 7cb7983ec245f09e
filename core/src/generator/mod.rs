use alloc::vec::Vec;
use hashbrown::HashSet;

use crate::*;
pub use random::*;

mod random;

/// Places mines once the first move is known, keeping a zone around it free.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MinePlacer {
    mine_count: CellCount,
    safe_extent: Coord,
}

impl MinePlacer {
    pub const fn new(mine_count: CellCount) -> Self {
        Self {
            mine_count,
            safe_extent: 1,
        }
    }

    /// Widens (or narrows) the mine-free square around the first move.
    ///
    /// An extent of 0 only keeps the first cell itself safe.
    pub const fn with_safe_extent(self, safe_extent: Coord) -> Self {
        Self {
            safe_extent,
            ..self
        }
    }

    pub const fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub const fn safe_extent(&self) -> Coord {
        self.safe_extent
    }

    /// The first point and its neighbourhood of `safe_extent`.
    pub fn safe_zone(&self, size: Size, first: Point) -> HashSet<Point> {
        neighbors_of(first, size, self.safe_extent, true).collect()
    }

    /// Every point that may receive a mine, in row-major order.
    pub fn candidates(&self, size: Size, first: Point) -> Vec<Point> {
        let safe_zone = self.safe_zone(size, first);
        size.points()
            .filter(|point| !safe_zone.contains(point))
            .collect()
    }

    /// Fails when the field cannot hold `mine_count` mines outside the safe zone.
    pub fn check_fits(&self, size: Size, first: Point) -> Result<()> {
        let available = size.cell_count() - self.safe_zone(size, first).len() as CellCount;
        if self.mine_count > available {
            Err(GameError::TooManyMines {
                requested: self.mine_count,
                available,
            })
        } else {
            Ok(())
        }
    }

    pub fn place<'f, S>(
        &self,
        field: &'f mut Field,
        first: Point,
        sampler: &mut S,
    ) -> Result<&'f HashSet<Point>>
    where
        S: MineSampler + ?Sized,
    {
        if field.mines_placed() {
            return Err(GameError::MinesAlreadyPlaced);
        }
        if !field.revealed().is_empty() {
            return Err(GameError::RevealedBeforePlacement);
        }
        let size = field.size();
        let first = field.validate_point(first)?;
        self.check_fits(size, first)?;

        let candidates = self.candidates(size, first);
        let chosen = sampler.sample_distinct(candidates.len(), self.mine_count as usize);
        log::debug!(
            "Placing {} mines among {} candidates, first move at {}",
            self.mine_count,
            candidates.len(),
            first
        );

        let mines = self.pick(&candidates, &chosen)?;
        field.lay_mines(mines);
        Ok(field.mines())
    }

    /// Maps sampled indices to candidate points, rejecting short, repeated or out-of-range samples.
    fn pick(&self, candidates: &[Point], chosen: &[usize]) -> Result<Vec<Point>> {
        let invalid = || GameError::InvalidSample {
            expected: self.mine_count,
            got: chosen.len(),
        };
        if chosen.len() != self.mine_count as usize {
            return Err(invalid());
        }

        let mut seen = HashSet::with_capacity(chosen.len());
        chosen
            .iter()
            .map(|&index| match candidates.get(index) {
                Some(&point) if seen.insert(index) => Ok(point),
                _ => Err(invalid()),
            })
            .collect()
    }
}
