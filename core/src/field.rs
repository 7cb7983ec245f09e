use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashSet;
use ndarray::Array2;
use smallvec::SmallVec;

use crate::*;

/// In-bounds Moore neighbours of a single point.
pub type NeighborList = SmallVec<[Point; 8]>;

/// The grid of one game: cells, their neighbour table and the mine, revealed
/// and flagged point sets.
#[derive(Clone, Debug)]
pub struct Field {
    size: Size,
    cells: Array2<Cell>,
    neighbors: Array2<NeighborList>,
    mine_count: CellCount,
    mines_placed: bool,
    mines_exposed: bool,
    mines: HashSet<Point>,
    revealed: HashSet<Point>,
    flagged: HashSet<Point>,
}

impl Field {
    /// Creates a field without mines, they are placed on the first move.
    pub fn new(size: Size) -> Self {
        let shape = size.to_nd_shape();
        let neighbors = Array2::from_shape_fn(shape, |(y, x)| {
            Point::new(x as Coord, y as Coord).neighbors(size).collect()
        });

        Self {
            size,
            cells: Array2::default(shape),
            neighbors,
            mine_count: 0,
            mines_placed: false,
            mines_exposed: false,
            mines: HashSet::new(),
            revealed: HashSet::new(),
            flagged: HashSet::new(),
        }
    }

    /// Creates a field with a fixed mine layout, bypassing the safe zone.
    ///
    /// Duplicate points count once.
    pub fn with_mines<I>(size: Size, mines: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mines = mines
            .into_iter()
            .map(|point| {
                if point.is_within(size) {
                    Ok(point)
                } else {
                    Err(GameError::OutOfBounds(point))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let mut field = Self::new(size);
        field.lay_mines(mines);
        Ok(field)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn total_cells(&self) -> CellCount {
        self.size.cell_count()
    }

    /// Mines on the field, which is also the flag budget.
    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn mines(&self) -> &HashSet<Point> {
        &self.mines
    }

    pub fn revealed(&self) -> &HashSet<Point> {
        &self.revealed
    }

    pub fn flagged(&self) -> &HashSet<Point> {
        &self.flagged
    }

    /// Flags that can still be placed before the budget runs out.
    pub fn flags_left(&self) -> CellCount {
        self.mine_count - self.flagged.len() as CellCount
    }

    /// Safe cells that have not been revealed yet.
    pub fn safe_cells_left(&self) -> CellCount {
        self.total_cells()
            .saturating_sub(self.mine_count)
            .saturating_sub(self.revealed.len() as CellCount)
    }

    pub fn validate_point(&self, point: Point) -> Result<Point> {
        if point.is_within(self.size) {
            Ok(point)
        } else {
            Err(GameError::OutOfBounds(point))
        }
    }

    /// Raw cell state, including mine data. Renderers should use [`Field::cell_snapshot`].
    pub fn cell(&self, point: Point) -> Result<Cell> {
        let point = self.validate_point(point)?;
        Ok(self.cells[point.to_nd_index()])
    }

    pub fn neighbors(&self, point: Point) -> Result<&[Point]> {
        let point = self.validate_point(point)?;
        Ok(&self.neighbors[point.to_nd_index()])
    }

    /// Places `mine_count` mines outside of the 1-ring around `first`.
    pub fn place_mines<S>(
        &mut self,
        mine_count: CellCount,
        first: Point,
        sampler: &mut S,
    ) -> Result<&HashSet<Point>>
    where
        S: MineSampler + ?Sized,
    {
        MinePlacer::new(mine_count).place(self, first, sampler)
    }

    pub(crate) fn lay_mines<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Point>,
    {
        for point in points {
            if !self.mines.insert(point) {
                continue;
            }
            self.cells[point.to_nd_index()].arm();
            for &neighbor in &self.neighbors[point.to_nd_index()] {
                self.cells[neighbor.to_nd_index()].bump_adjacent();
            }
        }
        self.mine_count = self.mines.len() as CellCount;
        self.mines_placed = true;
    }

    /// Reveals `point`, flooding through connected cells without adjacent mines.
    ///
    /// Flagged cells stop the flood, but revealing a flagged cell directly
    /// removes its flag. Hitting a mine changes nothing.
    pub fn reveal(&mut self, point: Point) -> Result<RevealOutcome> {
        let point = self.validate_point(point)?;
        let cell = self.cells[point.to_nd_index()];

        if cell.is_revealed() {
            return Ok(RevealOutcome::AlreadyRevealed);
        }
        if cell.is_mine() {
            log::debug!("Mine hit at {}", point);
            return Ok(RevealOutcome::MineHit);
        }

        let Self {
            cells,
            neighbors,
            revealed,
            flagged,
            ..
        } = self;

        cells[point.to_nd_index()].reveal();
        revealed.insert(point);
        flagged.remove(&point);
        let mut changed = vec![point];
        log::debug!("Revealed {}, adjacent mines: {}", point, cell.adjacent_mines());

        if cell.adjacent_mines() == 0 {
            let mut to_visit = VecDeque::from([point]);

            while let Some(visit) = to_visit.pop_front() {
                for &neighbor in &neighbors[visit.to_nd_index()] {
                    let neighbor_cell = &mut cells[neighbor.to_nd_index()];
                    if neighbor_cell.is_revealed()
                        || neighbor_cell.is_mine()
                        || neighbor_cell.is_flagged()
                    {
                        continue;
                    }

                    neighbor_cell.reveal();
                    revealed.insert(neighbor);
                    changed.push(neighbor);
                    log::trace!(
                        "Flood revealed {}, adjacent mines: {}",
                        neighbor,
                        neighbor_cell.adjacent_mines()
                    );

                    if neighbor_cell.adjacent_mines() == 0 {
                        to_visit.push_back(neighbor);
                    }
                }
            }
        }

        Ok(RevealOutcome::Revealed(changed))
    }

    /// Toggles the flag on `point`, within a budget of one flag per mine.
    pub fn flag(&mut self, point: Point) -> Result<FlagOutcome> {
        use FlagOutcome::*;

        let point = self.validate_point(point)?;
        let cell = &mut self.cells[point.to_nd_index()];

        if cell.is_revealed() {
            return Ok(Rejected(FlagRejection::AlreadyRevealed));
        }
        if !cell.is_flagged() && self.flagged.len() as CellCount >= self.mine_count {
            return Ok(Rejected(FlagRejection::BudgetExhausted));
        }

        Ok(match cell.toggle_flag() {
            Some(true) => {
                self.flagged.insert(point);
                Flagged
            }
            Some(false) => {
                self.flagged.remove(&point);
                Unflagged
            }
            None => Rejected(FlagRejection::AlreadyRevealed),
        })
    }

    /// Whether every safe cell has been revealed.
    pub fn is_victory(&self) -> bool {
        is_victory(
            self.revealed.len() as CellCount,
            self.total_cells(),
            self.mine_count,
        )
    }

    /// What a renderer may show for `point`.
    pub fn cell_snapshot(&self, point: Point) -> Result<CellView> {
        Ok(CellView::of(self.cell(point)?, self.mines_exposed))
    }

    /// Makes mines and wrong flags visible through [`Field::cell_snapshot`].
    ///
    /// Meant for the loss screen or debugging, no cell is revealed.
    pub fn reveal_all_mines(&mut self) {
        self.mines_exposed = true;
    }

    pub fn mines_exposed(&self) -> bool {
        self.mines_exposed
    }

    /// Flags that sit on actual mines.
    pub fn correct_flags(&self) -> impl Iterator<Item = Point> + '_ {
        self.flagged
            .iter()
            .copied()
            .filter(|point| self.mines.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(size: Size, mines: &[(Coord, Coord)]) -> Field {
        Field::with_mines(size, mines.iter().map(|&xy| Point::from(xy))).unwrap()
    }

    fn revealed(outcome: RevealOutcome) -> Vec<Point> {
        match outcome {
            RevealOutcome::Revealed(changed) => changed,
            other => panic!("expected a reveal, got {other:?}"),
        }
    }

    #[test]
    fn neighbor_table_matches_geometry() {
        let size = Size::new(3, 5);
        let field = Field::new(size);

        for point in size.points() {
            let expected: Vec<_> = point.neighbors(size).collect();
            assert_eq!(field.neighbors(point).unwrap(), expected.as_slice());
        }
        assert_eq!(field.neighbors(Point::new(0, 0)).unwrap().len(), 3);
        assert_eq!(field.neighbors(Point::new(2, 1)).unwrap().len(), 8);
    }

    #[test]
    fn empty_board_floods_entirely() {
        let mut field = Field::new(Size::new(4, 4));

        let changed = revealed(field.reveal(Point::new(1, 2)).unwrap());

        assert_eq!(changed.len(), 16);
        assert_eq!(changed[0], Point::new(1, 2));
        assert!(field.is_victory());
    }

    #[test]
    fn flood_stops_at_numbered_border() {
        let mut field = field(Size::new(3, 3), &[(2, 2)]);

        let changed = revealed(field.reveal(Point::new(0, 0)).unwrap());

        assert_eq!(changed.len(), 8);
        assert!(!field.revealed().contains(&Point::new(2, 2)));
        assert_eq!(field.cell_snapshot(Point::new(1, 1)).unwrap(), CellView::Open(1));
        assert_eq!(field.cell_snapshot(Point::new(0, 0)).unwrap(), CellView::Open(0));
        assert_eq!(field.cell_snapshot(Point::new(2, 2)).unwrap(), CellView::Hidden);
        assert!(field.is_victory());
    }

    #[test]
    fn numbered_cell_reveals_alone() {
        let mut field = field(Size::new(3, 3), &[(2, 2)]);

        assert_eq!(revealed(field.reveal(Point::new(1, 1)).unwrap()), [Point::new(1, 1)]);
        assert!(!field.is_victory());
    }

    #[test]
    fn flood_never_repeats_and_only_opens_hidden_cells() {
        let size = Size::new(16, 30);
        let mut field = Field::new(size);
        field
            .place_mines(99, Point::new(10, 8), &mut seeded_sampler(5))
            .unwrap();

        for point in size.points() {
            let before = field.revealed().clone();
            if let RevealOutcome::Revealed(changed) = field.reveal(point).unwrap() {
                let unique: HashSet<_> = changed.iter().copied().collect();
                assert_eq!(unique.len(), changed.len());
                assert!(changed.iter().all(|p| !before.contains(p)));
                assert!(changed.iter().all(|p| !field.mines().contains(p)));
            }
        }

        assert!(field.is_victory());
        assert!(field.revealed().is_disjoint(field.mines()));
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut field = field(Size::new(3, 3), &[(2, 2)]);

        assert!(matches!(
            field.reveal(Point::new(0, 1)).unwrap(),
            RevealOutcome::Revealed(_)
        ));
        let revealed_before = field.revealed().clone();

        for _ in 0..3 {
            assert_eq!(
                field.reveal(Point::new(0, 1)).unwrap(),
                RevealOutcome::AlreadyRevealed
            );
        }
        assert_eq!(field.revealed(), &revealed_before);
    }

    #[test]
    fn mine_hit_does_not_mutate() {
        let mut field = field(Size::new(2, 2), &[(0, 0)]);

        assert_eq!(field.reveal(Point::new(0, 0)).unwrap(), RevealOutcome::MineHit);
        assert!(field.revealed().is_empty());
        assert!(!field.cell(Point::new(0, 0)).unwrap().is_revealed());
        assert_eq!(field.cell_snapshot(Point::new(0, 0)).unwrap(), CellView::Hidden);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut field = Field::new(Size::new(2, 2));
        let outside = Point::new(-1, 0);

        assert_eq!(field.reveal(outside), Err(GameError::OutOfBounds(outside)));
        assert_eq!(field.flag(outside), Err(GameError::OutOfBounds(outside)));
        assert_eq!(field.cell_snapshot(Point::new(0, 2)), Err(GameError::OutOfBounds(Point::new(0, 2))));
        assert_eq!(
            Field::with_mines(Size::new(2, 2), [Point::new(2, 0)]).unwrap_err(),
            GameError::OutOfBounds(Point::new(2, 0))
        );
    }

    #[test]
    fn flag_budget_is_the_mine_count() {
        let mut field = field(Size::new(3, 3), &[(2, 2)]);

        assert_eq!(field.flag(Point::new(0, 0)).unwrap(), FlagOutcome::Flagged);
        assert_eq!(field.flags_left(), 0);
        assert_eq!(
            field.flag(Point::new(1, 0)).unwrap(),
            FlagOutcome::Rejected(FlagRejection::BudgetExhausted)
        );
        // unflagging is always allowed
        assert_eq!(field.flag(Point::new(0, 0)).unwrap(), FlagOutcome::Unflagged);
        assert_eq!(field.flag(Point::new(1, 0)).unwrap(), FlagOutcome::Flagged);
    }

    #[test]
    fn flag_toggle_is_an_involution() {
        let mut field = field(Size::new(4, 4), &[(0, 0), (3, 3)]);
        field.flag(Point::new(3, 3)).unwrap();
        let before = field.flagged().clone();

        field.flag(Point::new(1, 2)).unwrap();
        field.flag(Point::new(1, 2)).unwrap();

        assert_eq!(field.flagged(), &before);
        assert!(!field.cell(Point::new(1, 2)).unwrap().is_flagged());
    }

    #[test]
    fn revealed_cells_cannot_be_flagged() {
        let mut field = field(Size::new(3, 3), &[(2, 2)]);
        field.reveal(Point::new(1, 1)).unwrap();

        assert_eq!(
            field.flag(Point::new(1, 1)).unwrap(),
            FlagOutcome::Rejected(FlagRejection::AlreadyRevealed)
        );
        assert!(field.flagged().is_empty());
    }

    #[test]
    fn flags_block_the_flood_but_not_a_direct_reveal() {
        let mut field = field(Size::new(3, 4), &[(3, 2)]);
        field.flag(Point::new(0, 2)).unwrap();

        let changed = revealed(field.reveal(Point::new(0, 0)).unwrap());
        assert!(!changed.contains(&Point::new(0, 2)));
        assert_eq!(field.cell_snapshot(Point::new(0, 2)).unwrap(), CellView::Flagged);
        assert!(!field.is_victory());

        assert_eq!(revealed(field.reveal(Point::new(0, 2)).unwrap()), [Point::new(0, 2)]);
        assert!(field.flagged().is_empty());
        assert!(field.is_victory());
    }

    #[test]
    fn exposing_mines_changes_only_the_view() {
        let mut field = field(Size::new(2, 3), &[(0, 0), (2, 1)]);
        field.flag(Point::new(0, 0)).unwrap();
        field.flag(Point::new(1, 0)).unwrap();

        field.reveal_all_mines();

        assert_eq!(field.cell_snapshot(Point::new(0, 0)).unwrap(), CellView::Flagged);
        assert_eq!(field.cell_snapshot(Point::new(1, 0)).unwrap(), CellView::WrongFlag);
        assert_eq!(field.cell_snapshot(Point::new(2, 1)).unwrap(), CellView::Mine);
        assert_eq!(field.cell_snapshot(Point::new(0, 1)).unwrap(), CellView::Hidden);
        assert!(field.revealed().is_empty());
        assert_eq!(field.correct_flags().collect::<Vec<_>>(), [Point::new(0, 0)]);
    }

    #[test]
    fn duplicate_mines_count_once() {
        let field = field(Size::new(2, 2), &[(1, 1), (1, 1)]);

        assert_eq!(field.mine_count(), 1);
        assert_eq!(field.cell(Point::new(0, 0)).unwrap().adjacent_mines(), 1);
        assert_eq!(field.safe_cells_left(), 3);
    }
}
