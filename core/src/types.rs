use core::fmt;
use core::ops::{Add, RangeInclusive};
use serde::{Deserialize, Serialize};

/// Signed coordinate, so that out-of-field input stays representable.
pub type Coord = i32;

/// Linear dimension, used for field width/height.
pub type Dim = u16;

/// Area dimension, used for mine/cell counts.
pub type CellCount = u32;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    pub const ORIGIN: Point = Point::new(0, 0);

    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    pub const fn is_within(self, size: Size) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < size.cols as Coord && self.y < size.rows as Coord
    }

    /// Plain Moore 1-ring around this point, clipped to `size`.
    pub fn neighbors(self, size: Size) -> Neighborhood {
        neighbors_of(self, size, 1, false)
    }

    /// `self + offset`, or `None` when a coordinate overflows.
    pub const fn checked_add(self, offset: Point) -> Option<Point> {
        match (self.x.checked_add(offset.x), self.y.checked_add(offset.y)) {
            (Some(x), Some(y)) => Some(Point::new(x, y)),
            _ => None,
        }
    }

    /// `[row, column]` index into a grid shaped `(rows, cols)`.
    ///
    /// Only meaningful for points that are within the grid.
    pub(crate) fn to_nd_index(self) -> [usize; 2] {
        [self.y as usize, self.x as usize]
    }
}

impl Add for Point {
    type Output = Point;

    /// Panics on overflow like integer addition, see [`Point::checked_add`].
    fn add(self, offset: Point) -> Self::Output {
        Point::new(self.x + offset.x, self.y + offset.y)
    }
}

impl From<(Coord, Coord)> for Point {
    fn from((x, y): (Coord, Coord)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub rows: Dim,
    pub cols: Dim,
}

impl Size {
    pub const fn new(rows: Dim, cols: Dim) -> Self {
        Self { rows, cols }
    }

    pub const fn cell_count(self) -> CellCount {
        self.rows as CellCount * self.cols as CellCount
    }

    pub const fn is_empty(self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Grid shape as used by `ndarray`, rows first.
    pub(crate) const fn to_nd_shape(self) -> (usize, usize) {
        (self.rows as usize, self.cols as usize)
    }

    /// All points of the field in row-major order.
    pub fn points(self) -> impl Iterator<Item = Point> {
        let cols = Coord::from(self.cols);
        (0..Coord::from(self.rows)).flat_map(move |y| (0..cols).map(move |x| Point::new(x, y)))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

/// Enumerates the square neighbourhood of `center` with the given `extent`.
///
/// Offsets are visited with `dx` as the outer and `dy` as the inner loop, so
/// the order is stable for a given center and size. Points outside of `size`
/// are skipped, the center itself only appears with `include_self`. Only the
/// offsets that land on the field are walked, so any `extent` is cheap.
pub fn neighbors_of(center: Point, size: Size, extent: Coord, include_self: bool) -> Neighborhood {
    // no field is wider than `Dim::MAX`
    let extent = extent.clamp(0, Coord::from(Dim::MAX));
    Neighborhood::new(center, size, extent, include_self)
}

/// Offsets from `center` along one axis that stay inside `0..len`, as `(first, last)`.
///
/// An empty range comes back with `first > last`.
fn clipped_span(center: Coord, extent: Coord, len: Dim) -> (Coord, Coord) {
    let (center, extent) = (i64::from(center), i64::from(extent));
    let first = (-extent).max(-center);
    let last = extent.min(i64::from(len) - 1 - center);
    match (Coord::try_from(first), Coord::try_from(last)) {
        (Ok(first), Ok(last)) if first <= last => (first, last),
        _ => (1, 0),
    }
}

#[derive(Clone, Debug)]
pub struct Neighborhood {
    center: Point,
    include_self: bool,
    dx_span: RangeInclusive<Coord>,
    dy_span: RangeInclusive<Coord>,
    dx: Coord,
    dy: Coord,
}

impl Neighborhood {
    fn new(center: Point, size: Size, extent: Coord, include_self: bool) -> Self {
        let (dx_first, dx_last) = clipped_span(center.x, extent, size.cols);
        let (dy_first, dy_last) = clipped_span(center.y, extent, size.rows);
        // an empty row span must end the walk as well
        let dx_first = if dy_first > dy_last { dx_last + 1 } else { dx_first };

        Self {
            center,
            include_self,
            dx_span: dx_first..=dx_last,
            dy_span: dy_first..=dy_last,
            dx: dx_first,
            dy: dy_first,
        }
    }

    /// Moves to the next offset, returning the current one.
    fn step(&mut self) -> Option<Point> {
        if self.dx > *self.dx_span.end() {
            return None;
        }

        let offset = Point::new(self.dx, self.dy);
        if self.dy < *self.dy_span.end() {
            self.dy += 1;
        } else {
            self.dy = *self.dy_span.start();
            self.dx += 1;
        }
        Some(offset)
    }
}

impl Iterator for Neighborhood {
    type Item = Point;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let offset = self.step()?;
            if offset == Point::ORIGIN && !self.include_self {
                continue;
            }
            if let Some(next_item) = self.center.checked_add(offset) {
                return Some(next_item);
            }
        }
    }
}
