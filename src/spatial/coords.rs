//! Grid coordinates, cardinal directions and run orientation
//!
//! Rows grow upward and columns grow rightward, so `Down` is `row - 1` and
//! `Left` is `col - 1`. Every region grows along exactly one axis, which is
//! why orientation is a two-valued enum wrapped in `Option` rather than a
//! free direction.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    /// Row index (0 is the bottom row)
    pub row: usize,
    /// Column index (0 is the leftmost column)
    pub col: usize,
}

impl Point {
    /// Create a cell coordinate
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Address the tile slot at `layer` in this cell
    pub const fn at_layer(self, layer: usize) -> TileRef {
        TileRef {
            row: self.row,
            col: self.col,
            layer,
        }
    }

    /// Neighbouring cell one step in `direction`
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are checked by the grid.
    pub const fn step(self, direction: Direction) -> Option<Self> {
        let (d_row, d_col) = direction.delta();
        let Some(row) = self.row.checked_add_signed(d_row) else {
            return None;
        };
        let Some(col) = self.col.checked_add_signed(d_col) else {
            return None;
        };
        Some(Self { row, col })
    }
}

/// A single tile slot: cell coordinate plus layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileRef {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
    /// Layer index within the cell
    pub layer: usize,
}

impl TileRef {
    /// Create a tile reference
    pub const fn new(row: usize, col: usize, layer: usize) -> Self {
        Self { row, col, layer }
    }

    /// The cell containing this tile
    pub const fn cell(self) -> Point {
        Point::new(self.row, self.col)
    }

    /// Same-layer neighbour one step in `direction`
    pub const fn step(self, direction: Direction) -> Option<Self> {
        match self.cell().step(direction) {
            Some(cell) => Some(cell.at_layer(self.layer)),
            None => None,
        }
    }
}

impl fmt::Display for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})@{}", self.row, self.col, self.layer)
    }
}

/// Growth axis of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Members share a row
    Horizontal,
    /// Members share a column
    Vertical,
}

impl Orientation {
    /// Infer the axis joining two tiles
    ///
    /// Returns `None` for identical cells or tiles sharing neither row nor column.
    pub fn between(a: TileRef, b: TileRef) -> Option<Self> {
        if a.row == b.row && a.col != b.col {
            Some(Self::Horizontal)
        } else if a.col == b.col && a.row != b.row {
            Some(Self::Vertical)
        } else {
            None
        }
    }

    /// Position of a tile along this axis
    pub const fn coordinate(self, tile: TileRef) -> usize {
        match self {
            Self::Horizontal => tile.col,
            Self::Vertical => tile.row,
        }
    }

    /// Directions that move along this axis
    pub const fn directions(self) -> Directions {
        match self {
            Self::Horizontal => Directions::HORIZONTAL,
            Self::Vertical => Directions::VERTICAL,
        }
    }
}

/// One of the four cardinal neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `col - 1`
    Left,
    /// `col + 1`
    Right,
    /// `row - 1`
    Down,
    /// `row + 1`
    Up,
}

impl Direction {
    /// Fixed probe order used by the merge scan
    pub const SCAN_ORDER: [Self; 4] = [Self::Left, Self::Right, Self::Down, Self::Up];

    /// Row and column offsets of one step
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::Down => (-1, 0),
            Self::Up => (1, 0),
        }
    }

    /// Axis travelled by this direction
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Horizontal,
            Self::Down | Self::Up => Orientation::Vertical,
        }
    }

    /// Whether the neighbour lies after the origin along the axis
    pub const fn is_after(self) -> bool {
        matches!(self, Self::Right | Self::Up)
    }

    /// The reverse direction
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Up => Self::Down,
        }
    }

    /// Single-direction mask
    pub const fn flag(self) -> Directions {
        match self {
            Self::Left => Directions::LEFT,
            Self::Right => Directions::RIGHT,
            Self::Down => Directions::DOWN,
            Self::Up => Directions::UP,
        }
    }

    /// Direction of a single step from `from` to `to` along one axis
    pub const fn towards(from: Point, to: Point) -> Option<Self> {
        if from.row == to.row {
            if to.col > from.col {
                Some(Self::Right)
            } else if to.col < from.col {
                Some(Self::Left)
            } else {
                None
            }
        } else if from.col == to.col {
            if to.row > from.row {
                Some(Self::Up)
            } else {
                Some(Self::Down)
            }
        } else {
            None
        }
    }
}

bitflags! {
    /// Set of neighbour directions probed by the merge scan
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Directions: u8 {
        /// Probe `col - 1`
        const LEFT = 1;
        /// Probe `col + 1`
        const RIGHT = 1 << 1;
        /// Probe `row - 1`
        const DOWN = 1 << 2;
        /// Probe `row + 1`
        const UP = 1 << 3;
        /// Both horizontal neighbours
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        /// Both vertical neighbours
        const VERTICAL = Self::DOWN.bits() | Self::UP.bits();
        /// Every neighbour
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

impl Default for Directions {
    fn default() -> Self {
        Self::ALL
    }
}
