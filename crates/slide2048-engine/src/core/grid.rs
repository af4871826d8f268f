use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GridError;

use super::direction::{Axis, Direction};

/// Square grid of tile values, stored row-major with the origin at the top-left.
///
/// A cell holds `0` when empty, otherwise a power of two. The grid is the only
/// owner of cell storage: reads are open, writes are restricted to the slide
/// resolver and the spawner inside this crate.
///
/// Out-of-range coordinates and non-power-of-two writes are treated as bugs and
/// panic immediately. A corrupted grid would make every later win/loss decision
/// meaningless.
///
/// Serialized as a list of rows:
///
/// ```
/// use slide2048_engine::Grid;
///
/// let grid = Grid::from_rows(&[[2, 0], [0, 4]]).unwrap();
/// assert_eq!(grid.get(1, 1), 4);
/// assert_eq!(grid.count_empty(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct Grid {
    size: usize,
    cells: Vec<u32>,
}

impl Grid {
    /// Smallest supported side length.
    pub const MIN_SIZE: usize = 2;

    /// Creates an empty grid with `size` rows and columns.
    pub fn empty(size: usize) -> Result<Self, GridError> {
        if size < Self::MIN_SIZE {
            return Err(GridError::InvalidSize {
                size,
                min: Self::MIN_SIZE,
            });
        }
        Ok(Self {
            size,
            cells: vec![0; size * size],
        })
    }

    /// Builds a grid from explicit rows, validating shape and cell values.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, GridError>
    where
        R: AsRef<[u32]>,
    {
        let mut grid = Self::empty(rows.len())?;
        for (row, cells) in rows.iter().enumerate() {
            let cells = cells.as_ref();
            if cells.len() != grid.size {
                return Err(GridError::RaggedRow {
                    row,
                    len: cells.len(),
                    expected: grid.size,
                });
            }
            for (col, &value) in cells.iter().enumerate() {
                if !is_valid_cell(value) {
                    return Err(GridError::InvalidCell { row, col, value });
                }
                grid.set(row, col, value);
            }
        }
        Ok(grid)
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the value at `(row, col)`; `0` means empty.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.cells[self.index(row, col)]
    }

    /// Writes a cell value.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is outside the grid or if `value` is neither
    /// zero nor a power of two.
    pub(crate) fn set(&mut self, row: usize, col: usize, value: u32) {
        assert!(
            is_valid_cell(value),
            "invariant violation: cell ({row}, {col}) cannot hold {value}"
        );
        let idx = self.index(row, col);
        self.cells[idx] = value;
    }

    pub(crate) fn clear(&mut self) {
        self.cells.fill(0);
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.size && col < self.size,
            "invariant violation: ({row}, {col}) is outside a {size}x{size} grid",
            size = self.size
        );
        row * self.size + col
    }

    /// Returns all cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.cells.chunks_exact(self.size)
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.rows().map(<[u32]>::to_vec).collect()
    }

    /// Returns the coordinates of every empty cell in row-major order.
    pub fn empty_positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == 0)
            .map(|(idx, _)| (idx / self.size, idx % self.size))
    }

    #[must_use]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&value| value == 0).count()
    }

    /// Returns the highest tile value, or `0` for an empty grid.
    #[must_use]
    pub fn max_tile(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Returns the coordinates of line `line` for `direction`, nearest to the
    /// target edge first.
    ///
    /// Lines are rows for horizontal slides and columns for vertical ones.
    pub fn line_positions(
        &self,
        direction: Direction,
        line: usize,
    ) -> impl Iterator<Item = (usize, usize)> + use<> {
        let size = self.size;
        assert!(
            line < size,
            "invariant violation: line {line} is outside a {size}x{size} grid"
        );
        let axis = direction.axis();
        let reversed = direction.is_reversed();
        (0..size).map(move |i| {
            let offset = if reversed { size - 1 - i } else { i };
            match axis {
                Axis::Row => (line, offset),
                Axis::Column => (offset, line),
            }
        })
    }
}

fn is_valid_cell(value: u32) -> bool {
    value == 0 || value.is_power_of_two()
}

impl From<Grid> for Vec<Vec<u32>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

impl TryFrom<Vec<Vec<u32>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_tile().max(1).to_string().len();
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for (j, &value) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                if value == 0 {
                    write!(f, "{:>width$}", ".")?;
                } else {
                    write!(f, "{value:>width$}")?;
                }
            }
        }
        Ok(())
    }
}
