//! Move resolution: sliding and merging every line of a grid.
//!
//! All four directions share one line algorithm. Each row (for horizontal
//! slides) or column (for vertical slides) is read nearest-to-the-target-edge
//! first, so that the line always slides toward index 0:
//!
//! 1. Drop empty cells, keeping the order of the remaining tiles.
//! 2. Scan once from the front; two equal neighbours become one tile of double
//!    value and neither takes part in another merge during the same move.
//! 3. Pad with empty cells and write back in the original orientation.
//!
//! Three equal tiles therefore produce a single merge at the edge:
//!
//! ```
//! use slide2048_engine::{Direction, Grid, slide};
//!
//! let grid = Grid::from_rows(&[[2, 2, 2], [0, 0, 0], [0, 0, 0]]).unwrap();
//! let outcome = slide(&grid, Direction::Left);
//!
//! assert_eq!(outcome.grid().to_rows()[0], vec![4, 2, 0]);
//! assert_eq!(outcome.score_delta(), 4);
//! assert!(outcome.changed());
//! ```

use serde::Serialize;

use super::{direction::Direction, grid::Grid};

/// Movement of a single tile during a slide.
///
/// Coordinates are `(row, col)`. A tile that merges reports the value of the
/// resulting tile in `merged_into`; both source tiles of a merge share the
/// same destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileMove {
    pub from: (usize, usize),
    pub to: (usize, usize),
    pub value: u32,
    pub merged_into: Option<u32>,
}

impl TileMove {
    #[must_use]
    pub fn is_stationary(&self) -> bool {
        self.from == self.to && self.merged_into.is_none()
    }
}

/// Result of sliding a grid in one direction.
#[derive(Debug, Clone)]
pub struct SlideOutcome {
    grid: Grid,
    score_delta: u64,
    changed: bool,
    moves: Vec<TileMove>,
}

impl SlideOutcome {
    /// Grid after sliding and merging (no tile spawned).
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn into_grid(self) -> Grid {
        self.grid
    }

    /// Sum of the values of all tiles created by merges in this slide.
    #[must_use]
    pub fn score_delta(&self) -> u64 {
        self.score_delta
    }

    /// Returns `true` if any cell differs from the input grid.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Number of merges performed.
    #[must_use]
    pub fn merges(&self) -> usize {
        // each merge is reported by both of its source tiles
        self.moves.iter().filter(|m| m.merged_into.is_some()).count() / 2
    }

    /// Per-tile movements, one entry per non-empty cell of the input grid.
    #[must_use]
    pub fn moves(&self) -> &[TileMove] {
        &self.moves
    }
}

/// Slides every line of `grid` in `direction`.
///
/// Never fails for a valid grid. The input grid is left untouched.
#[must_use]
pub fn slide(grid: &Grid, direction: Direction) -> SlideOutcome {
    let size = grid.size();
    let mut next = grid.clone();
    let mut score_delta = 0;
    let mut changed = false;
    let mut moves = Vec::new();

    let mut positions = Vec::with_capacity(size);
    let mut line = Vec::with_capacity(size);
    for line_idx in 0..size {
        positions.clear();
        positions.extend(grid.line_positions(direction, line_idx));
        line.clear();
        line.extend(positions.iter().map(|&(row, col)| grid.get(row, col)));

        let resolved = resolve_line(&line);
        for (&(row, col), &value) in positions.iter().zip(&resolved.cells) {
            next.set(row, col, value);
        }
        changed |= resolved.cells != line;
        score_delta += resolved.score;
        moves.extend(resolved.moves.iter().map(|m| TileMove {
            from: positions[m.from],
            to: positions[m.to],
            value: m.value,
            merged_into: m.merged_into,
        }));
    }

    SlideOutcome {
        grid: next,
        score_delta,
        changed,
        moves,
    }
}

/// Returns `true` if sliding in any direction would change `grid`.
#[must_use]
pub fn has_legal_move(grid: &Grid) -> bool {
    legal_directions(grid).next().is_some()
}

/// Returns the directions in which sliding would change `grid`.
pub fn legal_directions(grid: &Grid) -> impl Iterator<Item = Direction> + '_ {
    Direction::ALL
        .into_iter()
        .filter(move |&dir| slide(grid, dir).changed())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineMove {
    from: usize,
    to: usize,
    value: u32,
    merged_into: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedLine {
    cells: Vec<u32>,
    score: u64,
    moves: Vec<LineMove>,
}

/// Slides a single line toward index 0.
fn resolve_line(line: &[u32]) -> ResolvedLine {
    let tiles = line
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, value)| value != 0)
        .collect::<Vec<_>>();

    let mut cells = Vec::with_capacity(line.len());
    let mut score = 0;
    let mut moves = Vec::with_capacity(tiles.len());
    let mut i = 0;
    while i < tiles.len() {
        let (from, value) = tiles[i];
        let to = cells.len();
        match tiles.get(i + 1) {
            Some(&(partner, partner_value)) if partner_value == value => {
                let merged = value
                    .checked_mul(2)
                    .expect("merged tile value should fit in u32");
                cells.push(merged);
                score += u64::from(merged);
                for src in [from, partner] {
                    moves.push(LineMove {
                        from: src,
                        to,
                        value,
                        merged_into: Some(merged),
                    });
                }
                i += 2;
            }
            _ => {
                cells.push(value);
                moves.push(LineMove {
                    from,
                    to,
                    value,
                    merged_into: None,
                });
                i += 1;
            }
        }
    }
    cells.resize(line.len(), 0);

    ResolvedLine {
        cells,
        score,
        moves,
    }
}
