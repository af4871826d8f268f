use serde::Serialize;

use crate::{Direction, SlideOutcome};

/// Game statistics tracking score, successful moves, and merges.
///
/// - **Score**: Sum of the values of every tile created by a merge
/// - **Moves**: Number of slides that changed the grid
/// - **Merges**: Number of pairs of tiles combined
/// - **Direction counter**: Moves per direction, indexed by [`Direction::as_index`]
/// - **Highest tile**: Largest tile value seen on the grid
///
/// Slides that leave the grid unchanged are not recorded.
///
/// # Example
///
/// ```
/// use slide2048_engine::{Direction, GameStats, Grid, slide};
///
/// let grid = Grid::from_rows(&[[2, 2], [4, 4]]).unwrap();
/// let outcome = slide(&grid, Direction::Left);
///
/// let mut stats = GameStats::new();
/// stats.record_slide(Direction::Left, &outcome);
///
/// assert_eq!(stats.score(), 12);
/// assert_eq!(stats.merges(), 2);
/// assert_eq!(stats.highest_tile(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    moves: usize,
    merges: usize,
    direction_counter: [usize; Direction::LEN],
    highest_tile: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            moves: 0,
            merges: 0,
            direction_counter: [0; Direction::LEN],
            highest_tile: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the number of slides that changed the grid.
    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub const fn merges(&self) -> usize {
        self.merges
    }

    #[must_use]
    pub const fn direction_counter(&self) -> &[usize; Direction::LEN] {
        &self.direction_counter
    }

    #[must_use]
    pub const fn highest_tile(&self) -> u32 {
        self.highest_tile
    }

    /// Records the highest tile of a freshly spawned grid.
    pub(crate) fn observe_tile(&mut self, value: u32) {
        self.highest_tile = self.highest_tile.max(value);
    }

    /// Updates statistics after a slide.
    ///
    /// Unchanged slides are ignored.
    pub fn record_slide(&mut self, direction: Direction, outcome: &SlideOutcome) {
        if !outcome.changed() {
            return;
        }
        self.moves += 1;
        self.merges += outcome.merges();
        self.direction_counter[direction.as_index()] += 1;
        self.score += outcome.score_delta();
        self.observe_tile(outcome.grid().max_tile());
    }
}
