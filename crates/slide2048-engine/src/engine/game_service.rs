use log::{debug, trace};
use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    ConfigError, Direction, Grid, TileMove,
    core::slide::{self, has_legal_move},
};

use super::{
    game_stats::GameStats,
    spawner::{GameSeed, SpawnedTile, TileSource, spawn_tile},
};

/// Number of tiles placed on an empty grid by [`GameService::reset`].
const INITIAL_TILES: usize = 2;

/// Status of a game as seen by the host.
///
/// Reaching the win target does not end the game: play may continue, and a
/// game that has been won can still be lost later. [`GameService::is_won`]
/// keeps reporting the win after that.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant, derive_more::Display,
)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

/// Parameters fixed for the lifetime of a game.
///
/// Missing fields fall back to the defaults when deserialized:
///
/// ```
/// use slide2048_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "size": 5 }"#).unwrap();
/// assert_eq!(config.size, 5);
/// assert_eq!(config.win_target, GameConfig::DEFAULT_WIN_TARGET);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Side length of the square grid.
    pub size: usize,
    /// Tile value that marks the game as won.
    pub win_target: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            win_target: Self::DEFAULT_WIN_TARGET,
        }
    }
}

impl GameConfig {
    pub const DEFAULT_SIZE: usize = 4;
    pub const DEFAULT_WIN_TARGET: u32 = 2048;
    pub const MAX_SIZE: usize = 16;

    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(Grid::MIN_SIZE..=Self::MAX_SIZE).contains(&self.size) {
            return Err(ConfigError::InvalidSize {
                size: self.size,
                min: Grid::MIN_SIZE,
                max: Self::MAX_SIZE,
            });
        }
        if self.win_target < 4 || !self.win_target.is_power_of_two() {
            return Err(ConfigError::InvalidWinTarget {
                target: self.win_target,
            });
        }
        Ok(())
    }
}

/// What a successful slide did to the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub direction: Direction,
    pub score_delta: u64,
    pub moves: Vec<TileMove>,
    pub spawned: Option<SpawnedTile>,
}

/// A single game: one grid, its score, and its win/loss status.
///
/// The service owns its random source `S` (a seeded [`Pcg32`] unless another
/// [`TileSource`] is supplied). All mutation goes through `&mut self`; hosts
/// sharing one instance must serialize their calls.
///
/// # Example
///
/// ```
/// use slide2048_engine::{Direction, GameSeed, GameService};
///
/// let mut game = GameService::with_seed(4, GameSeed::from_bytes([1; 16])).unwrap();
/// assert_eq!(game.score(), 0);
/// assert_eq!(game.grid().count_empty(), 14);
///
/// assert!(Direction::ALL.into_iter().any(|dir| game.slide(dir)));
/// assert!(!game.is_over());
/// ```
#[derive(Debug, Clone)]
pub struct GameService<S = Pcg32> {
    grid: Grid,
    stats: GameStats,
    won: bool,
    lost: bool,
    win_target: u32,
    source: S,
}

impl GameService<Pcg32> {
    /// Creates a game on a `size` x `size` grid with a random seed.
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        Self::with_seed(size, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for reproducible games.
    pub fn with_seed(size: usize, seed: GameSeed) -> Result<Self, ConfigError> {
        Self::from_config(GameConfig::with_size(size), seed)
    }

    pub fn from_config(config: GameConfig, seed: GameSeed) -> Result<Self, ConfigError> {
        Self::with_source(config, seed.to_rng())
    }
}

impl<S> GameService<S>
where
    S: TileSource,
{
    /// Creates a game that draws spawn positions and values from `source`.
    ///
    /// The grid is reset immediately, so two tiles are already placed.
    pub fn with_source(config: GameConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::empty(config.size).expect("grid size should be validated by GameConfig");
        let mut this = Self {
            grid,
            stats: GameStats::new(),
            won: false,
            lost: false,
            win_target: config.win_target,
            source,
        };
        this.reset();
        Ok(this)
    }

    /// Clears the grid, score and status, then spawns the starting tiles.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.stats = GameStats::new();
        self.won = false;
        self.lost = false;
        for _ in 0..INITIAL_TILES {
            if let Some(tile) = spawn_tile(&mut self.grid, &mut self.source) {
                self.stats.observe_tile(tile.value);
            }
        }
        debug!(
            "reset {size}x{size} game (win target {target})",
            size = self.grid.size(),
            target = self.win_target
        );
    }

    /// Resets the game onto a grid of a different size.
    ///
    /// On error the current game is left untouched.
    pub fn reset_with_size(&mut self, size: usize) -> Result<(), ConfigError> {
        let config = GameConfig {
            size,
            win_target: self.win_target,
        };
        config.validate()?;
        self.grid = Grid::empty(size).expect("grid size should be validated by GameConfig");
        self.reset();
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> GameConfig {
        GameConfig {
            size: self.grid.size(),
            win_target: self.win_target,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.stats.score()
    }

    /// Returns `true` once no slide can change the grid.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.lost
    }

    /// Returns `true` once a tile has reached the win target, until reset.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.won
    }

    #[must_use]
    pub fn status(&self) -> GameStatus {
        if self.lost {
            GameStatus::Lost
        } else if self.won {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    /// Returns the directions in which a slide would change the grid.
    pub fn legal_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        let lost = self.lost;
        slide::legal_directions(&self.grid).filter(move |_| !lost)
    }

    pub fn slide_left(&mut self) -> bool {
        self.slide(Direction::Left)
    }

    pub fn slide_right(&mut self) -> bool {
        self.slide(Direction::Right)
    }

    pub fn slide_up(&mut self) -> bool {
        self.slide(Direction::Up)
    }

    pub fn slide_down(&mut self) -> bool {
        self.slide(Direction::Down)
    }

    /// Slides the grid and returns `true` if it changed.
    pub fn slide(&mut self, direction: Direction) -> bool {
        self.apply(direction).is_some()
    }

    /// Slides the grid, spawns a tile, and updates the status.
    ///
    /// Returns `None` when nothing changed, including every slide on a lost
    /// game. In that case neither the grid, the score, nor the random source
    /// is touched.
    pub fn apply(&mut self, direction: Direction) -> Option<MoveReport> {
        if self.lost {
            debug!("ignoring {direction} slide on a lost game");
            return None;
        }

        let outcome = slide::slide(&self.grid, direction);
        trace!(
            "slide {direction}: changed={} delta={}",
            outcome.changed(),
            outcome.score_delta()
        );
        if !outcome.changed() {
            return None;
        }

        self.stats.record_slide(direction, &outcome);
        let score_delta = outcome.score_delta();
        let moves = outcome.moves().to_vec();
        self.grid = outcome.into_grid();

        // won is decided on the merge result, before the spawn
        if !self.won && self.grid.max_tile() >= self.win_target {
            self.won = true;
            debug!("reached win target {} (score {})", self.win_target, self.score());
        }

        let spawned = spawn_tile(&mut self.grid, &mut self.source);
        if let Some(tile) = spawned {
            self.stats.observe_tile(tile.value);
        }

        if !has_legal_move(&self.grid) {
            self.lost = true;
            debug!(
                "no legal move left after {} moves (score {})",
                self.stats.moves(),
                self.score()
            );
        }

        Some(MoveReport {
            direction,
            score_delta,
            moves,
            spawned,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::spawner::testing::ScriptedSource;

    fn scripted_game(rows: &[&[u32]], win_target: u32) -> GameService<ScriptedSource> {
        let grid = Grid::from_rows(rows).unwrap();
        let config = GameConfig {
            size: grid.size(),
            win_target,
        };
        let mut game = GameService::with_source(config, ScriptedSource::default()).unwrap();
        game.grid = grid;
        game.source.calls = 0;
        game
    }

    fn seed(byte: u8) -> GameSeed {
        GameSeed::from_bytes([byte; 16])
    }

    mod config {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = GameConfig::default();
            assert_eq!(config.size, 4);
            assert_eq!(config.win_target, 2048);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_rejects_invalid_size() {
            for size in [0, 1, 17] {
                assert_eq!(
                    GameConfig::with_size(size).validate(),
                    Err(ConfigError::InvalidSize {
                        size,
                        min: 2,
                        max: 16
                    })
                );
            }
            assert!(GameService::new(1).is_err());
        }

        #[test]
        fn test_rejects_invalid_win_target() {
            for target in [0, 1, 2, 3, 6, 1000] {
                let config = GameConfig {
                    win_target: target,
                    ..GameConfig::default()
                };
                assert_eq!(
                    config.validate(),
                    Err(ConfigError::InvalidWinTarget { target })
                );
            }
        }

        #[test]
        fn test_rejects_unknown_fields() {
            assert!(serde_json::from_str::<GameConfig>(r#"{ "sise": 5 }"#).is_err());
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn test_reset_places_two_small_tiles() {
            for byte in 0..32 {
                let mut game = GameService::with_seed(4, seed(byte)).unwrap();
                for _ in 0..2 {
                    let tiles = game
                        .grid()
                        .cells()
                        .iter()
                        .copied()
                        .filter(|&v| v != 0)
                        .collect::<Vec<_>>();
                    assert_eq!(tiles.len(), 2);
                    assert!(tiles.iter().all(|&v| v == 2 || v == 4));
                    assert_eq!(game.score(), 0);
                    assert_eq!(game.status(), GameStatus::InProgress);
                    game.reset();
                }
            }
        }

        #[test]
        fn test_reset_clears_score_and_status() {
            let mut game = scripted_game(&[&[2, 2], &[8, 4]], 4);
            assert!(game.slide_left());
            assert!(game.is_won());
            assert!(game.is_over());
            assert_eq!(game.score(), 4);

            game.reset();
            assert_eq!(game.score(), 0);
            assert!(!game.is_won());
            assert!(!game.is_over());
            assert_eq!(game.grid().count_empty(), 2);
            assert_eq!(game.stats().moves(), 0);
        }

        #[test]
        fn test_reset_with_size() {
            let mut game = GameService::with_seed(4, seed(3)).unwrap();
            game.reset_with_size(6).unwrap();
            assert_eq!(game.grid().size(), 6);
            assert_eq!(game.grid().count_empty(), 34);
            assert_eq!(game.config().win_target, 2048);

            let before = game.grid().clone();
            assert!(game.reset_with_size(1).is_err());
            assert_eq!(game.grid(), &before);
        }

        #[test]
        fn test_same_seed_same_game() {
            let script = "LURDDLUURRDLLDRU".repeat(8);
            let mut game1 = GameService::with_seed(4, seed(42)).unwrap();
            let mut game2 = GameService::with_seed(4, seed(42)).unwrap();
            for c in script.chars() {
                let dir = Direction::from_char(c).unwrap();
                assert_eq!(game1.slide(dir), game2.slide(dir));
            }
            assert_eq!(game1.grid(), game2.grid());
            assert_eq!(game1.score(), game2.score());
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn test_unchanged_slide_does_not_spawn() {
            let mut game = scripted_game(&[&[2, 4, 0], &[0, 0, 0], &[0, 0, 0]], 2048);
            let before = game.grid().clone();

            assert!(!game.slide_left());
            assert_eq!(game.grid(), &before);
            assert_eq!(game.source.calls, 0);
            assert_eq!(game.stats().moves(), 0);
        }

        #[test]
        fn test_changed_slide_merges_then_spawns() {
            let mut game = scripted_game(&[&[2, 2, 2], &[0, 0, 0], &[0, 0, 4]], 2048);

            let report = game.apply(Direction::Left).unwrap();

            assert_eq!(report.score_delta, 4);
            // first empty cell in row-major order after the merge is (0, 2)
            assert_eq!(
                report.spawned,
                Some(SpawnedTile {
                    position: (0, 2),
                    value: 2
                })
            );
            assert_eq!(
                game.grid().to_rows(),
                vec![vec![4, 2, 2], vec![0, 0, 0], vec![4, 0, 0]]
            );
            assert_eq!(game.score(), 4);
            assert_eq!(game.status(), GameStatus::InProgress);
        }

        #[test]
        fn test_directional_helpers() {
            let start: &[&[u32]] = &[&[0, 0, 0], &[0, 2, 0], &[0, 0, 0]];
            let cases: [(fn(&mut GameService<ScriptedSource>) -> bool, (usize, usize)); 4] = [
                (GameService::<ScriptedSource>::slide_left, (1, 0)),
                (GameService::<ScriptedSource>::slide_right, (1, 2)),
                (GameService::<ScriptedSource>::slide_up, (0, 1)),
                (GameService::<ScriptedSource>::slide_down, (2, 1)),
            ];
            for (slide_fn, expected) in cases {
                let mut game = scripted_game(start, 2048);
                // spawn a 4 so it cannot be confused with the moved tile
                game.source = ScriptedSource::new(&[], &[0.95]);
                assert!(slide_fn(&mut game));
                assert_eq!(game.grid().get(expected.0, expected.1), 2);
                assert_eq!(
                    game.grid().cells().iter().filter(|&&v| v == 4).count(),
                    1
                );
            }
        }

        #[test]
        fn test_score_matches_sum_of_deltas() {
            let mut game = GameService::with_seed(4, seed(9)).unwrap();
            let mut total = 0;
            let mut previous = 0;
            for i in 0..400 {
                if game.is_over() {
                    break;
                }
                let dir = Direction::ALL[i % Direction::LEN];
                if let Some(report) = game.apply(dir) {
                    total += report.score_delta;
                }
                assert!(game.score() >= previous);
                previous = game.score();
                assert!(
                    game.grid()
                        .cells()
                        .iter()
                        .all(|&v| v == 0 || v.is_power_of_two())
                );
            }
            assert_eq!(game.score(), total);
            assert_eq!(game.stats().score(), total);
        }
    }

    mod status {
        use super::*;

        #[test]
        fn test_win_is_sticky_and_play_continues() {
            let mut game = scripted_game(&[&[4, 4, 8], &[0, 0, 0], &[0, 0, 0]], 8);
            assert!(!game.is_won());

            assert!(game.slide_left());
            // [8, 8, 0] plus a spawned 2 at (0, 2)
            assert!(game.is_won());
            assert!(!game.is_over());
            assert_eq!(game.status(), GameStatus::Won);

            assert!(game.slide_left());
            assert_eq!(game.grid().get(0, 0), 16);
            assert!(game.is_won());
            assert_eq!(game.status(), GameStatus::Won);
        }

        #[test]
        fn test_deadlock_after_spawn_is_lost() {
            let mut game = scripted_game(&[&[4, 2], &[8, 0]], 2048);

            assert!(game.slide_right());
            // [4, 2] / [0, 8], then a 2 fills (1, 0)
            assert_eq!(game.grid().to_rows(), vec![vec![4, 2], vec![2, 8]]);
            assert!(game.is_over());
            assert!(!game.is_won());
            assert_eq!(game.status(), GameStatus::Lost);
            assert_eq!(game.legal_directions().count(), 0);
        }

        #[test]
        fn test_spawn_that_opens_a_merge_is_not_lost() {
            let mut game = scripted_game(&[&[4, 2], &[8, 0]], 2048);
            game.source = ScriptedSource::new(&[], &[0.95]);

            assert!(game.slide_right());
            assert_eq!(game.grid().to_rows(), vec![vec![4, 2], vec![4, 8]]);
            assert!(!game.is_over());
            assert_eq!(
                game.legal_directions().collect::<Vec<_>>(),
                vec![Direction::Up, Direction::Down]
            );
        }

        #[test]
        fn test_lost_game_rejects_slides_without_mutation() {
            let mut game = scripted_game(&[&[4, 2], &[8, 0]], 2048);
            assert!(game.slide_right());
            assert!(game.is_over());

            let grid = game.grid().clone();
            let score = game.score();
            let calls = game.source.calls;
            for dir in Direction::ALL {
                assert!(!game.slide(dir));
                assert!(game.apply(dir).is_none());
            }
            assert_eq!(game.grid(), &grid);
            assert_eq!(game.score(), score);
            assert_eq!(game.source.calls, calls);
            assert_eq!(game.status(), GameStatus::Lost);
        }

        #[test]
        fn test_won_then_lost_keeps_both_flags() {
            let mut game = scripted_game(&[&[2, 2], &[8, 4]], 4);

            assert!(game.slide_left());
            // [4, 0] / [8, 4] then a 2 at (0, 1): no equal neighbours remain
            assert_eq!(game.grid().to_rows(), vec![vec![4, 2], vec![8, 4]]);
            assert!(game.is_won());
            assert!(game.is_over());
            assert_eq!(game.status(), GameStatus::Lost);
        }

        #[test]
        fn test_seeded_game_eventually_ends() {
            let mut game = GameService::with_seed(3, seed(5)).unwrap();
            let mut i = 0;
            while !game.is_over() {
                // cycle through directions; with a 3x3 grid this always ends
                if !game.slide(Direction::ALL[i % Direction::LEN]) {
                    i += 1;
                }
                assert!(game.stats().moves() < 100_000);
            }
            assert!(game.legal_directions().next().is_none());
            assert!(!has_legal_move(game.grid()));
        }
    }
}
