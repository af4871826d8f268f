//! Game orchestration and state management.
//!
//! This module drives the core data structures to implement a complete game:
//!
//! - [`GameService`] - One game: grid, score, win/loss status
//! - [`GameConfig`] - Grid size and win target
//! - [`GameStats`] - Score, moves, merges and highest tile
//! - [`spawn_tile`] - Random tile placement after a move
//! - [`TileSource`] - Randomness capability used for spawning
//! - [`GameSeed`] - Seed for deterministic spawning
//!
//! # Game Flow
//!
//! 1. Create a [`GameService`]; it resets itself and places two tiles
//! 2. Slide in a direction; nothing happens if the grid would not change
//! 3. Otherwise the merge result is committed and the score grows
//! 4. The game is marked won once a tile reaches the win target
//! 5. A new tile spawns, then the game is marked lost if no slide can change
//!    the grid
//!
//! # Example
//!
//! ```
//! use slide2048_engine::GameService;
//!
//! let mut game = GameService::new(4).unwrap();
//!
//! while !game.is_over() {
//!     let Some(dir) = game.legal_directions().next() else {
//!         break;
//!     };
//!     game.slide(dir);
//! }
//!
//! assert!(game.is_over());
//! assert!(game.legal_directions().next().is_none());
//! println!("final score: {}", game.score());
//! ```

pub use self::{game_service::*, game_stats::*, spawner::*};

mod game_service;
mod game_stats;
mod spawner;
