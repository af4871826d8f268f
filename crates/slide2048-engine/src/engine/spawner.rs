use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Grid, SeedParseError};

/// Probability that a spawned tile is a 2 rather than a 4.
pub const TWO_PROBABILITY: f64 = 0.9;

/// Randomness capability used to place new tiles.
///
/// Every [`rand::Rng`] is a `TileSource`. Tests can substitute a scripted
/// implementation to pin down exactly where tiles appear.
pub trait TileSource {
    /// Returns an index chosen uniformly from `0..len`.
    ///
    /// `len` is never zero.
    fn choose_index(&mut self, len: usize) -> usize;

    /// Returns a value uniformly distributed in `[0, 1)`.
    fn unit(&mut self) -> f64;
}

impl<R> TileSource for R
where
    R: Rng + ?Sized,
{
    fn choose_index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }

    fn unit(&mut self) -> f64 {
        self.random()
    }
}

/// A tile placed by [`spawn_tile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpawnedTile {
    pub position: (usize, usize),
    pub value: u32,
}

/// Places a 2 (90%) or a 4 (10%) on a uniformly chosen empty cell.
///
/// Returns `None` without touching `source` when the grid is full.
pub fn spawn_tile<S>(grid: &mut Grid, source: &mut S) -> Option<SpawnedTile>
where
    S: TileSource + ?Sized,
{
    let empty = grid.empty_positions().collect::<Vec<_>>();
    if empty.is_empty() {
        return None;
    }
    let (row, col) = empty[source.choose_index(empty.len())];
    let value = if source.unit() < TWO_PROBABILITY { 2 } else { 4 };
    grid.set(row, col, value);
    Some(SpawnedTile {
        position: (row, col),
        value,
    })
}

/// Seed for deterministic tile spawning.
///
/// A 128-bit (16-byte) seed for the [`Pcg32`] generator behind a
/// [`GameService`](crate::GameService). The same seed and the same sequence of
/// slides always produce the same game.
///
/// Serialized and parsed as a 32-character hex string.
///
/// # Example
///
/// ```
/// use slide2048_engine::{GameSeed, GameService};
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
///
/// let game1 = GameService::with_seed(4, seed).unwrap();
/// let game2 = GameService::with_seed(4, seed).unwrap();
/// assert_eq!(game1.grid(), game2.grid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSeed([u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Creates the generator this seed stands for.
    #[must_use]
    pub fn to_rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for GameSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for GameSeed {
    type Err = SeedParseError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(SeedParseError {
                reason: format!("expected 32 characters, got {}", hex_str.len()),
            });
        }
        // from_str_radix accepts a leading '+', which is not a hex digit
        if !hex_str.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(SeedParseError {
                reason: format!("non-hex character in {hex_str}"),
            });
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(|e| SeedParseError {
            reason: format!("{hex_str} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `GameSeed` values with `rng.random()`.
impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}
