use std::path::PathBuf;

use anyhow::Context as _;
use rand::Rng as _;
use slide2048_engine::{GameConfig, GameSeed};

use crate::util;

/// Game settings shared by every command.
///
/// Settings are layered: defaults, then the JSON config file, then flags.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameArgs {
    /// JSON file with game settings (`size`, `win_target`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Side length of the grid
    #[arg(long)]
    size: Option<usize>,
    /// Tile value that wins the game
    #[arg(long)]
    win_target: Option<u32>,
    /// Seed for tile spawning, as 32 hex characters (random if omitted)
    #[arg(long)]
    seed: Option<GameSeed>,
}

impl GameArgs {
    pub(crate) fn resolve_config(&self) -> anyhow::Result<GameConfig> {
        let base = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None => GameConfig::default(),
        };
        let config = self.apply_overrides(base);
        config
            .validate()
            .with_context(|| format!("Invalid game configuration: {config:?}"))?;
        Ok(config)
    }

    fn apply_overrides(&self, mut config: GameConfig) -> GameConfig {
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(win_target) = self.win_target {
            config.win_target = win_target;
        }
        config
    }

    pub(crate) fn seed(&self) -> GameSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}
