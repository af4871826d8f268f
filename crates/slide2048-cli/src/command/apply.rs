use std::path::PathBuf;

use anyhow::bail;
use log::{info, warn};
use serde::Serialize;
use slide2048_engine::{
    Direction, GameConfig, GameSeed, GameService, GameStats, GameStatus, Grid, TileSource,
};

use crate::{config::GameArgs, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ApplyArg {
    #[clap(flatten)]
    game: GameArgs,
    /// Moves to apply as letters L, R, U, D (case-insensitive, whitespace ignored)
    #[arg(long)]
    moves: String,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct StepRecord {
    direction: Direction,
    changed: bool,
    score: u64,
    status: GameStatus,
}

#[derive(Debug, Clone, Serialize)]
struct FinalState {
    seed: GameSeed,
    config: GameConfig,
    grid: Grid,
    score: u64,
    status: GameStatus,
    is_won: bool,
    is_over: bool,
    stats: GameStats,
    steps: Vec<StepRecord>,
}

fn parse_moves(moves: &str) -> anyhow::Result<Vec<Direction>> {
    moves
        .chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(i, c)| match Direction::from_char(c) {
            Some(dir) => Ok(dir),
            None => bail!("Invalid move {c:?} at position {i}; expected one of L, R, U, D"),
        })
        .collect()
}

fn apply_moves<S>(game: &mut GameService<S>, moves: &[Direction]) -> Vec<StepRecord>
where
    S: TileSource,
{
    moves
        .iter()
        .map(|&direction| {
            let changed = match direction {
                Direction::Left => game.slide_left(),
                Direction::Right => game.slide_right(),
                Direction::Up => game.slide_up(),
                Direction::Down => game.slide_down(),
            };
            StepRecord {
                direction,
                changed,
                score: game.score(),
                status: game.status(),
            }
        })
        .collect()
}

pub(crate) fn run(arg: &ApplyArg) -> anyhow::Result<()> {
    let ApplyArg {
        game: game_args,
        moves,
        output,
    } = arg;
    let config = game_args.resolve_config()?;
    let seed = game_args.seed();
    let moves = parse_moves(moves)?;

    let mut game = GameService::from_config(config, seed)?;
    info!("Applying {} moves (seed {seed})", moves.len());
    let steps = apply_moves(&mut game, &moves);

    let ignored = steps.iter().filter(|s| !s.changed).count();
    if ignored > 0 {
        warn!("{ignored} of {} moves did not change the grid", steps.len());
    }
    info!("Final score {} ({})", game.score(), game.status());

    let state = FinalState {
        seed,
        config,
        grid: game.grid().clone(),
        score: game.score(),
        status: game.status(),
        is_won: game.is_won(),
        is_over: game.is_over(),
        stats: game.stats().clone(),
        steps,
    };
    util::save_json(&state, output.as_deref())
}
