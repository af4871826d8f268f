use std::path::PathBuf;

use log::{debug, info};
use rand::{Rng, seq::IndexedRandom as _};
use serde::Serialize;
use slide2048_engine::{
    Direction, GameConfig, GameSeed, GameService, GameStats, Grid, TileSource, slide,
};

use crate::{config::GameArgs, util};

/// Strategy used to pick the next move.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MovePolicy {
    /// Uniformly random among the moves that change the grid
    #[default]
    Random,
    /// Left, right, up, down in turn, skipping moves that change nothing
    Cycle,
    /// The move with the largest immediate score, then the most empty cells
    Greedy,
}

impl MovePolicy {
    fn choose<S, R>(self, game: &GameService<S>, step: usize, rng: &mut R) -> Option<Direction>
    where
        S: TileSource,
        R: Rng + ?Sized,
    {
        let legal = game.legal_directions().collect::<Vec<_>>();
        match self {
            MovePolicy::Random => legal.choose(rng).copied(),
            MovePolicy::Cycle => (0..Direction::LEN)
                .map(|offset| Direction::ALL[(step + offset) % Direction::LEN])
                .find(|dir| legal.contains(dir)),
            MovePolicy::Greedy => greedy_choice(game.grid(), legal),
        }
    }
}

fn greedy_choice<I>(grid: &Grid, candidates: I) -> Option<Direction>
where
    I: IntoIterator<Item = Direction>,
{
    candidates.into_iter().max_by_key(|&dir| {
        let outcome = slide(grid, dir);
        (outcome.score_delta(), outcome.grid().count_empty())
    })
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    game: GameArgs,
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,
    /// How to pick each move
    #[arg(long, value_enum, default_value_t = MovePolicy::Random)]
    policy: MovePolicy,
    /// Stop a game after this many moves, even if it is not over
    #[arg(long, default_value_t = 100_000)]
    max_moves: usize,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct GameResult {
    index: usize,
    seed: GameSeed,
    score: u64,
    won: bool,
    over: bool,
    stats: GameStats,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationSummary {
    config: GameConfig,
    seed: GameSeed,
    policy: MovePolicy,
    games: usize,
    wins: usize,
    finished: usize,
    mean_score: f64,
    max_score: u64,
    best_tile: u32,
    results: Vec<GameResult>,
}

impl SimulationSummary {
    #[expect(clippy::cast_precision_loss)]
    fn new(config: GameConfig, seed: GameSeed, policy: MovePolicy, results: Vec<GameResult>) -> Self {
        let games = results.len();
        let total: u64 = results.iter().map(|r| r.score).sum();
        let mean_score = if games == 0 {
            0.0
        } else {
            total as f64 / games as f64
        };
        Self {
            config,
            seed,
            policy,
            games,
            wins: results.iter().filter(|r| r.won).count(),
            finished: results.iter().filter(|r| r.over).count(),
            mean_score,
            max_score: results.iter().map(|r| r.score).max().unwrap_or(0),
            best_tile: results
                .iter()
                .map(|r| r.stats.highest_tile())
                .max()
                .unwrap_or(0),
            results,
        }
    }
}

fn play_game<R>(
    index: usize,
    config: GameConfig,
    seed: GameSeed,
    policy: MovePolicy,
    max_moves: usize,
    rng: &mut R,
) -> anyhow::Result<GameResult>
where
    R: Rng + ?Sized,
{
    let mut game = GameService::from_config(config, seed)?;
    let mut step = 0;
    while !game.is_over() && game.stats().moves() < max_moves {
        let Some(dir) = policy.choose(&game, step, rng) else {
            break;
        };
        game.slide(dir);
        step += 1;
    }
    debug!(
        "game {index}: score {} after {} moves (highest tile {})",
        game.score(),
        game.stats().moves(),
        game.stats().highest_tile()
    );
    Ok(GameResult {
        index,
        seed,
        score: game.score(),
        won: game.is_won(),
        over: game.is_over(),
        stats: game.stats().clone(),
    })
}

fn simulate(
    config: GameConfig,
    seed: GameSeed,
    policy: MovePolicy,
    games: usize,
    max_moves: usize,
) -> anyhow::Result<SimulationSummary> {
    // every game seed and policy decision derives from the base seed
    let mut seeds = seed.to_rng();
    let mut policy_rng = seeds.random::<GameSeed>().to_rng();
    let results = (0..games)
        .map(|index| {
            let game_seed = seeds.random();
            play_game(index, config, game_seed, policy, max_moves, &mut policy_rng)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(SimulationSummary::new(config, seed, policy, results))
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        game,
        games,
        policy,
        max_moves,
        output,
    } = arg;
    let config = game.resolve_config()?;
    let seed = game.seed();

    info!(
        "Simulating {games} games on a {size}x{size} grid (policy {policy:?}, seed {seed})",
        size = config.size
    );
    let summary = simulate(config, seed, *policy, *games, *max_moves)?;
    info!(
        "Mean score {:.1}, max score {}, best tile {}, {} of {} games won",
        summary.mean_score, summary.max_score, summary.best_tile, summary.wins, summary.games
    );

    util::save_json(&summary, output.as_deref())
}
