use clap::{Parser, Subcommand};

use self::{apply::ApplyArg, simulate::SimulateArg};

mod apply;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play many games headlessly and report their results
    Simulate(#[clap(flatten)] SimulateArg),
    /// Apply a fixed sequence of moves to one game and print the final state
    Apply(#[clap(flatten)] ApplyArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Apply(arg) => apply::run(&arg)?,
    }
    Ok(())
}
