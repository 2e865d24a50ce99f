use crate::demo::{run_demo, run_evaluation, DemoArgs, EvaluateArgs};
use clap::{Parser, Subcommand};
use clearance::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "clearance-console",
    about = "Exercise the access evaluation engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Walk a set of canned requests through the engine (default command)
    Demo(DemoArgs),
    /// Evaluate a single ad-hoc request against the seeded policies
    Evaluate(EvaluateArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Demo(args) => run_demo(args).await,
        Command::Evaluate(args) => run_evaluation(args).await,
    }
}
