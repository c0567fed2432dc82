mod compare;
mod run;
mod util;

use clap::{Parser, Subcommand};
use compare::{run_compare, CompareArgs};
use run::{run_simulation, RunArgs};

#[derive(Parser, Debug)]
#[command(version, about)]
struct CLIParser {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Advance a library pattern or a random soup with the HashLife engine
    Run(RunArgs),
    /// Run HashLife and the array baseline side by side and report the first divergence
    Compare(CompareArgs),
    /// List the patterns available by name
    Patterns,
}

fn main() -> anyhow::Result<()> {
    util::init_tracing();
    let args = CLIParser::parse();

    match args.action {
        Action::Run(args) => run_simulation(args),
        Action::Compare(args) => run_compare(args),
        Action::Patterns => {
            for name in quadlife::library::NAMES {
                println!("{}", name);
            }
            Ok(())
        }
    }
}
