use crate::util::{grouped, load_pattern};
use anyhow::Result;
use clap::Args;
use quadlife::{ArrayEngine, GoLEngine, HashLifeEngine};

#[derive(Args, Debug)]
pub(super) struct CompareArgs {
    /// Name of a library pattern, see the `patterns` subcommand
    pattern: Option<String>,

    /// Start from a random soup of side 2^RANDOM instead of a named pattern
    #[arg(short, long)]
    random: Option<u32>,

    /// Seed for the random soup
    #[arg(long)]
    seed: Option<u64>,

    /// Side of the baseline square is 2^array_log2, centred on the origin
    #[arg(short, long, default_value_t = 8)]
    array_log2: u32,

    /// Every comparison is done after 2^step_log2 generations
    #[arg(short, long, default_value_t = 0)]
    step_log2: u32,

    /// Number of comparisons
    #[arg(short, long, default_value_t = 256)]
    count: u64,
}

pub(super) fn run_compare(args: CompareArgs) -> Result<()> {
    let pattern = load_pattern(args.pattern.as_deref(), args.random, args.seed)?;
    let half = (1i64 << args.array_log2.clamp(1, 62)) / 2;
    let mut baseline = ArrayEngine::new(args.array_log2, (-half, -half))?;
    let mut hashlife = HashLifeEngine::new();
    baseline.load_pattern(&pattern)?;
    hashlife.load_pattern(&pattern)?;
    let window = baseline.bounds();

    for i in 1..=args.count {
        baseline.step(args.step_log2)?;
        hashlife.step(args.step_log2)?;
        let expected = baseline.current_state(window);
        let actual = hashlife.current_state(window);
        if expected != actual {
            println!(
                "Engines differ after {} generations: baseline has {} cells, hashlife {} \
                 (the baseline border is dead, so escaping patterns diverge)",
                grouped(i << args.step_log2),
                grouped(expected.population()),
                grouped(actual.population()),
            );
            return Ok(());
        }
    }
    println!(
        "Engines agree for {} generations",
        grouped(args.count << args.step_log2)
    );
    Ok(())
}
