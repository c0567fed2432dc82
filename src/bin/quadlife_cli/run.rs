use crate::util::{grouped, load_pattern, local_time};
use anyhow::{bail, Result};
use clap::Args;
use quadlife::{EngineConfig, GoLEngine, HashLifeEngine, LifeRect};

#[derive(Args, Debug)]
pub(super) struct RunArgs {
    /// Name of a library pattern, see the `patterns` subcommand
    pattern: Option<String>,

    /// Start from a random soup of side 2^RANDOM instead of a named pattern
    #[arg(short, long)]
    random: Option<u32>,

    /// Seed for the random soup
    #[arg(long)]
    seed: Option<u64>,

    /// The pattern will be updated by 2^gens_log2 generations
    #[arg(short, long)]
    gens_log2: u32,

    /// How many generations to update at once, uses `gens_log2` by default
    #[arg(short, long)]
    step_log2: Option<u32>,

    /// Soft ceiling on the number of cached quads and step results
    #[arg(short, long)]
    cache_limit: Option<usize>,

    /// Render the square of this side centred on the origin after the run
    #[arg(long)]
    render: Option<i64>,

    /// Every rendered character stands for a 2^scale square of cells
    #[arg(long, default_value_t = 0)]
    scale: u32,
}

pub(super) fn run_simulation(args: RunArgs) -> Result<()> {
    let pattern = load_pattern(args.pattern.as_deref(), args.random, args.seed)?;
    let mut config = EngineConfig::default();
    if let Some(limit) = args.cache_limit {
        config = config.with_cache_limit(limit);
    }
    let mut engine = HashLifeEngine::with_config(config)?;

    let timer = std::time::Instant::now();
    engine.load_pattern(&pattern)?;
    println!(
        "[{}] Loaded pattern of {} cells in {:.3} secs",
        local_time(),
        grouped(pattern.population()),
        timer.elapsed().as_secs_f64()
    );

    let step_log2 = args.step_log2.unwrap_or(args.gens_log2);
    if step_log2 > args.gens_log2 {
        bail!("step_log2 must not exceed gens_log2");
    }
    if args.gens_log2 - step_log2 > 40 {
        bail!("2^{} chunks are too many, increase step_log2", args.gens_log2 - step_log2);
    }
    let chunks = 1u128 << (args.gens_log2 - step_log2);
    let timer = std::time::Instant::now();
    for i in 1..=chunks {
        engine.step(step_log2)?;
        if i < chunks {
            println!(
                "[{}] Updated by {} out of {} generations",
                local_time(),
                grouped(i << step_log2),
                grouped(chunks << step_log2)
            );
        }
    }
    println!(
        "[{}] Updated pattern by 2^{} generations in {:.3} secs",
        local_time(),
        args.gens_log2,
        timer.elapsed().as_secs_f64()
    );
    println!("Population: {}", grouped(engine.population()));
    println!("Universe level: {}", engine.level());
    print!("{}", engine.report());

    if let Some(side) = args.render {
        render(&engine, side, args.scale);
    }
    Ok(())
}

fn render(engine: &HashLifeEngine, side: i64, scale: u32) {
    let rect = LifeRect::new(-side / 2, side - side / 2 - 1, side, side);
    let cells = (side >> scale).max(1) as usize;
    let mut canvas = vec![vec!['.'; cells]; cells];
    engine.draw_scaled(rect, scale, |x, y| {
        let col = ((x - rect.x) >> scale) as usize;
        let row = ((rect.y - y) >> scale) as usize;
        if let Some(c) = canvas.get_mut(row).and_then(|r| r.get_mut(col)) {
            *c = 'O';
        }
    });
    for row in canvas {
        println!("{}", row.into_iter().collect::<String>());
    }
}
