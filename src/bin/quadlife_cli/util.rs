use anyhow::{anyhow, Result};
use chrono::Local;
use num_format::{CustomFormat, Grouping, ToFormattedString};
use quadlife::{library, Pattern};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr; verbosity is controlled by `RUST_LOG` and defaults to warnings.
pub(super) fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

pub(super) fn grouped<T: ToFormattedString>(n: T) -> String {
    let fmt = CustomFormat::builder()
        .grouping(Grouping::Standard)
        .separator("_")
        .build()
        .expect("a valid number format");
    n.to_formatted_string(&fmt)
}

pub(super) fn local_time() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

/// Resolves the pattern source shared by the subcommands.
pub(super) fn load_pattern(
    name: Option<&str>,
    random_log2: Option<u32>,
    seed: Option<u64>,
) -> Result<Pattern> {
    match (name, random_log2) {
        (Some(name), None) => {
            let text = library::by_name(name).ok_or_else(|| {
                anyhow!(
                    "unknown pattern {:?}, expected one of {}",
                    name,
                    library::NAMES.join(", ")
                )
            })?;
            Pattern::from_plaintext(text)
        }
        (None, Some(size_log2)) => Pattern::random(size_log2, seed),
        (None, None) => Err(anyhow!("either a pattern name or --random is required")),
        (Some(_), Some(_)) => Err(anyhow!("a pattern name and --random are mutually exclusive")),
    }
}
