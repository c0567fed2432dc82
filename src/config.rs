use crate::MAX_LEVEL;
use anyhow::{bail, Result};

/// Tuning knobs of [`HashLifeEngine`](crate::HashLifeEngine).
///
/// # Example
///
/// ```rust
/// use quadlife::{EngineConfig, HashLifeEngine};
///
/// let config = EngineConfig::default()
///     .with_initial_level(6)
///     .with_cache_limit(50_000);
/// let engine = HashLifeEngine::with_config(config).unwrap();
/// assert_eq!(engine.level(), 6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Level of the blank universe created by `new` and `clear`;
    /// the universe spans `2^initial_level` cells on a side.
    pub initial_level: u32,
    /// Soft ceiling on the combined number of canonical nodes and
    /// memoized steps. Raised automatically after every eviction.
    pub cache_limit: usize,
    /// The ceiling is compared against the cache sizes only once per this
    /// many `step` calls.
    pub check_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_level: 9,
            cache_limit: 200_000,
            check_interval: 512,
        }
    }
}

impl EngineConfig {
    /// The smallest universe whose center still has a ring to inspect.
    pub const MIN_INITIAL_LEVEL: u32 = 3;

    pub fn with_initial_level(mut self, level: u32) -> Self {
        self.initial_level = level;
        self
    }

    pub fn with_cache_limit(mut self, limit: usize) -> Self {
        self.cache_limit = limit;
        self
    }

    pub fn with_check_interval(mut self, interval: u64) -> Self {
        self.check_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_INITIAL_LEVEL..=MAX_LEVEL).contains(&self.initial_level) {
            bail!(
                "initial_level {} is outside {}..={}",
                self.initial_level,
                Self::MIN_INITIAL_LEVEL,
                MAX_LEVEL
            );
        }
        if self.check_interval == 0 {
            bail!("check_interval must be positive");
        }
        Ok(())
    }
}
