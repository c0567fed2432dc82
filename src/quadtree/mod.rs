mod addressing;
mod governor;
mod hashlife;
mod memory;
mod node;
mod step_cache;

/// Quads above this level are never built, so that `1 << level` and every
/// coordinate inside the universe fit in an `i64`.
pub const MAX_LEVEL: u32 = 60;
/// The fastest step supported: a `MAX_LEVEL` universe advanced `2^MAX_SPEED` generations.
pub const MAX_SPEED: u32 = MAX_LEVEL - 2;

use governor::CacheGovernor;
use memory::NodeStore;
use node::{QuadId, QuadNode};
use step_cache::{StepCache, StepMemo};

pub use hashlife::{EngineReport, HashLifeEngine};
