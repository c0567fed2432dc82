#![warn(clippy::all)]

mod config;
pub mod library;
mod naive;
mod pattern;
mod quadtree;
mod rect;
mod traits;

pub use config::EngineConfig;
pub use naive::ArrayEngine;
pub use pattern::Pattern;
pub use quadtree::{EngineReport, HashLifeEngine, MAX_LEVEL, MAX_SPEED};
pub use rect::LifeRect;
pub use traits::GoLEngine;

pub type DefaultEngine = HashLifeEngine;

pub const VERSION: &str = "0.1.0";
