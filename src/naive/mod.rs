mod engine;

pub use engine::ArrayEngine;
