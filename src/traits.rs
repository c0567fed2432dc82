use crate::{LifeRect, Pattern};
use anyhow::Result;

/// Game engine for Game of Life on the infinite plane.
///
/// Every engine exposes the same mutable-feeling surface: cells are read and
/// written by coordinate, and the whole field is advanced by powers of two
/// generations. Coordinates grow eastwards in `x` and northwards in `y`.
pub trait GoLEngine {
    /// Resets the field so that every cell is dead.
    fn clear(&mut self);

    /// Returns `true` if the cell at `(x, y)` is alive.
    ///
    /// Cells outside the region materialized by the engine are dead.
    fn get(&self, x: i64, y: i64) -> bool;

    /// Makes the cell at `(x, y)` alive or dead.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot represent the coordinate at all.
    /// Growable engines only fail for coordinates beyond their maximum size.
    fn set(&mut self, x: i64, y: i64, alive: bool) -> Result<()>;

    /// Advances the field by `2^speed` generations.
    ///
    /// # Errors
    ///
    /// Returns an error if `speed` is larger than the engine supports or if
    /// the pattern would grow beyond the largest representable field.
    /// It is guaranteed that in case of failure, the engine keeps the field
    /// it stored before the call.
    fn step(&mut self, speed: u32) -> Result<()>;

    /// Calls `set_pixel(x, y)` for every living cell inside `rect`.
    fn draw(&self, rect: LifeRect, set_pixel: &mut dyn FnMut(i64, i64));

    /// Frees accumulated caches.
    ///
    /// The default implementation does nothing. Engines should override this if they
    /// implement caching mechanisms.
    fn run_gc(&mut self) {}

    /// Returns the approximate heap memory usage of the engine in bytes.
    fn bytes_total(&self) -> usize;

    /// Writes every live cell of `pattern` into the field.
    ///
    /// Cells not mentioned by the pattern are left untouched.
    fn load_pattern(&mut self, pattern: &Pattern) -> Result<()> {
        for &(x, y) in pattern.cells() {
            self.set(x, y, true)?;
        }
        Ok(())
    }

    /// Collects the live cells inside `rect` into a [`Pattern`].
    fn current_state(&self, rect: LifeRect) -> Pattern {
        let mut cells = vec![];
        self.draw(rect, &mut |x, y| cells.push((x, y)));
        Pattern::from_cells(cells)
    }
}
