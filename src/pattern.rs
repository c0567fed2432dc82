use crate::LifeRect;
use anyhow::{anyhow, bail, Result};
use rand::{Rng, SeedableRng};

/// Coordinates of live cells, `(x, y)` with `y` growing northwards.
type Cell = (i64, i64);

/// A finite set of live cells on the infinite plane.
///
/// Cells are kept sorted and deduplicated, so two patterns compare equal iff
/// they contain the same cells. This is the exchange format between engines:
/// [`GoLEngine::load_pattern`](crate::GoLEngine::load_pattern) writes one into
/// an engine and [`GoLEngine::current_state`](crate::GoLEngine::current_state)
/// reads a region back.
///
/// # Example
///
/// ```rust
/// use quadlife::{library, Pattern};
///
/// let glider = Pattern::from_plaintext(library::GLIDER).unwrap();
/// assert_eq!(glider.population(), 5);
/// assert_eq!(glider.cells()[0], (0, -2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pattern {
    cells: Vec<Cell>,
}

impl Pattern {
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut cells: Vec<Cell> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Self { cells }
    }

    /// Parses a plaintext cell diagram.
    ///
    /// `O` or `*` is a live cell and `.` a dead one; lines starting with `!`
    /// are comments. The first row is placed at `y = 0` and every following row
    /// one cell further south, with the leftmost column at `x = 0`.
    pub fn from_plaintext(text: &str) -> Result<Self> {
        let mut cells = vec![];
        let rows = text
            .lines()
            .map(|line| line.trim_end())
            .filter(|line| !line.starts_with('!'));
        for (row, line) in rows.enumerate() {
            for (col, c) in line.chars().enumerate() {
                match c {
                    'O' | '*' => cells.push((col as i64, -(row as i64))),
                    '.' => (),
                    other => bail!(
                        "unexpected character {:?} at row {}, column {}",
                        other,
                        row + 1,
                        col + 1
                    ),
                }
            }
        }
        Ok(Self::from_cells(cells))
    }

    /// Random soup: every cell of the `2^size_log2` square whose lower-left
    /// corner is the origin is alive with probability 1/2.
    ///
    /// The same `seed` always yields the same pattern.
    pub fn random(size_log2: u32, seed: Option<u64>) -> Result<Self> {
        if size_log2 > 12 {
            return Err(anyhow!("size_log2 {} is too large", size_log2));
        }
        let n = 1usize << size_log2;
        let mut bytes = vec![0u8; (n * n).div_ceil(8)];
        if let Some(x) = seed {
            rand_chacha::ChaCha8Rng::seed_from_u64(x)
        } else {
            rand_chacha::ChaCha8Rng::from_os_rng()
        }
        .fill(&mut bytes[..]);

        let cells = (0..n * n)
            .filter(|&i| (bytes[i / 8] >> (i % 8)) & 1 == 1)
            .map(|i| ((i % n) as i64, (i / n) as i64));
        Ok(Self::from_cells(cells))
    }

    /// Live cells in ascending `(x, y)` order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn population(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The smallest rectangle containing every live cell.
    pub fn bounds(&self) -> Option<LifeRect> {
        let &(min_x, _) = self.cells.first()?;
        let &(max_x, _) = self.cells.last()?;
        let min_y = self.cells.iter().map(|c| c.1).min()?;
        let max_y = self.cells.iter().map(|c| c.1).max()?;
        Some(LifeRect::new(
            min_x,
            max_y,
            max_x - min_x + 1,
            max_y - min_y + 1,
        ))
    }

    pub fn translated(&self, dx: i64, dy: i64) -> Self {
        Self::from_cells(self.cells.iter().map(|&(x, y)| (x + dx, y + dy)))
    }
}
