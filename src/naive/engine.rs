use crate::{GoLEngine, LifeRect};
use anyhow::{bail, Result};

/// A straightforward engine over a fixed square of cells, packed 64 per `u64`
/// and advanced with bitwise full adders one generation at a time. Its
/// performance is pattern-oblivious, which makes it a baseline to check
/// [`HashLifeEngine`](crate::HashLifeEngine) against.
///
/// # Limitations
///
/// - The square has side `2^size_log2`, with `size_log2` in `6..=16`
/// - Everything outside the square is permanently dead, so patterns reaching
///   the border evolve differently than on the infinite plane
///
/// # Example
///
/// ```rust
/// use quadlife::{ArrayEngine, GoLEngine, LifeRect, Pattern};
///
/// let mut engine = ArrayEngine::new(6, (-32, -32)).unwrap();
/// engine.load_pattern(&Pattern::from_cells([(-1, 0), (0, 0), (1, 0)])).unwrap();
/// engine.step(0).unwrap();
/// let state = engine.current_state(LifeRect::new(-2, 2, 5, 5));
/// assert_eq!(state.cells(), &[(0, -1), (0, 0), (0, 1)]);
/// ```
pub struct ArrayEngine {
    /// Rows from south to north; bit `i` of a word is `i` cells east of the word's first cell
    data: Vec<u64>,
    /// The side length of the square grid (a power of 2)
    n: usize,
    /// Lower-left cell of the square
    origin: (i64, i64),
}

impl ArrayEngine {
    const CELLS_IN_CHUNK: usize = 64;
    const MAX_SIZE_LOG2: u32 = 16;

    pub fn new(size_log2: u32, origin: (i64, i64)) -> Result<Self> {
        let min_size_log2 = Self::CELLS_IN_CHUNK.ilog2();
        if size_log2 < min_size_log2 {
            bail!(
                "size_log2 must be at least {} for ArrayEngine, got {}",
                min_size_log2,
                size_log2
            );
        }
        if size_log2 > Self::MAX_SIZE_LOG2 {
            bail!("size_log2 {} is too large for ArrayEngine", size_log2);
        }
        let n = 1usize << size_log2;
        let side = n as i64;
        if origin.0.checked_add(side).is_none() || origin.1.checked_add(side).is_none() {
            bail!("ArrayEngine square at {:?} does not fit in i64", origin);
        }
        Ok(Self {
            data: vec![0; n * n / Self::CELLS_IN_CHUNK],
            n,
            origin,
        })
    }

    /// The square covered by the engine.
    pub fn bounds(&self) -> LifeRect {
        LifeRect::from_lower_left(self.origin.0, self.origin.1, self.n as i64)
    }

    pub fn population(&self) -> u64 {
        self.data.iter().map(|w| w.count_ones() as u64).sum()
    }

    fn words_per_row(&self) -> usize {
        self.n / Self::CELLS_IN_CHUNK
    }

    /// Word index and bit offset of `(x, y)`, or `None` outside the square.
    fn locate(&self, x: i64, y: i64) -> Option<(usize, u32)> {
        let dx = usize::try_from(x.checked_sub(self.origin.0)?).ok()?;
        let dy = usize::try_from(y.checked_sub(self.origin.1)?).ok()?;
        if dx >= self.n || dy >= self.n {
            return None;
        }
        Some((
            dy * self.words_per_row() + dx / Self::CELLS_IN_CHUNK,
            (dx % Self::CELLS_IN_CHUNK) as u32,
        ))
    }

    /// Next state of the 64 cells of `curr[1]`.
    ///
    /// Each argument holds the west neighbour word, the word itself and the
    /// east neighbour word of one row.
    #[inline]
    fn update_word(prev: [u64; 3], curr: [u64; 3], next: [u64; 3]) -> u64 {
        let shift = Self::CELLS_IN_CHUNK - 1;
        let b = prev[1];
        let a = (b << 1) | (prev[0] >> shift);
        let c = (b >> 1) | (prev[2] << shift);
        let i = curr[1];
        let h = (i << 1) | (curr[0] >> shift);
        let d = (i >> 1) | (curr[2] << shift);
        let f = next[1];
        let g = (f << 1) | (next[0] >> shift);
        let e = (f >> 1) | (next[2] << shift);
        let (ab0, ab1, cd0, cd1) = (a ^ b, a & b, c ^ d, c & d);
        let (ef0, ef1, gh0, gh1) = (e ^ f, e & f, g ^ h, g & h);
        let (ad0, ad1, ad2) = (ab0 ^ cd0, ab1 ^ cd1 ^ (ab0 & cd0), ab1 & cd1);
        let (eh0, eh1, eh2) = (ef0 ^ gh0, ef1 ^ gh1 ^ (ef0 & gh0), ef1 & gh1);
        let (ah0, xx, yy) = (ad0 ^ eh0, ad0 & eh0, ad1 ^ eh1);
        let (ah1, ah23) = (xx ^ yy, ad2 | eh2 | (ad1 & eh1) | (xx & yy));
        let z = !ah23 & ah1;
        let (i2, i3) = (!ah0 & z, ah0 & z);
        (i & i2) | i3
    }

    fn update_row(row_prev: &[u64], row_curr: &[u64], row_next: &[u64], dst: &mut [u64]) {
        let w = row_curr.len();
        let around = |row: &[u64], x: usize| {
            let west = if x == 0 { 0 } else { row[x - 1] };
            let east = if x + 1 == w { 0 } else { row[x + 1] };
            [west, row[x], east]
        };
        for (x, cell) in dst.iter_mut().enumerate() {
            *cell = Self::update_word(
                around(row_prev, x),
                around(row_curr, x),
                around(row_next, x),
            );
        }
    }

    fn update_inner(&mut self) {
        let (w, h) = (self.words_per_row(), self.n);
        let border = vec![0; w];
        let mut row_prev = border.clone();
        let mut row_curr = self.data[..w].to_vec();
        let mut row_next = self.data[w..2 * w].to_vec();

        for y in 0..h {
            let dst = &mut self.data[y * w..(y + 1) * w];
            Self::update_row(&row_prev, &row_curr, &row_next, dst);
            std::mem::swap(&mut row_prev, &mut row_curr);
            std::mem::swap(&mut row_curr, &mut row_next);
            if y + 2 < h {
                row_next.copy_from_slice(&self.data[(y + 2) * w..(y + 3) * w]);
            } else {
                row_next.copy_from_slice(&border);
            }
        }
    }
}

impl GoLEngine for ArrayEngine {
    fn clear(&mut self) {
        self.data.fill(0);
    }

    fn get(&self, x: i64, y: i64) -> bool {
        self.locate(x, y)
            .is_some_and(|(word, bit)| (self.data[word] >> bit) & 1 == 1)
    }

    fn set(&mut self, x: i64, y: i64, alive: bool) -> Result<()> {
        let Some((word, bit)) = self.locate(x, y) else {
            bail!(
                "cell ({}, {}) is outside the ArrayEngine square {:?}",
                x,
                y,
                self.bounds()
            );
        };
        if alive {
            self.data[word] |= 1 << bit;
        } else {
            self.data[word] &= !(1 << bit);
        }
        Ok(())
    }

    fn step(&mut self, speed: u32) -> Result<()> {
        if speed >= 32 {
            bail!(
                "Generation count 2^{} is insanely large for ArrayEngine",
                speed
            );
        }
        for _ in 0..1u64 << speed {
            self.update_inner();
        }
        Ok(())
    }

    fn draw(&self, rect: LifeRect, set_pixel: &mut dyn FnMut(i64, i64)) {
        if !rect.overlaps(&self.bounds()) {
            return;
        }
        let w = self.words_per_row();
        for (i, &chunk) in self.data.iter().enumerate() {
            let y = self.origin.1 + (i / w) as i64;
            if y < rect.bottom() || y > rect.y {
                continue;
            }
            let x0 = self.origin.0 + ((i % w) * Self::CELLS_IN_CHUNK) as i64;
            let mut bits = chunk;
            while bits != 0 {
                let x = x0 + bits.trailing_zeros() as i64;
                if rect.contains(x, y) {
                    set_pixel(x, y);
                }
                bits &= bits - 1;
            }
        }
    }

    fn bytes_total(&self) -> usize {
        self.data.capacity() * size_of::<u64>()
    }
}
