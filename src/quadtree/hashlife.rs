use super::{CacheGovernor, NodeStore, QuadId, StepCache, StepMemo, MAX_LEVEL, MAX_SPEED};
use crate::{EngineConfig, GoLEngine, LifeRect};
use anyhow::{bail, Result};
use std::fmt;
use tracing::{debug, trace};

/// B3/S23: a cell with two live neighbours keeps its state, three makes it
/// alive, anything else kills it.
fn rule(cell: QuadId, count: u32) -> QuadId {
    match count {
        2 => cell,
        3 => QuadId::ALIVE,
        _ => QuadId::DEAD,
    }
}

/// Next generation of the middle 2x2 cells of a 4x4 quad.
fn step_base_case(store: &mut NodeStore, q: QuadId) -> QuadId {
    debug_assert_eq!(store.level(q), 2);
    let [nw, ne, se, sw] = store.parts(q).map(|c| store.parts(c));
    // rows from north to south, columns from west to east
    let grid = [
        [nw[0], nw[1], ne[0], ne[1]],
        [nw[3], nw[2], ne[3], ne[2]],
        [sw[0], sw[1], se[0], se[1]],
        [sw[3], sw[2], se[3], se[2]],
    ];
    let next = |r: usize, c: usize| {
        let mut count = 0;
        for (dr, row) in grid.iter().enumerate().take(r + 2).skip(r - 1) {
            for (dc, &cell) in row.iter().enumerate().take(c + 2).skip(c - 1) {
                if (dr, dc) != (r, c) && cell == QuadId::ALIVE {
                    count += 1;
                }
            }
        }
        rule(grid[r][c], count)
    };
    store.make(next(1, 1), next(1, 2), next(2, 2), next(2, 1))
}

/// Advances the center of `q` by `2^speed` generations.
///
/// The result is one level smaller than `q`. `memo` is consulted before any
/// work is done and receives every computed result.
///
/// # Panics
///
/// If `q` is smaller than level 2 or `speed > level(q) - 2`.
pub(super) fn advance<M: StepMemo>(
    store: &mut NodeStore,
    memo: &mut M,
    q: QuadId,
    speed: u32,
) -> QuadId {
    let level = store.level(q);
    assert!(
        level >= 2 && speed <= level - 2,
        "cannot advance a level {} quad by 2^{} generations",
        level,
        speed
    );
    if let Some(cached) = memo.lookup(q, speed) {
        return cached;
    }

    let result = if store.is_empty(q) {
        store.empty(level - 1)
    } else if level == 2 {
        step_base_case(store, q)
    } else {
        // At the top speed of this level the nine windows only get half of the
        // generations, and the four quadrants built from them are advanced
        // again for the other half. Below it, the windows already hold the
        // requested generation and only need to be cropped.
        let at_max_speed = speed == level - 2;
        let nine_speed = if at_max_speed { speed - 1 } else { speed };

        let [nw, ne, se, sw] = store.parts(q);
        let n = store.north(q);
        let e = store.east(q);
        let s = store.south(q);
        let w = store.west(q);
        let c = store.center(q);
        let [t_nw, t_n, t_ne, t_w, t_c, t_e, t_sw, t_s, t_se] =
            [nw, n, ne, w, c, e, sw, s, se].map(|x| advance(store, memo, x, nine_speed));

        let quadrants = [
            store.make(t_nw, t_n, t_c, t_w),
            store.make(t_n, t_ne, t_e, t_c),
            store.make(t_c, t_e, t_se, t_s),
            store.make(t_w, t_c, t_s, t_sw),
        ];
        let [r_nw, r_ne, r_se, r_sw] = if at_max_speed {
            quadrants.map(|x| advance(store, memo, x, speed - 1))
        } else {
            quadrants.map(|x| store.center(x))
        };
        store.make(r_nw, r_ne, r_se, r_sw)
    };

    debug_assert_eq!(store.level(result) + 1, level);
    memo.record(q, speed, result);
    result
}

/// Implementation of [HashLife algorithm](https://conwaylife.com/wiki/HashLife)
///
/// The field is a canonical quadtree centered on the origin that grows on
/// demand up to [`MAX_LEVEL`]. Node construction and `(quad, speed)` steps are
/// memoized; both caches are wiped together when they outgrow an adaptive
/// ceiling (see [`EngineConfig`]).
///
/// # Example
///
/// ```rust
/// use quadlife::{GoLEngine, HashLifeEngine};
///
/// let mut engine = HashLifeEngine::new();
/// for x in -1..=1 {
///     engine.set(x, 0, true).unwrap();
/// }
/// // a blinker flips after one generation
/// engine.step(0).unwrap();
/// assert!(engine.get(0, 1) && engine.get(0, -1) && !engine.get(1, 0));
/// ```
pub struct HashLifeEngine {
    store: NodeStore,
    step_cache: StepCache,
    governor: CacheGovernor,
    root: QuadId,
    config: EngineConfig,
}

/// Cache statistics of a [`HashLifeEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineReport {
    /// Number of `step` calls so far.
    pub step_calls: u64,
    /// Memoized `(quad, speed)` results.
    pub step_cache_len: usize,
    /// Canonical quads in the node store.
    pub node_store_len: usize,
    /// Current soft ceiling on the sum of both caches.
    pub cache_limit: usize,
}

impl fmt::Display for EngineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "steps {}", self.step_calls)?;
        writeln!(f, "step cache {}", self.step_cache_len)?;
        writeln!(f, "node store {}", self.node_store_len)?;
        writeln!(f, "limit {}", self.cache_limit)
    }
}

impl Default for HashLifeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl HashLifeEngine {
    /// Creates an engine with the default [`EngineConfig`].
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Creates an engine with the given configuration.
    ///
    /// # Errors
    ///
    /// If the configuration does not pass [`EngineConfig::validate`].
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let store = NodeStore::new();
        Self {
            root: store.empty(config.initial_level),
            store,
            step_cache: StepCache::new(),
            governor: CacheGovernor::new(config.cache_limit, config.check_interval),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Level of the current universe: it spans `2^level` cells on a side.
    pub fn level(&self) -> u32 {
        self.store.level(self.root)
    }

    /// Number of live cells.
    pub fn population(&self) -> u128 {
        self.store.population(self.root)
    }

    pub fn report(&self) -> EngineReport {
        EngineReport {
            step_calls: self.governor.step_calls(),
            step_cache_len: self.step_cache.len(),
            node_store_len: self.store.len(),
            cache_limit: self.governor.limit(),
        }
    }

    /// Like [`GoLEngine::draw`], but quads of level at most `scale` are
    /// reported as one pixel at their lower-left corner. `scale == 0` reports
    /// single cells.
    pub fn draw_scaled<F: FnMut(i64, i64)>(&self, rect: LifeRect, scale: u32, mut set_pixel: F) {
        self.store.draw(self.root, &rect, scale, &mut set_pixel);
    }

    fn cached_total(&self) -> usize {
        self.store.len() + self.step_cache.len()
    }

    fn evict(&mut self) {
        let before = self.cached_total();
        self.step_cache.clear();
        self.root = self.store.evict(self.root);
        debug!(before, after = self.cached_total(), "evicted caches");
    }

    /// Levels the universe must be grown by so that nothing escapes it during a step.
    fn growth_needed(&mut self) -> u32 {
        if !self.store.has_all_empty_edges(self.root) {
            return 2;
        }
        let center = self.store.center(self.root);
        if !self.store.has_all_empty_edges(center) {
            1
        } else {
            0
        }
    }
}

impl GoLEngine for HashLifeEngine {
    fn clear(&mut self) {
        self.root = self.store.empty(self.config.initial_level);
    }

    fn get(&self, x: i64, y: i64) -> bool {
        self.store.contains(self.root, x, y)
            && self.store.get_cell(self.root, x, y) == QuadId::ALIVE
    }

    fn set(&mut self, x: i64, y: i64, alive: bool) -> Result<()> {
        let half = 1i64 << (MAX_LEVEL - 1);
        if !(-half..half).contains(&x) || !(-half..half).contains(&y) {
            bail!(
                "cell ({}, {}) is outside the largest universe [-2^{}, 2^{})",
                x,
                y,
                MAX_LEVEL - 1,
                MAX_LEVEL - 1
            );
        }
        while !self.store.contains(self.root, x, y) {
            self.root = self.store.embiggen(self.root);
            trace!(level = self.level(), "grew universe to fit a cell");
        }
        let leaf = if alive { QuadId::ALIVE } else { QuadId::DEAD };
        self.root = self.store.set_cell(self.root, x, y, leaf);
        Ok(())
    }

    fn step(&mut self, speed: u32) -> Result<()> {
        if speed > MAX_SPEED {
            bail!("speed {} is above the maximum of {}", speed, MAX_SPEED);
        }
        let target_level = (self.level() + self.growth_needed()).max(speed + 2);
        if target_level > MAX_LEVEL {
            bail!(
                "advancing by 2^{} generations needs a level {} universe, above the maximum of {}",
                speed,
                target_level,
                MAX_LEVEL
            );
        }

        let evicted = self.governor.on_step(self.cached_total());
        if evicted {
            self.evict();
        }

        let mut current = self.root;
        while self.store.level(current) < target_level {
            current = self.store.embiggen(current);
        }
        if target_level > self.level() {
            trace!(from = self.level(), to = target_level, "grew universe before step");
        }

        let next = advance(&mut self.store, &mut self.step_cache, current, speed);
        // One level smaller than `current`; the next step inspects its edges again.
        self.root = self.store.embiggen(next);

        if evicted {
            self.governor.after_eviction(self.cached_total());
        }
        Ok(())
    }

    fn draw(&self, rect: LifeRect, mut set_pixel: &mut dyn FnMut(i64, i64)) {
        self.store.draw(self.root, &rect, 0, &mut set_pixel);
    }

    fn run_gc(&mut self) {
        self.evict();
    }

    fn bytes_total(&self) -> usize {
        self.store.bytes_total() + self.step_cache.bytes_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{library, Pattern};

    const SEED: u64 = 42;

    fn window(half: i64) -> LifeRect {
        LifeRect::from_lower_left(-half, -half, 2 * half)
    }

    fn engine_with(text: &str) -> HashLifeEngine {
        let mut engine = HashLifeEngine::new();
        let pattern = Pattern::from_plaintext(text).unwrap();
        engine.load_pattern(&pattern).unwrap();
        engine
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = Pattern::from_cells([(-1, 0), (0, 0), (1, 0)]);
        let vertical = Pattern::from_cells([(0, -1), (0, 0), (0, 1)]);
        let mut engine = HashLifeEngine::new();
        engine.load_pattern(&horizontal).unwrap();

        engine.step(0).unwrap();
        assert_eq!(engine.current_state(window(64)), vertical);
        engine.step(0).unwrap();
        assert_eq!(engine.current_state(window(64)), horizontal);
        engine.step(1).unwrap();
        assert_eq!(engine.current_state(window(64)), horizontal);
    }

    #[test]
    fn test_glider_moves_diagonally() {
        let glider = Pattern::from_plaintext(library::GLIDER).unwrap();
        let mut engine = HashLifeEngine::new();
        engine.load_pattern(&glider).unwrap();

        engine.step(2).unwrap();
        assert_eq!(engine.current_state(window(64)), glider.translated(1, -1));
        engine.step(5).unwrap();
        assert_eq!(engine.current_state(window(64)), glider.translated(9, -9));
        assert_eq!(engine.population(), 5);
    }

    #[test]
    fn test_advance_is_independent_of_memo() {
        let mut store = NodeStore::new();
        let mut q = store.empty(6);
        let soup = Pattern::random(5, Some(SEED)).unwrap();
        for &(x, y) in soup.cells() {
            q = store.set_cell(q, x - 16, y - 16, QuadId::ALIVE);
        }

        let mut cache = StepCache::new();
        for speed in 0..=4 {
            let memoized = advance(&mut store, &mut cache, q, speed);
            let plain = advance(&mut store, &mut (), q, speed);
            assert_eq!(memoized, plain, "speed {}", speed);
            assert_eq!(store.level(plain), 5);
        }
        assert!(cache.len() > 0);
    }

    #[test]
    fn test_two_slow_steps_equal_one_fast_step() {
        let mut store = NodeStore::new();
        let mut q = store.empty(5);
        let soup = Pattern::random(3, Some(SEED)).unwrap();
        for &(x, y) in soup.cells() {
            q = store.set_cell(q, x - 4, y - 4, QuadId::ALIVE);
        }
        let q = store.embiggen(q);
        let q = store.embiggen(q);

        let fast = advance(&mut store, &mut (), q, 3);
        let once = advance(&mut store, &mut (), q, 2);
        let once = store.embiggen(once);
        let twice = advance(&mut store, &mut (), once, 2);
        assert_eq!(twice, fast);
    }

    #[test]
    #[should_panic(expected = "cannot advance")]
    fn test_advance_rejects_excess_speed() {
        let mut store = NodeStore::new();
        let q = store.empty(4);
        advance(&mut store, &mut (), q, 3);
    }

    #[test]
    fn test_empty_steps_to_empty() {
        let mut store = NodeStore::new();
        let q = store.empty(10);
        let mut cache = StepCache::new();
        assert_eq!(advance(&mut store, &mut cache, q, 8), store.empty(9));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_get_outside_is_dead() {
        let engine = HashLifeEngine::new();
        assert!(!engine.get(1 << 40, -(1 << 40)));
        assert!(!engine.get(0, 0));
    }

    #[test]
    fn test_set_grows_universe() {
        let mut engine = HashLifeEngine::new();
        assert_eq!(engine.level(), 9);
        engine.set(1000, -3000, true).unwrap();
        assert!(engine.level() >= 13);
        assert!(engine.get(1000, -3000));
        engine.set(1000, -3000, false).unwrap();
        assert!(!engine.get(1000, -3000));
        assert_eq!(engine.population(), 0);
    }

    #[test]
    fn test_set_beyond_max_level_fails() {
        let mut engine = HashLifeEngine::new();
        let half = 1i64 << (MAX_LEVEL - 1);
        assert!(engine.set(half, 0, true).is_err());
        assert!(engine.set(0, -half - 1, true).is_err());
        assert_eq!(engine.level(), 9);

        engine.set(-half, half - 1, true).unwrap();
        assert_eq!(engine.level(), MAX_LEVEL);
        assert!(engine.get(-half, half - 1));
    }

    #[test]
    fn test_step_beyond_max_level_keeps_field() {
        let mut engine = HashLifeEngine::new();
        let half = 1i64 << (MAX_LEVEL - 1);
        engine.set(-half, -half, true).unwrap();
        assert!(engine.step(0).is_err());
        assert!(engine.get(-half, -half));
        assert_eq!(engine.level(), MAX_LEVEL);
    }

    #[test]
    fn test_speed_out_of_range() {
        let mut engine = HashLifeEngine::new();
        assert!(engine.step(MAX_SPEED + 1).is_err());
        assert_eq!(engine.report().step_calls, 0);
        engine.step(MAX_SPEED).unwrap();
        assert_eq!(engine.level(), MAX_LEVEL);
    }

    #[test]
    fn test_step_grows_at_edges() {
        let mut engine = HashLifeEngine::new();
        for x in [-256, -255, -254] {
            engine.set(x, 0, true).unwrap();
        }
        assert_eq!(engine.level(), 9);
        engine.step(0).unwrap();
        assert!(engine.level() > 9);
        let expected = Pattern::from_cells([(-255, -1), (-255, 0), (-255, 1)]);
        assert_eq!(engine.current_state(window(1024)), expected);
    }

    #[test]
    fn test_step_grows_for_speed() {
        let mut engine = engine_with(library::BLOCK);
        engine.step(20).unwrap();
        assert!(engine.level() >= 22);
        assert_eq!(
            engine.current_state(window(64)),
            Pattern::from_plaintext(library::BLOCK).unwrap()
        );
    }

    #[test]
    fn test_clear() {
        let mut engine = engine_with(library::R_PENTOMINO);
        engine.step(3).unwrap();
        assert!(engine.population() > 0);

        engine.clear();
        assert_eq!(engine.level(), 9);
        assert_eq!(engine.population(), 0);
        assert!(!engine.get(0, 0));
        for speed in [0, 4, 12] {
            engine.step(speed).unwrap();
            assert_eq!(engine.population(), 0);
        }
    }

    #[test]
    fn test_eviction_is_invisible() {
        let mut reference = engine_with(library::R_PENTOMINO);
        let config = EngineConfig::default()
            .with_cache_limit(0)
            .with_check_interval(1);
        let mut evicting = HashLifeEngine::with_config(config).unwrap();
        evicting
            .load_pattern(&Pattern::from_plaintext(library::R_PENTOMINO).unwrap())
            .unwrap();

        for speed in [0, 1, 3, 2, 0, 4, 1, 5] {
            reference.step(speed).unwrap();
            evicting.step(speed).unwrap();
            assert_eq!(
                reference.current_state(window(512)),
                evicting.current_state(window(512))
            );
            assert_eq!(reference.population(), evicting.population());
        }
        assert!(evicting.report().cache_limit > 0);
        assert!(evicting.report().node_store_len <= reference.report().node_store_len);
    }

    #[test]
    fn test_run_gc_keeps_field() {
        let mut engine = engine_with(library::ACORN);
        engine.step(4).unwrap();
        let before = engine.current_state(window(256));
        let level = engine.level();

        engine.run_gc();
        assert_eq!(engine.report().step_cache_len, 0);
        assert_eq!(engine.current_state(window(256)), before);
        assert_eq!(engine.level(), level);

        let mut reference = engine_with(library::ACORN);
        reference.step(4).unwrap();
        engine.step(3).unwrap();
        reference.step(3).unwrap();
        assert_eq!(engine.current_state(window(256)), reference.current_state(window(256)));
    }

    #[test]
    fn test_draw_scaled() {
        let engine = engine_with(library::BLOCK);
        let mut pixels = vec![];
        engine.draw_scaled(window(64), 3, |x, y| pixels.push((x, y)));
        // the block sits at (0, 0)..(1, -1), inside two 8x8 squares
        pixels.sort();
        assert_eq!(pixels, vec![(0, -8), (0, 0)]);
    }

    #[test]
    fn test_report() {
        let mut engine = engine_with(library::GLIDER);
        engine.step(0).unwrap();
        engine.step(0).unwrap();
        let report = engine.report();
        assert_eq!(report.step_calls, 2);
        assert_eq!(report.cache_limit, 200_000);
        assert!(report.node_store_len > MAX_LEVEL as usize);
        let text = report.to_string();
        assert!(text.starts_with("steps 2\n"));
        assert_eq!(text.lines().count(), 4);
    }
}
