//! Coordinates on quads.
//!
//! Quads do not know where they are: a quad is shared by every place it
//! occurs. The convention is that a root of level `n` is centered on the
//! origin, so it spans `[-2^(n-1), 2^(n-1))` on both axes and its lower-left
//! cell is `(-2^(n-1), -2^(n-1))`. `y` grows northwards.
use super::{NodeStore, QuadId, MAX_LEVEL};
use crate::LifeRect;
use ahash::AHashMap as HashMap;

impl NodeStore {
    pub(super) fn width(&self, id: QuadId) -> i64 {
        1i64 << self.level(id)
    }

    pub(super) fn contains(&self, id: QuadId, x: i64, y: i64) -> bool {
        if self.level(id) == 0 {
            return x == 0 && y == 0;
        }
        let w = self.width(id) / 2;
        -w <= x && x < w && -w <= y && y < w
    }

    /// Coordinates of `(x, y)` relative to the center of the quadrant containing it.
    fn descend(&self, id: QuadId, x: i64, y: i64) -> (i64, i64) {
        if self.level(id) == 1 {
            return (0, 0);
        }
        let w = self.width(id) / 4;
        let shift = |v: i64| if v >= 0 { v - w } else { v + w };
        (shift(x), shift(y))
    }

    /// Returns the leaf at `(x, y)`.
    ///
    /// # Panics
    ///
    /// If the quad does not contain the coordinate.
    pub(super) fn get_cell(&self, id: QuadId, x: i64, y: i64) -> QuadId {
        assert!(self.contains(id, x, y), "({}, {}) is outside the quad", x, y);
        if id.is_leaf() {
            return id;
        }
        if self.is_empty(id) {
            return QuadId::DEAD;
        }
        let n = self.get(id);
        let child = match (x >= 0, y >= 0) {
            (true, true) => n.ne,
            (true, false) => n.se,
            (false, true) => n.nw,
            (false, false) => n.sw,
        };
        let (x, y) = self.descend(id, x, y);
        self.get_cell(child, x, y)
    }

    /// Returns the quad with the leaf at `(x, y)` replaced; only the spine is rebuilt.
    ///
    /// # Panics
    ///
    /// If the quad does not contain the coordinate or `leaf` is not a leaf.
    pub(super) fn set_cell(&mut self, id: QuadId, x: i64, y: i64, leaf: QuadId) -> QuadId {
        assert!(leaf.is_leaf(), "only leaves can be written into a quad");
        assert!(self.contains(id, x, y), "({}, {}) is outside the quad", x, y);
        if id.is_leaf() {
            return leaf;
        }
        if leaf == QuadId::DEAD && self.is_empty(id) {
            return id;
        }
        let [mut nw, mut ne, mut se, mut sw] = self.parts(id);
        let (cx, cy) = self.descend(id, x, y);
        match (x >= 0, y >= 0) {
            (true, true) => ne = self.set_cell(ne, cx, cy, leaf),
            (true, false) => se = self.set_cell(se, cx, cy, leaf),
            (false, true) => nw = self.set_cell(nw, cx, cy, leaf),
            (false, false) => sw = self.set_cell(sw, cx, cy, leaf),
        }
        self.make(nw, ne, se, sw)
    }

    fn grandchildren(&self, id: QuadId) -> [[QuadId; 4]; 4] {
        assert!(self.level(id) >= 2, "quad is too small to have grandchildren");
        self.parts(id).map(|c| self.parts(c))
    }

    pub(super) fn center(&mut self, id: QuadId) -> QuadId {
        let [nw, ne, se, sw] = self.grandchildren(id);
        self.make(nw[2], ne[3], se[0], sw[1])
    }

    pub(super) fn north(&mut self, id: QuadId) -> QuadId {
        let [nw, ne, _, _] = self.grandchildren(id);
        self.make(nw[1], ne[0], ne[3], nw[2])
    }

    pub(super) fn east(&mut self, id: QuadId) -> QuadId {
        let [_, ne, se, _] = self.grandchildren(id);
        self.make(ne[3], ne[2], se[1], se[0])
    }

    pub(super) fn south(&mut self, id: QuadId) -> QuadId {
        let [_, _, se, sw] = self.grandchildren(id);
        self.make(sw[1], se[0], se[3], sw[2])
    }

    pub(super) fn west(&mut self, id: QuadId) -> QuadId {
        let [nw, _, _, sw] = self.grandchildren(id);
        self.make(nw[3], nw[2], sw[1], sw[0])
    }

    /// True if the twelve grandchildren along the border are all empty.
    pub(super) fn has_all_empty_edges(&self, id: QuadId) -> bool {
        let [nw, ne, se, sw] = self.grandchildren(id);
        let ring = [
            nw[0], nw[1], ne[0], ne[1], ne[2], se[1], se[2], se[3], sw[2], sw[3], sw[0], nw[3],
        ];
        ring.iter().all(|&q| self.is_empty(q))
    }

    /// A quad one level larger with `id` in its center and dead cells around it.
    ///
    /// # Panics
    ///
    /// For leaves and for quads already at [`MAX_LEVEL`].
    pub(super) fn embiggen(&mut self, id: QuadId) -> QuadId {
        let level = self.level(id);
        assert!(
            level > 0 && level < MAX_LEVEL,
            "cannot embiggen a quad of level {}",
            level
        );
        let e = self.empty(level - 1);
        let [nw, ne, se, sw] = self.parts(id);
        let nw = self.make(e, e, nw, e);
        let ne = self.make(e, e, e, ne);
        let se = self.make(se, e, e, e);
        let sw = self.make(e, sw, e, e);
        self.make(nw, ne, se, sw)
    }

    /// Calls `set_pixel` with the lower-left corner of every non-empty quad of
    /// level at most `scale` that overlaps `rect`, treating `id` as a root
    /// centered on the origin.
    pub(super) fn draw<F: FnMut(i64, i64)>(
        &self,
        id: QuadId,
        rect: &LifeRect,
        scale: u32,
        set_pixel: &mut F,
    ) {
        fn inner<F: FnMut(i64, i64)>(
            store: &NodeStore,
            id: QuadId,
            (x, y): (i64, i64),
            rect: &LifeRect,
            scale: u32,
            set_pixel: &mut F,
        ) {
            if store.is_empty(id) {
                return;
            }
            let w = store.width(id);
            if !rect.overlaps(&LifeRect::from_lower_left(x, y, w)) {
                return;
            }
            if store.level(id) <= scale {
                set_pixel(x, y);
                return;
            }
            let n = store.get(id);
            let h = w / 2;
            inner(store, n.nw, (x, y + h), rect, scale, set_pixel);
            inner(store, n.ne, (x + h, y + h), rect, scale, set_pixel);
            inner(store, n.se, (x + h, y), rect, scale, set_pixel);
            inner(store, n.sw, (x, y), rect, scale, set_pixel);
        }

        let corner = if self.level(id) == 0 {
            0
        } else {
            -self.width(id) / 2
        };
        inner(self, id, (corner, corner), rect, scale, set_pixel);
    }

    /// Number of live cells.
    pub(super) fn population(&self, id: QuadId) -> u128 {
        fn inner(store: &NodeStore, id: QuadId, cache: &mut HashMap<QuadId, u128>) -> u128 {
            if id == QuadId::ALIVE {
                return 1;
            }
            if store.is_empty(id) {
                return 0;
            }
            if let Some(&cached) = cache.get(&id) {
                return cached;
            }
            let result = store
                .parts(id)
                .iter()
                .map(|&c| inner(store, c, cache))
                .sum();
            cache.insert(id, result);
            result
        }

        inner(self, id, &mut HashMap::new())
    }
}
