use super::{QuadId, QuadNode, MAX_LEVEL};
use ahash::AHashMap as HashMap;

/// Leaves and the blank quad of every level live at these fixed ids.
const SEED_COUNT: u32 = MAX_LEVEL + 2;

/// Hash-consing arena that stores the nodes of the quadtree.
///
/// `make` never creates a second node with the same children, so quads can be
/// compared by id. The blank quads of all levels are seeded on construction and
/// survive [`NodeStore::evict`], which keeps `empty(level)` stable for the whole
/// lifetime of the store.
pub(super) struct NodeStore {
    /// all allocated nodes; `QuadId` indexes into it
    nodes: Vec<QuadNode>,
    /// canonical index of internal nodes by their children
    index: HashMap<[QuadId; 4], QuadId>,
}

impl NodeStore {
    pub(super) fn new() -> Self {
        let mut store = Self {
            nodes: vec![],
            index: HashMap::new(),
        };
        store.seed();
        store
    }

    fn seed(&mut self) {
        debug_assert!(self.nodes.is_empty() && self.index.is_empty());
        self.nodes.push(QuadNode::leaf());
        self.nodes.push(QuadNode::leaf());
        let mut b = QuadId::DEAD;
        for level in 1..=MAX_LEVEL {
            b = self.make(b, b, b, b);
            debug_assert_eq!(b, Self::blank_id(level));
        }
    }

    fn blank_id(level: u32) -> QuadId {
        if level == 0 {
            QuadId::DEAD
        } else {
            QuadId(level + 1)
        }
    }

    #[inline]
    pub(super) fn get(&self, id: QuadId) -> &QuadNode {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub(super) fn level(&self, id: QuadId) -> u32 {
        self.get(id).level
    }

    /// Children of an internal node as `[nw, ne, se, sw]`.
    #[inline]
    pub(super) fn parts(&self, id: QuadId) -> [QuadId; 4] {
        self.get(id).parts()
    }

    /// Returns the unique quad with the given children, creating it on first request.
    ///
    /// # Panics
    ///
    /// If the children have different levels or the result would exceed [`MAX_LEVEL`].
    pub(super) fn make(&mut self, nw: QuadId, ne: QuadId, se: QuadId, sw: QuadId) -> QuadId {
        let key = [nw, ne, se, sw];
        if let Some(&id) = self.index.get(&key) {
            return id;
        }

        let level = self.level(nw);
        assert!(
            key.iter().all(|&c| self.level(c) == level),
            "children of a quad must have equal levels"
        );
        assert!(level < MAX_LEVEL, "quad level would exceed {}", MAX_LEVEL);
        assert!(
            self.nodes.len() < u32::MAX as usize,
            "u32 is insufficient for node ids"
        );

        let id = QuadId(self.nodes.len() as u32);
        self.nodes.push(QuadNode {
            nw,
            ne,
            se,
            sw,
            level: level + 1,
        });
        self.index.insert(key, id);
        id
    }

    /// The fully dead quad of `level`.
    pub(super) fn empty(&self, level: u32) -> QuadId {
        assert!(level <= MAX_LEVEL, "no quads above level {}", MAX_LEVEL);
        Self::blank_id(level)
    }

    #[inline]
    pub(super) fn is_empty(&self, id: QuadId) -> bool {
        id == Self::blank_id(self.level(id))
    }

    /// Number of canonical entries.
    pub(super) fn len(&self) -> usize {
        self.index.len()
    }

    /// Forgets every node except the leaves and blank quads, then rebuilds the
    /// tree under `root` and returns its new id.
    ///
    /// Every other id handed out before the call is invalidated.
    pub(super) fn evict(&mut self, root: QuadId) -> QuadId {
        fn reintern(
            store: &mut NodeStore,
            old: &[QuadNode],
            id: QuadId,
            moved: &mut HashMap<QuadId, QuadId>,
        ) -> QuadId {
            if id.0 < SEED_COUNT {
                return id;
            }
            if let Some(&cached) = moved.get(&id) {
                return cached;
            }
            let [nw, ne, se, sw] = old[id.0 as usize]
                .parts()
                .map(|c| reintern(store, old, c, moved));
            let result = store.make(nw, ne, se, sw);
            moved.insert(id, result);
            result
        }

        let old = std::mem::take(&mut self.nodes);
        self.index.clear();
        self.seed();
        let mut moved = HashMap::new();
        reintern(self, &old, root, &mut moved)
    }

    pub(super) fn bytes_total(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<QuadNode>()
            + self.index.capacity() * std::mem::size_of::<([QuadId; 4], QuadId)>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_level1(store: &mut NodeStore) -> QuadId {
        let (a, d) = (QuadId::ALIVE, QuadId::DEAD);
        store.make(a, d, a, d)
    }

    #[test]
    fn test_make_is_canonical() {
        let mut store = NodeStore::new();
        let (a, d) = (QuadId::ALIVE, QuadId::DEAD);
        let x = store.make(a, d, d, a);
        let y = store.make(a, d, d, a);
        assert_eq!(x, y);
        assert_ne!(x, store.make(d, a, a, d));

        let z1 = store.make(x, x, x, y);
        let len = store.len();
        let z2 = store.make(y, y, y, x);
        assert_eq!(z1, z2);
        assert_eq!(store.len(), len);
        assert_eq!(store.level(z1), 2);
    }

    #[test]
    fn test_empty_identity() {
        let mut store = NodeStore::new();
        assert_eq!(store.empty(0), QuadId::DEAD);
        for level in 1..=MAX_LEVEL {
            let e = store.empty(level);
            assert_eq!(e, store.empty(level));
            assert_eq!(store.level(e), level);
            let c = store.empty(level - 1);
            assert_eq!(store.parts(e), [c; 4]);
            assert_eq!(store.make(c, c, c, c), e);
            assert!(store.is_empty(e));
        }
        assert!(!store.is_empty(QuadId::ALIVE));
        let x = some_level1(&mut store);
        assert!(!store.is_empty(x));
    }

    #[test]
    #[should_panic(expected = "equal levels")]
    fn test_mismatched_levels_panic() {
        let mut store = NodeStore::new();
        let x = some_level1(&mut store);
        let d = QuadId::DEAD;
        store.make(x, d, d, d);
    }

    #[test]
    #[should_panic(expected = "exceed")]
    fn test_level_overflow_panics() {
        let mut store = NodeStore::new();
        let top = store.empty(MAX_LEVEL);
        store.make(top, top, top, top);
    }

    #[test]
    #[should_panic(expected = "no children")]
    fn test_leaf_has_no_parts() {
        let store = NodeStore::new();
        store.parts(QuadId::ALIVE);
    }

    #[test]
    fn test_evict_keeps_blanks_and_root() {
        let mut store = NodeStore::new();
        let baseline = store.len();
        let x = some_level1(&mut store);
        let e1 = store.empty(1);
        let root = store.make(x, e1, x, e1);
        // unreachable from the root, must not survive eviction
        store.make(e1, x, e1, e1);
        assert_eq!(store.len(), baseline + 3);

        let root = store.evict(root);
        assert_eq!(store.len(), baseline + 2);
        for level in 0..=MAX_LEVEL {
            assert_eq!(store.empty(level), NodeStore::blank_id(level));
        }

        let [nw, ne, se, sw] = store.parts(root);
        assert_eq!(nw, se);
        assert_eq!(ne, e1);
        assert_eq!(sw, e1);
        let (a, d) = (QuadId::ALIVE, QuadId::DEAD);
        assert_eq!(store.parts(nw), [a, d, a, d]);
        assert_eq!(some_level1(&mut store), nw);
    }
}
