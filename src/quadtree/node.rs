/// Location of a quad in its [`NodeStore`](super::NodeStore) arena.
///
/// Because the store is canonical, two ids are equal iff the quads are.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) struct QuadId(pub(super) u32);

impl QuadId {
    /// The dead level-0 leaf; doubles as the blank quad of level 0.
    pub(super) const DEAD: QuadId = QuadId(0);
    /// The alive level-0 leaf.
    pub(super) const ALIVE: QuadId = QuadId(1);

    pub(super) fn is_leaf(self) -> bool {
        self == Self::DEAD || self == Self::ALIVE
    }
}

/// A square of `2^level` cells on a side.
///
/// Leaves have level 0 and no meaningful children.
#[derive(Clone, Debug, Default)]
pub(super) struct QuadNode {
    pub(super) nw: QuadId,
    pub(super) ne: QuadId,
    pub(super) se: QuadId,
    pub(super) sw: QuadId,
    pub(super) level: u32,
}

impl QuadNode {
    pub(super) fn leaf() -> Self {
        Self::default()
    }

    /// Children in `make` order: `[nw, ne, se, sw]`.
    pub(super) fn parts(&self) -> [QuadId; 4] {
        assert!(self.level > 0, "leaves have no children");
        [self.nw, self.ne, self.se, self.sw]
    }
}
