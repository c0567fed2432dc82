use super::QuadId;
use ahash::AHashMap as HashMap;

/// Memo consulted by the step engine before advancing a quad.
///
/// Implemented by [`StepCache`]; `()` remembers nothing, which leaves the
/// step engine a plain recursive computation.
pub(super) trait StepMemo {
    fn lookup(&self, quad: QuadId, speed: u32) -> Option<QuadId>;
    fn record(&mut self, quad: QuadId, speed: u32, result: QuadId);
}

impl StepMemo for () {
    fn lookup(&self, _: QuadId, _: u32) -> Option<QuadId> {
        None
    }

    fn record(&mut self, _: QuadId, _: u32, _: QuadId) {}
}

/// Results of advancing `quad` by `2^speed` generations, keyed by `(quad, speed)`.
#[derive(Default)]
pub(super) struct StepCache {
    results: HashMap<(QuadId, u32), QuadId>,
}

impl StepCache {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn len(&self) -> usize {
        self.results.len()
    }

    pub(super) fn clear(&mut self) {
        self.results.clear();
    }

    pub(super) fn bytes_total(&self) -> usize {
        self.results.capacity() * std::mem::size_of::<((QuadId, u32), QuadId)>()
    }
}

impl StepMemo for StepCache {
    #[inline]
    fn lookup(&self, quad: QuadId, speed: u32) -> Option<QuadId> {
        self.results.get(&(quad, speed)).copied()
    }

    #[inline]
    fn record(&mut self, quad: QuadId, speed: u32, result: QuadId) {
        self.results.insert((quad, speed), result);
    }
}
