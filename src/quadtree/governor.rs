use tracing::debug;

/// Decides when the node store and the step cache are wiped.
///
/// The combined cache size is only inspected every `check_interval` step
/// calls, so the caches may overshoot the ceiling in between. After an
/// eviction the ceiling is raised to twice the surviving working set when that
/// is larger, so patterns with big working sets are not evicted on every check.
pub(super) struct CacheGovernor {
    step_calls: u64,
    check_interval: u64,
    limit: usize,
}

impl CacheGovernor {
    pub(super) fn new(limit: usize, check_interval: u64) -> Self {
        assert!(check_interval > 0, "check_interval must be positive");
        Self {
            step_calls: 0,
            check_interval,
            limit,
        }
    }

    /// Counts a step call; returns `true` if the caches must be evicted before it runs.
    pub(super) fn on_step(&mut self, cached_total: usize) -> bool {
        self.step_calls += 1;
        if self.step_calls % self.check_interval != 0 {
            return false;
        }
        let evict = cached_total > self.limit;
        if evict {
            debug!(
                step_calls = self.step_calls,
                cached_total,
                limit = self.limit,
                "cache ceiling exceeded, evicting"
            );
        }
        evict
    }

    /// Adapts the ceiling to the size measured once the evicting step is done.
    pub(super) fn after_eviction(&mut self, cached_total: usize) {
        let limit = self.limit.max(cached_total.saturating_mul(2));
        if limit != self.limit {
            debug!(old = self.limit, new = limit, "raising cache ceiling");
        }
        self.limit = limit;
    }

    pub(super) fn step_calls(&self) -> u64 {
        self.step_calls
    }

    pub(super) fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks_only_every_interval() {
        let mut governor = CacheGovernor::new(10, 4);
        let decisions: Vec<bool> = (0..8).map(|_| governor.on_step(100)).collect();
        assert_eq!(
            decisions,
            [false, false, false, true, false, false, false, true]
        );
        assert_eq!(governor.step_calls(), 8);
    }

    #[test]
    fn test_under_limit_never_evicts() {
        let mut governor = CacheGovernor::new(1000, 1);
        assert!((0..10).all(|_| !governor.on_step(1000)));
        assert!(governor.on_step(1001));
    }

    #[test]
    fn test_limit_only_grows() {
        let mut governor = CacheGovernor::new(100, 1);
        governor.after_eviction(30);
        assert_eq!(governor.limit(), 100);
        governor.after_eviction(80);
        assert_eq!(governor.limit(), 160);
    }
}
